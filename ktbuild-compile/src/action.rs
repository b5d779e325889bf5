//! Build action trait.

use ktbuild_core::{Context, ExitCode};

use crate::Result;

/// Information about a build action.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    /// The action name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// One step of a compile request.
///
/// Actions are executed in order by the [`ActionRunner`]. Each action reads
/// the request context and may store values for later actions.
///
/// Built-in actions:
/// - `KotlinMainCompile` - runs annotation processing and the main compile pass
/// - `RenderCompileResult` - reports the deferred main compile result
///
/// [`ActionRunner`]: crate::ActionRunner
pub trait BuildAction: Send + Sync {
    /// The name of this action (used in logs).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this action does.
    fn description(&self) -> &'static str;

    /// Run this action on the request context.
    ///
    /// A non-zero exit code stops the request without being an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails fatally.
    fn invoke(&self, ctx: &mut Context) -> Result<ExitCode>;

    /// Get information about this action.
    fn info(&self) -> ActionInfo {
        ActionInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
