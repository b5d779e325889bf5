//! Build action runner.

use ktbuild_core::{Context, ExitCode};
use tracing::{info, info_span};

use crate::{
    ActionInfo, BuildAction, KotlinMainCompile, RenderCompileResult, Result, Toolchain,
};

/// Runs the build actions of a compile request in order.
///
/// The first action returning a non-zero exit code ends the run with that
/// code; errors end it immediately.
///
/// # Example
///
/// ```ignore
/// let runner = ActionRunner::kotlin_jvm(&toolchain);
/// let exit_code = runner.run(&mut ctx)?;
/// ```
pub struct ActionRunner {
    actions: Vec<Box<dyn BuildAction>>,
}

impl ActionRunner {
    /// Create a runner without actions.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// The actions of a Kotlin JVM compile: compile, then report the
    /// deferred result.
    pub fn kotlin_jvm(toolchain: &Toolchain) -> Self {
        Self::new()
            .action(KotlinMainCompile::new(toolchain))
            .action(RenderCompileResult)
    }

    /// Add an action to run after the existing ones.
    pub fn action(mut self, action: impl BuildAction + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Information about every action, in execution order.
    pub fn actions(&self) -> Vec<ActionInfo> {
        self.actions.iter().map(|action| action.info()).collect()
    }

    /// Run all actions on the request context.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails fatally.
    pub fn run(&self, ctx: &mut Context) -> Result<ExitCode> {
        for action in &self.actions {
            let span = info_span!("action", name = action.name());
            let _guard = span.enter();

            let exit_code = action.invoke(ctx)?;
            if !exit_code.is_ok() {
                info!(%exit_code, "action failed; stopping");
                return Ok(exit_code);
            }
        }
        Ok(ExitCode::OK)
    }
}

impl Default for ActionRunner {
    fn default() -> Self {
        Self::new()
    }
}
