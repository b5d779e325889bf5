//! Reports the deferred Kotlin compile result.

use ktbuild_core::{Context, ContextError, ExitCode};
use tracing::info;

use crate::{BuildAction, KotlinMainCompile, Result};

/// Finalizes the result [`KotlinMainCompile`] deferred.
///
/// Flushes the main compile diagnostics and returns the real exit code of
/// the main compile pass, which becomes the status of the request.
#[derive(Debug, Default)]
pub struct RenderCompileResult;

impl BuildAction for RenderCompileResult {
    fn name(&self) -> &'static str {
        "render compile result"
    }

    fn description(&self) -> &'static str {
        "Report the deferred Kotlin compile diagnostics and exit code"
    }

    fn invoke(&self, ctx: &mut Context) -> Result<ExitCode> {
        let result = ctx
            .take(&KotlinMainCompile::RESULT)
            .ok_or(ContextError::Missing {
                key: KotlinMainCompile::RESULT.name(),
            })?;

        let exit_code = result.finalize();
        info!(%exit_code, "kotlin compile result reported");
        Ok(exit_code)
    }
}
