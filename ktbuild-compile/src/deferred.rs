//! The deferred outcome of the main compile phase.

use ktbuild_core::ExitCode;
use tracing::warn;

use crate::diagnostics::OutputProcessor;

/// The exit code of the main compile phase together with its still pending
/// diagnostics.
///
/// The main phase stores this on the request instead of reporting right
/// away, so that a later stage can report it alongside its own output. The
/// consumer must call [`finalize`] exactly once; it takes the value by
/// ownership, so calling it twice does not compile. Dropping the result
/// without finalizing it discards the diagnostics and logs a warning.
///
/// [`finalize`]: DeferredResult::finalize
#[derive(Debug)]
pub struct DeferredResult {
    exit_code: ExitCode,
    diagnostics: Option<OutputProcessor>,
}

impl DeferredResult {
    pub(crate) fn new(exit_code: ExitCode, diagnostics: OutputProcessor) -> Self {
        Self {
            exit_code,
            diagnostics: Some(diagnostics),
        }
    }

    /// The exit code the main compile phase actually returned.
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    /// Flush the deferred diagnostics and return the original exit code.
    pub fn finalize(mut self) -> ExitCode {
        if let Some(diagnostics) = self.diagnostics.take() {
            diagnostics.process();
        }
        self.exit_code
    }
}

impl Drop for DeferredResult {
    fn drop(&mut self) {
        if let Some(diagnostics) = &self.diagnostics {
            warn!(
                exit_code = %self.exit_code,
                messages = diagnostics.collector().len(),
                "compile result dropped without being finalized; diagnostics discarded"
            );
        }
    }
}
