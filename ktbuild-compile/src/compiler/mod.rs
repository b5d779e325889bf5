//! The Kotlin compiler entry point.
//!
//! The orchestration treats the compiler as an opaque, blocking call that
//! reports messages into a [`MessageCollector`] and returns an integer exit
//! code. [`ProcessCompiler`] implements it by running `kotlinc` as a child
//! process.

mod message;
mod process;

pub use message::{CompilerMessage, MessageCollector, Severity};
pub use process::ProcessCompiler;

use crate::InvocationFault;

/// A Kotlin compiler entry point.
///
/// Implementations are called at most once per compile phase and are not
/// required to be reentrant; callers sharing one compiler between requests
/// must serialize access themselves.
pub trait Compiler: Send + Sync {
    /// Compile with the given arguments, reporting messages to `collector`.
    ///
    /// # Errors
    ///
    /// Returns a fault if the compiler could not be run at all. Compilation
    /// failures are reported through the exit code instead.
    fn compile(
        &self,
        args: &[String],
        collector: &mut MessageCollector,
    ) -> Result<i32, InvocationFault>;
}
