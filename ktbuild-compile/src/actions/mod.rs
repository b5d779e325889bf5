//! Built-in build actions.
//!
//! - [`KotlinMainCompile`] - runs annotation processing and the main compile pass
//! - [`RenderCompileResult`] - finalizes the deferred main compile result

mod kotlin_main_compile;
mod render_compile_result;

pub use kotlin_main_compile::{AnnotationProcessing, CompilePlan, KotlinMainCompile};
pub use render_compile_result::RenderCompileResult;
