use serde::Serialize;

/// Output directories for one compile action.
///
/// Directory layout is computed elsewhere; the paths are passed through to
/// the compiler untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileDirectories {
    /// Class output directory (`-d`).
    pub classes: String,
    /// Java sources generated by annotation processors.
    pub annotation_processing_sources: String,
    /// Classes generated by annotation processors.
    pub annotation_processing_classes: String,
    /// Kotlin stubs produced for annotation processing.
    pub annotation_processing_stubs: String,
    /// Incremental data written by the annotation processing plugin.
    pub annotation_processing_incremental_data: String,
}
