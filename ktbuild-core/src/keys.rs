//! Well-known request slots shared between build actions.

use crate::{CompileDirectories, Key, ProcessorDescriptor};

/// Every Kotlin source file of the target.
pub const ALL_SOURCES: Key<Vec<String>> = Key::new("all_sources");

/// Output directories of the compile action.
pub const COMPILE_DIRECTORIES: Key<CompileDirectories> = Key::new("compile_directories");

/// Annotation processors configured for the target, if any.
pub const PLUGIN_DESCRIPTORS: Key<ProcessorDescriptor> = Key::new("plugin_descriptors");
