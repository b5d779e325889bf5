//! Compile request schema.

use std::path::PathBuf;

use indexmap::IndexMap;
use ktbuild_core::{
    CompileDirectories, Context, ContextError, Flag, Processor, ProcessorDescriptor, keys,
};
use serde::Deserialize;
use toml::Spanned;

/// Root schema of a compile request file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    /// Label of the target being compiled (e.g. `//app:lib`)
    pub label: Option<String>,

    /// Kotlin source files. Absent when the caller did not resolve any.
    pub sources: Option<Vec<Spanned<String>>>,

    /// Resolved compiler flags
    #[serde(default)]
    pub flags: FlagsConfig,

    /// Output directories
    pub directories: DirectoriesConfig,

    /// Annotation processing configuration.
    ///
    /// Absent means not configured; present with no processors means
    /// configured with nothing to run.
    pub annotation_processing: Option<AnnotationProcessingConfig>,

    /// Compiler toolchain
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// `[flags]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagsConfig {
    pub classpath: Option<String>,
    pub api_version: Option<String>,
    pub language_version: Option<String>,
    pub jvm_target: Option<String>,
}

/// `[directories]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoriesConfig {
    pub classes: Spanned<String>,
    #[serde(default)]
    pub annotation_processing_sources: Option<Spanned<String>>,
    #[serde(default)]
    pub annotation_processing_classes: Option<Spanned<String>>,
    #[serde(default)]
    pub annotation_processing_stubs: Option<Spanned<String>>,
    #[serde(default)]
    pub annotation_processing_incremental_data: Option<Spanned<String>>,
}

/// `[annotation_processing]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationProcessingConfig {
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

/// One `[[annotation_processing.processors]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    pub processor_class: Spanned<String>,
    #[serde(default)]
    pub class_path: Vec<String>,
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Compiler executable
    #[serde(default = "default_compiler")]
    pub compiler: PathBuf,
    /// Jar of the kapt compiler plugin
    pub kapt_jar: Option<String>,
    /// Overrides the id the kapt plugin registers under
    pub kapt_plugin_id: Option<String>,
}

fn default_compiler() -> PathBuf {
    PathBuf::from("kotlinc")
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            kapt_jar: None,
            kapt_plugin_id: None,
        }
    }
}

impl FlagsConfig {
    fn entries(&self) -> [(Flag, Option<&String>); 4] {
        [
            (Flag::Classpath, self.classpath.as_ref()),
            (Flag::KotlinApiVersion, self.api_version.as_ref()),
            (Flag::KotlinLanguageVersion, self.language_version.as_ref()),
            (Flag::KotlinJvmTarget, self.jvm_target.as_ref()),
        ]
    }
}

fn spanned_or_empty(value: &Option<Spanned<String>>) -> String {
    value
        .as_ref()
        .map(|v| v.get_ref().clone())
        .unwrap_or_default()
}

impl DirectoriesConfig {
    pub fn to_compile_directories(&self) -> CompileDirectories {
        CompileDirectories {
            classes: self.classes.get_ref().clone(),
            annotation_processing_sources: spanned_or_empty(&self.annotation_processing_sources),
            annotation_processing_classes: spanned_or_empty(&self.annotation_processing_classes),
            annotation_processing_stubs: spanned_or_empty(&self.annotation_processing_stubs),
            annotation_processing_incremental_data: spanned_or_empty(
                &self.annotation_processing_incremental_data,
            ),
        }
    }
}

impl AnnotationProcessingConfig {
    pub fn to_descriptor(&self) -> ProcessorDescriptor {
        ProcessorDescriptor::new(
            self.processors
                .iter()
                .map(|p| Processor::new(p.processor_class.get_ref().clone(), p.class_path.clone()))
                .collect(),
        )
    }
}

impl Request {
    /// Resolved flags in a fixed order, label first.
    pub fn flags(&self) -> IndexMap<Flag, String> {
        let mut flags = IndexMap::new();
        if let Some(label) = &self.label {
            flags.insert(Flag::Label, label.clone());
        }
        for (flag, value) in self.flags.entries() {
            if let Some(value) = value {
                flags.insert(flag, value.clone());
            }
        }
        flags
    }

    /// Source files, if the request lists any.
    pub fn source_files(&self) -> Option<Vec<String>> {
        self.sources
            .as_ref()
            .map(|sources| sources.iter().map(|s| s.get_ref().clone()).collect())
    }

    /// Number of annotation processors to run.
    pub fn processor_count(&self) -> usize {
        self.annotation_processing
            .as_ref()
            .map_or(0, |ap| ap.processors.len())
    }

    /// Build the request context build actions run against.
    ///
    /// # Errors
    ///
    /// Fails only if a slot is written twice, which a fresh context rules out.
    pub fn to_context(&self) -> std::result::Result<Context, ContextError> {
        let mut ctx = Context::new(self.flags());
        ctx.put(
            &keys::COMPILE_DIRECTORIES,
            self.directories.to_compile_directories(),
        )?;
        if let Some(sources) = self.source_files() {
            ctx.put(&keys::ALL_SOURCES, sources)?;
        }
        if let Some(annotation_processing) = &self.annotation_processing {
            ctx.put(
                &keys::PLUGIN_DESCRIPTORS,
                annotation_processing.to_descriptor(),
            )?;
        }
        Ok(ctx)
    }
}
