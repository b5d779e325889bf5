//! Compiler plugin argument bundles.
//!
//! A compiler plugin is loaded with `-Xplugin=<jar>` and configured through
//! a single `-P` option holding `plugin:<id>:<key>=<value>` entries joined
//! by commas. Keys may repeat and their order is significant, so a bundle
//! is an ordered list of pairs rather than a map.

use ktbuild_core::{CompileDirectories, ProcessorDescriptor};
use serde::Serialize;

/// Plugin id of the Kotlin annotation processing plugin.
pub const KAPT_PLUGIN_ID: &str = "org.jetbrains.kotlin.kapt3";

/// The jar a compiler plugin is loaded from and the id it registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginIdentity {
    pub jar: String,
    pub id: String,
}

impl PluginIdentity {
    pub fn new(jar: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            jar: jar.into(),
            id: id.into(),
        }
    }

    /// The kapt plugin loaded from `jar`.
    pub fn kapt(jar: impl Into<String>) -> Self {
        Self::new(jar, KAPT_PLUGIN_ID)
    }
}

/// Builds a [`PluginArgBundle`] one option at a time.
///
/// # Example
///
/// ```
/// use ktbuild_compile::plugin_args::{PluginArgBuilder, PluginIdentity};
///
/// let bundle = PluginArgBuilder::new(PluginIdentity::new("noarg.jar", "org.jetbrains.kotlin.noarg"))
///     .arg("annotation", "com.example.NoArg")
///     .build();
///
/// assert_eq!(
///     bundle.to_args(),
///     [
///         "-Xplugin=noarg.jar",
///         "-P",
///         "plugin:org.jetbrains.kotlin.noarg:annotation=com.example.NoArg",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PluginArgBuilder {
    plugin: PluginIdentity,
    options: Vec<(String, String)>,
}

impl PluginArgBuilder {
    pub fn new(plugin: PluginIdentity) -> Self {
        Self {
            plugin,
            options: Vec::new(),
        }
    }

    /// Append an option. Repeated keys are kept in insertion order.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Append one option per value, all under the same key.
    pub fn args<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.options
            .extend(values.into_iter().map(|value| (key.to_string(), value.into())));
        self
    }

    pub fn build(self) -> PluginArgBundle {
        PluginArgBundle {
            plugin: self.plugin,
            options: self.options,
        }
    }
}

/// An ordered set of options for one compiler plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginArgBundle {
    plugin: PluginIdentity,
    options: Vec<(String, String)>,
}

impl PluginArgBundle {
    /// Build the kapt options for running `descriptor`'s processors.
    ///
    /// The option order is fixed: directories first, then the processing
    /// mode, then one `apclasspath` per classpath entry across all
    /// processors, and finally the comma-joined processor class names.
    pub fn kapt(
        plugin: PluginIdentity,
        directories: &CompileDirectories,
        descriptor: &ProcessorDescriptor,
    ) -> Self {
        let processors = descriptor.processor_classes().collect::<Vec<_>>().join(",");

        PluginArgBuilder::new(plugin)
            .arg("sources", &directories.annotation_processing_sources)
            .arg("classes", &directories.annotation_processing_classes)
            .arg("stubs", &directories.annotation_processing_stubs)
            .arg(
                "incrementalData",
                &directories.annotation_processing_incremental_data,
            )
            .arg("aptMode", "stubsAndApt")
            .arg("correctErrorTypes", "true")
            .args("apclasspath", descriptor.class_path())
            .arg("processors", processors)
            .build()
    }

    pub fn plugin(&self) -> &PluginIdentity {
        &self.plugin
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// All values recorded under `key`, in order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.options
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The value of the `-P` option.
    pub fn option_string(&self) -> String {
        self.options
            .iter()
            .map(|(key, value)| format!("plugin:{}:{}={}", self.plugin.id, key, value))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Compiler arguments that load and configure the plugin.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![format!("-Xplugin={}", self.plugin.jar)];
        if !self.options.is_empty() {
            args.push("-P".to_string());
            args.push(self.option_string());
        }
        args
    }
}
