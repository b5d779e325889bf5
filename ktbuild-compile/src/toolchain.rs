use std::{fmt, sync::Arc};

use crate::{
    compiler::Compiler, diagnostics::DiagnosticsSink, phase::PhaseInvoker,
    plugin_args::PluginIdentity,
};

/// The compiler, diagnostics sink and plugins a compile action runs with.
#[derive(Clone)]
pub struct Toolchain {
    compiler: Arc<dyn Compiler>,
    sink: Arc<dyn DiagnosticsSink>,
    kapt: Option<PluginIdentity>,
}

impl Toolchain {
    pub fn new(compiler: Arc<dyn Compiler>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            compiler,
            sink,
            kapt: None,
        }
    }

    /// Enable annotation processing with the given kapt plugin.
    pub fn with_kapt(mut self, kapt: PluginIdentity) -> Self {
        self.kapt = Some(kapt);
        self
    }

    pub fn kapt(&self) -> Option<&PluginIdentity> {
        self.kapt.as_ref()
    }

    pub(crate) fn phase_invoker(&self) -> PhaseInvoker {
        PhaseInvoker::new(Arc::clone(&self.compiler), Arc::clone(&self.sink))
    }
}

impl fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchain")
            .field("kapt", &self.kapt)
            .finish_non_exhaustive()
    }
}
