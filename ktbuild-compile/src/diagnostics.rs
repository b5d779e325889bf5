//! Diagnostic sinks and the per-phase output processor.

use std::{
    fmt,
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    CompilePhase,
    compiler::{CompilerMessage, MessageCollector},
};

/// Receives the messages of a compiler phase when they are flushed.
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, phase: CompilePhase, messages: &[CompilerMessage]);
}

/// A sink that writes messages in `kotlinc` format to a writer.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn write_all(out: &mut dyn Write, messages: &[CompilerMessage]) -> io::Result<()> {
        for message in messages {
            writeln!(out, "{}", message)?;
        }
        out.flush()
    }
}

impl DiagnosticsSink for ConsoleSink {
    fn emit(&self, phase: CompilePhase, messages: &[CompilerMessage]) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = Self::write_all(&mut **out, messages) {
            warn!(%phase, error = %err, "failed to write compiler diagnostics");
        }
    }
}

/// Owns the messages collected during one compiler phase until they are
/// flushed to the sink.
///
/// A fresh processor is created for every phase invocation. [`process`]
/// consumes it, so a phase's diagnostics are emitted at most once.
///
/// [`process`]: OutputProcessor::process
pub struct OutputProcessor {
    phase: CompilePhase,
    collector: MessageCollector,
    sink: Arc<dyn DiagnosticsSink>,
}

impl OutputProcessor {
    pub fn new(phase: CompilePhase, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            phase,
            collector: MessageCollector::new(),
            sink,
        }
    }

    pub fn collector(&self) -> &MessageCollector {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut MessageCollector {
        &mut self.collector
    }

    /// Flush the collected messages to the sink.
    pub fn process(self) {
        debug!(phase = %self.phase, messages = self.collector.len(), "flushing diagnostics");
        self.sink.emit(self.phase, self.collector.messages());
    }
}

impl fmt::Debug for OutputProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputProcessor")
            .field("phase", &self.phase)
            .field("messages", &self.collector.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compiler::Severity, testing::RecordingSink};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_sink_writes_kotlinc_format() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleSink::new(buffer.clone());

        sink.emit(
            CompilePhase::Main,
            &[
                CompilerMessage::new(Severity::Error, "boom").at("src/A.kt:1:2"),
                CompilerMessage::new(Severity::Output, "raw line"),
            ],
        );

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "src/A.kt:1:2: error: boom\nraw line\n");
    }

    #[test]
    fn test_process_emits_collected_messages() {
        let sink = Arc::new(RecordingSink::new());
        let mut output = OutputProcessor::new(CompilePhase::AnnotationProcessing, sink.clone());
        output
            .collector_mut()
            .report(CompilerMessage::new(Severity::Warning, "careful"));

        output.process();

        assert_eq!(sink.flush_count(CompilePhase::AnnotationProcessing), 1);
        assert_eq!(sink.flush_count(CompilePhase::Main), 0);
        assert_eq!(sink.flushes()[0].1.len(), 1);
    }
}
