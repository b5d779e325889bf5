//! Test doubles for the compiler and diagnostics seams.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use crate::{
    CompilePhase, InvocationFault,
    compiler::{Compiler, CompilerMessage, MessageCollector, Severity},
    diagnostics::DiagnosticsSink,
};

/// One scripted compiler response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Return this exit code.
    Exit(i32),
    /// Fail with a spawn fault.
    Fault,
}

/// A compiler that replays scripted responses and records its arguments.
///
/// Each invocation reports one info message so flushes can be told apart.
///
/// # Panics
///
/// Panics when invoked more often than responses were scripted.
#[derive(Debug, Default)]
pub struct ScriptedCompiler {
    steps: Mutex<VecDeque<Step>>,
    invocations: Mutex<Vec<Vec<String>>>,
}

impl ScriptedCompiler {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// A compiler that returns the given exit codes in order.
    pub fn exits(codes: impl IntoIterator<Item = i32>) -> Self {
        Self::new(codes.into_iter().map(Step::Exit))
    }

    /// Arguments of every invocation so far.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Compiler for ScriptedCompiler {
    fn compile(
        &self,
        args: &[String],
        collector: &mut MessageCollector,
    ) -> Result<i32, InvocationFault> {
        let invocation = {
            let mut invocations = self.invocations.lock().unwrap_or_else(PoisonError::into_inner);
            invocations.push(args.to_vec());
            invocations.len()
        };
        collector.report(CompilerMessage::new(
            Severity::Info,
            format!("invocation {invocation}"),
        ));

        let step = self
            .steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match step {
            Some(Step::Exit(code)) => Ok(code),
            Some(Step::Fault) => Err(InvocationFault::Spawn {
                program: "scripted".to_string(),
                source: std::io::Error::other("scripted fault"),
            }),
            None => panic!("ScriptedCompiler: no response scripted for invocation {invocation}"),
        }
    }
}

/// A sink that records every flush.
#[derive(Debug, Default)]
pub struct RecordingSink {
    flushes: Mutex<Vec<(CompilePhase, Vec<CompilerMessage>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every flush so far, in order.
    pub fn flushes(&self) -> Vec<(CompilePhase, Vec<CompilerMessage>)> {
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of flushes recorded for `phase`.
    pub fn flush_count(&self, phase: CompilePhase) -> usize {
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(p, _)| *p == phase)
            .count()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn emit(&self, phase: CompilePhase, messages: &[CompilerMessage]) {
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((phase, messages.to_vec()));
    }
}
