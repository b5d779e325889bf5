use std::{
    io::{self, BufRead, BufReader},
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::debug;

use super::{Compiler, CompilerMessage, MessageCollector};
use crate::InvocationFault;

/// Runs the Kotlin compiler as a child process.
///
/// Stdout and stderr share one pipe, so messages are collected in the order
/// the compiler wrote them. Each non-blank line becomes a compiler message;
/// the process exit status becomes the exit code.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    program: PathBuf,
}

impl ProcessCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn_fault(&self, source: io::Error) -> InvocationFault {
        InvocationFault::Spawn {
            program: self.program_name(),
            source,
        }
    }

    fn output_fault(&self, source: io::Error) -> InvocationFault {
        InvocationFault::Output {
            program: self.program_name(),
            source,
        }
    }
}

impl Default for ProcessCompiler {
    fn default() -> Self {
        Self::new("kotlinc")
    }
}

impl Compiler for ProcessCompiler {
    fn compile(
        &self,
        args: &[String],
        collector: &mut MessageCollector,
    ) -> Result<i32, InvocationFault> {
        debug!(program = %self.program.display(), args = args.len(), "spawning compiler");

        let (reader, writer) = io::pipe().map_err(|e| self.spawn_fault(e))?;
        let stderr = writer.try_clone().map_err(|e| self.spawn_fault(e))?;

        // The command owns the write ends; it must be dropped before reading
        // or the pipe never reaches EOF.
        let mut child = {
            let mut command = Command::new(&self.program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr);
            command.spawn().map_err(|e| self.spawn_fault(e))?
        };

        let mut read_result = Ok(());
        for line in BufReader::new(reader).lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => collector.report(CompilerMessage::parse_line(&line)),
                Err(err) => {
                    read_result = Err(err);
                    let _ = child.kill();
                    break;
                }
            }
        }

        let status = child.wait().map_err(|e| self.output_fault(e))?;
        read_result.map_err(|e| self.output_fault(e))?;

        status.code().ok_or_else(|| InvocationFault::Terminated {
            program: self.program_name(),
        })
    }
}
