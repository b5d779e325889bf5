//! Core types for the ktbuild Kotlin compile orchestrator.
//!
//! This crate provides the request-scoped [`Context`] that build actions
//! read from and write to, together with the fundamental value types stored
//! in it.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod context;
mod directories;
mod exit_code;
mod flags;
pub mod keys;
mod processor;

pub use context::{Context, ContextError, Key};
pub use directories::CompileDirectories;
pub use exit_code::ExitCode;
pub use flags::Flag;
pub use processor::{Processor, ProcessorDescriptor};
