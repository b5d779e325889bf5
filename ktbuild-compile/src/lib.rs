//! Kotlin compile action orchestration.
//!
//! This crate turns a compile request into one or two invocations of the
//! Kotlin compiler:
//!
//! - an optional annotation processing pass (kapt) that generates Java
//!   sources and stubs, and
//! - the main compile pass over the original and generated sources.
//!
//! Diagnostics of the annotation processing pass are flushed as soon as it
//! finishes. The outcome of the main pass is stored on the request as a
//! [`DeferredResult`] so that a later stage can report it together with its
//! own output.
//!
//! # Module Organization
//!
//! - [`actions`] - The build actions ([`KotlinMainCompile`], [`RenderCompileResult`])
//! - [`compiler`] - The compiler entry point seam and the process-backed compiler
//! - [`diagnostics`] - Diagnostic sinks and the per-phase output processor
//! - [`plugin_args`] - Compiler plugin argument bundles
//! - [`testing`] - Test doubles (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod action;
pub mod actions;
pub mod compiler;
mod deferred;
pub mod diagnostics;
mod error;
mod phase;
pub mod plugin_args;
mod runner;
mod toolchain;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::{ActionInfo, BuildAction};
pub use actions::{AnnotationProcessing, CompilePlan, KotlinMainCompile, RenderCompileResult};
pub use deferred::DeferredResult;
pub use error::{ActionError, InvocationFault, Result};
pub use phase::{CompilePhase, CompletedPhase, PhaseInvoker, PhaseOutcome};
pub use runner::ActionRunner;
pub use toolchain::Toolchain;
