//! Compile request files for ktbuild.
//!
//! A request is a TOML document naming the sources, resolved flags, output
//! directories and annotation processors of a single Kotlin/JVM target.
//! Parsing validates the request and reports problems as [`miette`]
//! diagnostics pointing into the file.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod parse;
mod request;
mod validate;

pub use error::{Error, Result};
pub use parse::parse_request;
pub use request::{
    AnnotationProcessingConfig, DirectoriesConfig, FlagsConfig, ProcessorConfig, Request,
    ToolchainConfig,
};
