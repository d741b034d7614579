//! Compiler implementations.
//!
//! [`JDoodleCompiler`] forwards code to the upstream execution service;
//! [`DemoCompiler`] answers locally when no credentials are configured.

mod demo;
mod jdoodle;

use std::sync::Arc;

pub use demo::DemoCompiler;
pub use jdoodle::JDoodleCompiler;

use crate::{
    config::CompilerConfig,
    domain::{CompileError, Compiler},
};

/// Selects the compiler for the given configuration.
///
/// Without credentials the demo compiler is used.
pub fn build_compiler(config: &CompilerConfig) -> Result<Arc<dyn Compiler>, CompileError> {
    match &config.credentials {
        Some(credentials) => Ok(Arc::new(JDoodleCompiler::new(
            config.endpoint.clone(),
            config.timeout,
            credentials.clone(),
        )?)),
        None => Ok(Arc::new(DemoCompiler)),
    }
}
