//! Local stand-in for the execution service.

use async_trait::async_trait;

use crate::domain::{CompileError, CompileOutput, CompileRequest, Compiler};

/// Echoes the submitted code back with a fixed demonstration output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoCompiler;

#[async_trait]
impl Compiler for DemoCompiler {
    async fn compile(&self, request: CompileRequest) -> Result<CompileOutput, CompileError> {
        let output_text = format!(
            "// Mock execution for {}\n\nYour code:\n{}\n\nOutput: Hello from CodeTogether!\n\n\
             Note: This is a mock execution. To enable real code compilation, please add your \
             JDoodle API credentials to the .env file.",
            request.language, request.code
        );
        Ok(CompileOutput {
            memory: Some("0 MB".to_string()),
            cpu_time: Some("0.001".to_string()),
            is_mock: true,
            ..CompileOutput::success(output_text)
        })
    }
}
