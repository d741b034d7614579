//! JDoodle execution service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::CompilerCredentials,
    domain::{CompileError, CompileOutput, CompileRequest, Compiler},
};

/// Request body of the execute endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    script: &'a str,
    language: &'a str,
    version_index: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Response body of the execute endpoint
///
/// `memory` and `cpuTime` arrive as strings or numbers depending on the language.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    memory: Option<Value>,
    #[serde(default)]
    cpu_time: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ExecuteResponse {
    fn into_output(self) -> CompileOutput {
        if self.status_code == Some(200) {
            CompileOutput {
                memory: self.memory.map(value_to_text),
                cpu_time: self.cpu_time.map(value_to_text),
                ..CompileOutput::success(self.output.unwrap_or_default())
            }
        } else {
            CompileOutput::failure(
                self.output
                    .unwrap_or_else(|| "Compilation failed".to_string()),
                self.error
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            )
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Forwards compile requests to JDoodle with a bounded timeout.
pub struct JDoodleCompiler {
    http_client: Client,
    endpoint: String,
    credentials: CompilerCredentials,
}

impl JDoodleCompiler {
    pub fn new(
        endpoint: String,
        timeout: Duration,
        credentials: CompilerCredentials,
    ) -> Result<Self, CompileError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CompileError::Connectivity(format!("Failed to create HTTP client: {e}"))
            })?;
        Ok(Self {
            http_client,
            endpoint,
            credentials,
        })
    }
}

fn classify(error: reqwest::Error) -> CompileError {
    if error.is_timeout() {
        CompileError::Timeout
    } else if error.is_decode() {
        CompileError::Service {
            status: 502,
            message: "Compilation service error".to_string(),
        }
    } else {
        CompileError::Connectivity(error.to_string())
    }
}

#[async_trait]
impl Compiler for JDoodleCompiler {
    async fn compile(&self, request: CompileRequest) -> Result<CompileOutput, CompileError> {
        let body = ExecuteRequest {
            script: &request.code,
            language: request.language.as_str(),
            version_index: request.language.version_index(),
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ExecuteResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Compilation service error".to_string());
            tracing::warn!("Execution service returned {}: {}", status, message);
            return Err(CompileError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let result: ExecuteResponse = response.json().await.map_err(classify)?;
        tracing::debug!("Execution service statusCode: {:?}", result.status_code);
        Ok(result.into_output())
    }
}
