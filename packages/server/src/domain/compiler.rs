//! Compiler trait 定義
//!
//! 外部のコード実行サービスとの境界。コアはこの契約だけに依存する。

use std::{fmt, str::FromStr};

use async_trait::async_trait;

use super::CompileError;

/// 実行可能な言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python3,
    Java,
    Cpp,
    NodeJs,
    C,
    Ruby,
    Go,
    Scala,
    Bash,
    Sql,
    Pascal,
    CSharp,
    Php,
    Swift,
    Rust,
    R,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::Python3,
        Language::Java,
        Language::Cpp,
        Language::NodeJs,
        Language::C,
        Language::Ruby,
        Language::Go,
        Language::Scala,
        Language::Bash,
        Language::Sql,
        Language::Pascal,
        Language::CSharp,
        Language::Php,
        Language::Swift,
        Language::Rust,
        Language::R,
    ];

    /// 外部サービスでの言語名
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python3 => "python3",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::NodeJs => "nodejs",
            Language::C => "c",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Scala => "scala",
            Language::Bash => "bash",
            Language::Sql => "sql",
            Language::Pascal => "pascal",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Rust => "rust",
            Language::R => "r",
        }
    }

    /// 外部サービスでのバージョン番号
    pub fn version_index(&self) -> &'static str {
        match self {
            Language::Pascal => "2",
            Language::Cpp | Language::C => "4",
            _ => "3",
        }
    }
}

impl FromStr for Language {
    type Err = CompileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == value)
            .ok_or_else(|| CompileError::UnsupportedLanguage(value.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// コンパイル要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub code: String,
    pub language: Language,
}

/// コンパイル結果
///
/// `succeeded == false` はコードの実行エラー（サービス自体は応答している）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileOutput {
    pub output_text: String,
    pub succeeded: bool,
    pub error_text: Option<String>,
    pub memory: Option<String>,
    pub cpu_time: Option<String>,
    pub is_mock: bool,
}

impl CompileOutput {
    pub fn success(output_text: String) -> Self {
        Self {
            output_text,
            succeeded: true,
            ..Self::default()
        }
    }

    pub fn failure(output_text: String, error_text: String) -> Self {
        Self {
            output_text,
            succeeded: false,
            error_text: Some(error_text),
            ..Self::default()
        }
    }
}

/// 外部のコード実行サービス
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, request: CompileRequest) -> Result<CompileOutput, CompileError>;
}
