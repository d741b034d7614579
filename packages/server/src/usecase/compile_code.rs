//! UseCase: コードのコンパイル・実行
//!
//! 入力を検証して [`Compiler`] に委譲する。タイムアウトや外部サービスの
//! エラーは [`CompileError`] の分類のまま呼び出し元に返す。

use std::sync::Arc;

use crate::domain::{CompileError, CompileOutput, CompileRequest, Compiler, Language};

/// コンパイルのユースケース
pub struct CompileCodeUseCase {
    compiler: Arc<dyn Compiler>,
}

impl CompileCodeUseCase {
    pub fn new(compiler: Arc<dyn Compiler>) -> Self {
        Self { compiler }
    }

    /// コンパイルを実行
    ///
    /// # Returns
    ///
    /// * `Err(CompileError::InvalidRequest)` - コードまたは言語が空
    /// * `Err(CompileError::UnsupportedLanguage)` - 対応していない言語
    pub async fn execute(
        &self,
        code: Option<String>,
        language: Option<String>,
    ) -> Result<CompileOutput, CompileError> {
        let code = code.filter(|c| !c.is_empty());
        let language = language.filter(|l| !l.is_empty());
        let (Some(code), Some(language)) = (code, language) else {
            return Err(CompileError::InvalidRequest);
        };
        let language: Language = language.parse()?;

        tracing::info!("Compiling {} bytes of {}", code.len(), language);
        let result = self
            .compiler
            .compile(CompileRequest { code, language })
            .await;
        if let Err(e) = &result {
            tracing::error!("Compilation failed ({}): {}", e.kind(), e);
        }
        result
    }
}
