use crate::domain::model::{ExchangeInput, ExchangeResult, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// `Ok(None)` when the file does not exist yet.
    fn read_file_if_exists(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Storage locations and engine knobs for one run.
pub trait ConfigProvider: Send + Sync {
    fn participants_file(&self) -> &str;
    fn history_file(&self) -> &str;
    fn output_file(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn max_attempts(&self) -> usize;
    fn seed(&self) -> Option<u64>;
    fn period(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExchangeInput>;
    async fn transform(&self, input: ExchangeInput) -> Result<ExchangeResult>;
    async fn load(&self, result: ExchangeResult) -> Result<String>;
}
