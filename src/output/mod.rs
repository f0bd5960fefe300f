use crate::error::Result;
use crate::record::MetricsRecord;
use async_trait::async_trait;

pub mod json;

pub use json::JsonOutput;

#[async_trait]
pub trait OutputHandler: Send + Sync {
    async fn write(&mut self, record: &MetricsRecord) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
