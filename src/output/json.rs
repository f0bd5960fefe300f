use super::OutputHandler;
use crate::error::Result;
use crate::record::MetricsRecord;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// Writes all records as one pretty-printed JSON array on `close`.
/// Non-ASCII text is written as-is.
pub struct JsonOutput {
    path: PathBuf,
    file: File,
    items: Vec<MetricsRecord>,
}

impl JsonOutput {
    /// Creates missing parent directories and truncates the target file.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                log::debug!("Creating output directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            path,
            file,
            items: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutputHandler for JsonOutput {
    async fn write(&mut self, record: &MetricsRecord) -> Result<()> {
        self.items.push(record.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let mut writer = BufWriter::new(&self.file);
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        self.items.serialize(&mut ser)?;
        writer.flush()?;

        log::info!(
            "Successfully wrote {} record(s) to {}",
            self.items.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_pretty_utf8_array_and_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/records.json");

        let mut record = MetricsRecord::new("https://www.similarweb.com/website/café.fr", "café.fr");
        record.title = Some("Café über trafic".to_string());

        let mut output = JsonOutput::new(path.clone()).unwrap();
        output.write(&record).await.unwrap();
        output.close().await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"url\""));
        assert!(text.contains("Café über trafic"));
        assert!(!text.contains("\\u"));

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["name"], "café.fr");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonOutput::new(blocker.join("out.json")).is_err());
    }
}
