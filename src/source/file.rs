use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::source::LayoutSource;

/// 从事先保存的文件读取 xrandr 输出
pub struct FileSource {
    listing_path: PathBuf,
    summary_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(listing_path: PathBuf, summary_path: Option<PathBuf>) -> Self {
        Self {
            listing_path,
            summary_path,
        }
    }
}

#[async_trait]
impl LayoutSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn listing(&self) -> Result<String> {
        debug!("读取详细列表: {:?}", self.listing_path);
        fs::read_to_string(&self.listing_path)
            .await
            .with_context(|| format!("无法读取 {:?}", self.listing_path))
    }

    async fn summary(&self) -> Result<Option<String>> {
        let Some(path) = &self.summary_path else {
            return Ok(None);
        };
        debug!("读取显示器列表: {:?}", path);
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取 {:?}", path))?;
        Ok(Some(content))
    }
}
