use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::XrandrConfig;
use crate::source::LayoutSource;

/// 直接调用 xrandr 命令
pub struct XrandrSource {
    config: XrandrConfig,
}

impl XrandrSource {
    pub fn new(config: XrandrConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        debug!("执行命令: {} {:?}", self.config.command, args);

        let output = Command::new(&self.config.command)
            .args(args)
            .output()
            .await
            .with_context(|| format!("无法执行 {}", self.config.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} {:?} 执行失败 ({}): {}",
                self.config.command,
                args,
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl LayoutSource for XrandrSource {
    fn name(&self) -> &str {
        &self.config.command
    }

    async fn listing(&self) -> Result<String> {
        self.run(&self.config.listing_args).await
    }

    async fn summary(&self) -> Result<Option<String>> {
        if self.config.summary_args.is_empty() {
            return Ok(None);
        }
        self.run(&self.config.summary_args).await.map(Some)
    }
}
