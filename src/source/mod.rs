mod file;
mod xrandr;

use anyhow::Result;
use async_trait::async_trait;

pub use file::FileSource;
pub use xrandr::XrandrSource;

/// xrandr 文本的来源
#[async_trait]
pub trait LayoutSource: Send + Sync {
    /// 来源名称，用于日志
    fn name(&self) -> &str;

    /// 详细列表（`xrandr` 的输出）
    async fn listing(&self) -> Result<String>;

    /// 显示器列表（`xrandr --listmonitors` 的输出），没有时返回 None
    async fn summary(&self) -> Result<Option<String>>;
}
