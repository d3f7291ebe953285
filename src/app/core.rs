use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::layout::{self, LayoutParser, Monitor, Output, SummaryParser};
use crate::source::LayoutSource;

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Outputs(Vec<Output>),
    Full {
        outputs: Vec<Output>,
        monitors: Vec<Monitor>,
    },
}

pub struct App {
    config: Arc<Config>,
}

impl App {
    /// 创建新应用实例
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// 获取并解析 xrandr 输出
    pub async fn collect(&self, source: &dyn LayoutSource) -> Result<Report> {
        let options = &self.config.output;
        debug!("从 {} 获取 xrandr 输出", source.name());

        let listing = source.listing().await.context("获取详细列表失败")?;
        let mut outputs = LayoutParser::parse(&listing).context("解析详细列表失败")?;

        let needs_summary =
            options.validate_summary || options.active_only || options.include_monitors;
        let monitors = if needs_summary {
            match source.summary().await.context("获取显示器列表失败")? {
                Some(text) => Some(SummaryParser::parse(&text).context("解析显示器列表失败")?),
                None => None,
            }
        } else {
            None
        };

        if let (true, Some(monitors)) = (options.validate_summary, &monitors) {
            layout::validate_summary(&outputs, monitors).context("显示器列表与详细列表不一致")?;
            debug!("显示器列表校验通过");
        }

        if options.active_only {
            let Some(monitors) = &monitors else {
                bail!("只输出正在使用的输出口时需要显示器列表");
            };
            outputs = layout::active_outputs(outputs, monitors);
        }

        for output in &outputs {
            match output.current_mode() {
                Some((mode, rate)) => info!(
                    "{}: {}x{} @ {} Hz",
                    output.name, mode.width, mode.height, rate
                ),
                None => info!("{}: 未使用 ({} 个模式)", output.name, output.modes.len()),
            }
        }

        if options.include_monitors && monitors.is_none() {
            warn!("{} 没有提供显示器列表，输出的 monitors 为空", source.name());
        }

        Ok(if options.include_monitors {
            Report::Full {
                outputs,
                monitors: monitors.unwrap_or_default(),
            }
        } else {
            Report::Outputs(outputs)
        })
    }

    /// 运行应用，返回 JSON 文本
    pub async fn run(&self, source: &dyn LayoutSource) -> Result<String> {
        let report = self.collect(source).await?;
        let json = if self.config.output.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}
