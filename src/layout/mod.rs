mod error;
mod parser;
mod summary;

use serde::{Deserialize, Serialize};

pub use error::LayoutError;
pub use parser::LayoutParser;
pub use summary::{active_outputs, validate_summary, Monitor, SummaryParser};

/// 输出口的连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    Connected,
    Disconnected,
    Unknown,
}

/// 像素坐标下的矩形区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

/// 对某个模式及其刷新率的引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRef {
    /// `Output::modes` 中的下标
    pub mode: usize,
    /// 该模式 `rates` 中的下标
    pub rates: Vec<usize>,
}

/// 一个分辨率及其支持的刷新率
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
    /// 按原文顺序保存的刷新率文本，例如 "59.95"
    pub rates: Vec<String>,
}

/// 一个显示输出口（接口）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// 接口名称，例如 eDP-1
    pub name: String,
    pub connection: Connection,
    pub primary: bool,
    /// 当前占用的屏幕区域，未启用时为空
    pub geometry: Option<Geometry>,
    /// 按原文顺序排列的模式列表
    pub modes: Vec<Mode>,
    /// 当前使用的模式
    pub selected: Option<ModeRef>,
    /// 硬件推荐的模式
    pub preferred: Option<ModeRef>,
}

impl Output {
    /// 当前使用的模式及其第一个选中的刷新率
    pub fn current_mode(&self) -> Option<(&Mode, &str)> {
        let selected = self.selected.as_ref()?;
        let mode = self.modes.get(selected.mode)?;
        let rate = mode.rates.get(*selected.rates.first()?)?;
        Some((mode, rate.as_str()))
    }
}
