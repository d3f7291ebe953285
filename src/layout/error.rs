use thiserror::Error;

/// 解析 xrandr 输出时的错误，行号从 1 开始（第 1 行为标题行）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// 模式行中没有可解析的 `宽x高`
    #[error("第 {line} 行的模式无法解析: {content:?}")]
    MalformedModeLine { line: usize, content: String },

    /// 在任何输出口标题之前出现了模式行
    #[error("第 {line} 行的模式不属于任何输出口: {content:?}")]
    OrphanModeLine { line: usize, content: String },

    /// 显示器列表中的输出口在详细列表中不存在
    #[error("显示器列表中的输出口 {name} 不在详细列表中")]
    InconsistentSummary { name: String },

    /// 显示器列表中的某行格式不正确
    #[error("显示器列表第 {line} 行无法解析: {content:?}")]
    MalformedSummaryLine { line: usize, content: String },
}

impl LayoutError {
    /// 出错的行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            LayoutError::MalformedModeLine { line, .. }
            | LayoutError::OrphanModeLine { line, .. }
            | LayoutError::MalformedSummaryLine { line, .. } => Some(*line),
            LayoutError::InconsistentSummary { .. } => None,
        }
    }
}
