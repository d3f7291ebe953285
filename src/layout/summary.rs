use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::{Geometry, LayoutError, Output};

// 标题: Monitors: 2
static BANNER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Monitors:\s*(\d+)").expect("显示器标题正则无效"));

// 显示器行:  0: +*eDP-1 1920/344x1080/194+0+0  eDP-1
static MONITOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+):\s+(\+)?(\*)?(\S+)\s+(\d+)/(\d+)x(\d+)/(\d+)\+(-?\d+)\+(-?\d+)(.*)$",
    )
    .expect("显示器行正则无效")
});

/// `xrandr --listmonitors` 中的一个显示器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub index: usize,
    pub name: String,
    /// `+` 标记
    pub automatic: bool,
    /// `*` 标记
    pub primary: bool,
    pub geometry: Geometry,
    /// 物理尺寸（毫米）
    pub size_mm: (u32, u32),
    /// 组成该显示器的输出口
    pub outputs: Vec<String>,
}

/// 显示器列表解析器
pub struct SummaryParser;

impl SummaryParser {
    /// 解析 `xrandr --listmonitors` 的输出
    pub fn parse(content: &str) -> Result<Vec<Monitor>, LayoutError> {
        let mut lines = content.lines().enumerate();
        let banner = lines.next().map_or("", |(_, line)| line);
        let expected = BANNER_RE
            .captures(banner)
            .and_then(|cap| cap[1].parse::<usize>().ok())
            .ok_or_else(|| LayoutError::MalformedSummaryLine {
                line: 1,
                content: banner.to_string(),
            })?;

        let mut monitors = Vec::new();
        for (index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            monitors.push(parse_monitor(line, index + 1)?);
        }

        if expected != monitors.len() {
            warn!("显示器列表声明 {} 个显示器，实际解析到 {} 个", expected, monitors.len());
        }

        debug!("显示器列表解析完成，共 {} 个显示器", monitors.len());
        Ok(monitors)
    }
}

fn parse_monitor(line: &str, line_number: usize) -> Result<Monitor, LayoutError> {
    let malformed = || LayoutError::MalformedSummaryLine {
        line: line_number,
        content: line.to_string(),
    };

    let cap = MONITOR_RE.captures(line).ok_or_else(malformed)?;
    let number = |i: usize| cap[i].parse::<u32>().map_err(|_| malformed());
    let offset = |i: usize| cap[i].parse::<i32>().map_err(|_| malformed());

    Ok(Monitor {
        index: cap[1].parse().map_err(|_| malformed())?,
        name: cap[4].to_string(),
        automatic: cap.get(2).is_some(),
        primary: cap.get(3).is_some(),
        geometry: Geometry {
            width: number(5)?,
            height: number(7)?,
            x: offset(9)?,
            y: offset(10)?,
        },
        size_mm: (number(6)?, number(8)?),
        outputs: cap[11].split_whitespace().map(str::to_string).collect(),
    })
}

/// 确认显示器列表中的每个输出口都出现在详细列表中（只按名称匹配）
pub fn validate_summary(outputs: &[Output], monitors: &[Monitor]) -> Result<(), LayoutError> {
    for monitor in monitors {
        for name in &monitor.outputs {
            if !outputs.iter().any(|o| &o.name == name) {
                return Err(LayoutError::InconsistentSummary { name: name.clone() });
            }
        }
    }
    Ok(())
}

/// 只保留正在被某个显示器使用的输出口，顺序不变
pub fn active_outputs(outputs: Vec<Output>, monitors: &[Monitor]) -> Vec<Output> {
    outputs
        .into_iter()
        .filter(|o| monitors.iter().any(|m| m.outputs.contains(&o.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutParser;

    const SUMMARY: &str = "Monitors: 2
 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1
 1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1
";

    const LISTING: &str = "Screen 0: minimum 320 x 200, current 4480 x 1440, maximum 16384 x 16384
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.00*+  59.97
DP-1 disconnected (normal left inverted right x axis y axis)
HDMI-1 connected 2560x1440+1920+0 (normal left inverted right x axis y axis) 597mm x 336mm
   2560x1440     59.95*+
";

    #[test]
    fn test_parse_summary() {
        let monitors = SummaryParser::parse(SUMMARY).unwrap();

        assert_eq!(monitors.len(), 2);
        assert_eq!(
            monitors[0],
            Monitor {
                index: 0,
                name: "eDP-1".to_string(),
                automatic: true,
                primary: true,
                geometry: Geometry { width: 1920, height: 1080, x: 0, y: 0 },
                size_mm: (344, 194),
                outputs: vec!["eDP-1".to_string()],
            }
        );
        assert!(!monitors[1].primary);
        assert_eq!(monitors[1].geometry.x, 1920);
    }

    #[test]
    fn test_malformed_summary_line() {
        let err = SummaryParser::parse("Monitors: 1\n 0: eDP-1 garbage\n").unwrap_err();
        assert_eq!(
            err,
            LayoutError::MalformedSummaryLine {
                line: 2,
                content: " 0: eDP-1 garbage".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_banner_is_rejected() {
        let line = " 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1";
        assert_eq!(
            SummaryParser::parse(&format!("{}\n", line)),
            Err(LayoutError::MalformedSummaryLine {
                line: 1,
                content: line.to_string(),
            })
        );
        assert!(matches!(
            SummaryParser::parse(""),
            Err(LayoutError::MalformedSummaryLine { line: 1, .. })
        ));
        assert_eq!(SummaryParser::parse("Monitors: 0\n").unwrap(), Vec::new());
    }

    #[test]
    fn test_validate_by_name() {
        let outputs = LayoutParser::parse(LISTING).unwrap();
        let monitors = SummaryParser::parse(SUMMARY).unwrap();
        assert!(validate_summary(&outputs, &monitors).is_ok());

        let summary = "Monitors: 1\n 0: +DP-9 1920/344x1080/194+0+0  DP-9\n";
        let monitors = SummaryParser::parse(summary).unwrap();
        assert_eq!(
            validate_summary(&outputs, &monitors),
            Err(LayoutError::InconsistentSummary { name: "DP-9".to_string() })
        );
    }

    #[test]
    fn test_active_outputs_keeps_listing_order() {
        let outputs = LayoutParser::parse(LISTING).unwrap();
        // 显示器列表顺序与详细列表相反
        let summary = "Monitors: 2
 0: +*HDMI-1 2560/597x1440/336+0+0  HDMI-1
 1: +eDP-1 1920/344x1080/194+2560+0  eDP-1
";
        let monitors = SummaryParser::parse(summary).unwrap();
        let active = active_outputs(outputs, &monitors);

        let names: Vec<&str> = active.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["eDP-1", "HDMI-1"]);
    }

    #[test]
    fn test_virtual_monitor_with_several_outputs() {
        let summary = "Monitors: 1\n 0: *wide 3840/700x1080/190+0+0  eDP-1 HDMI-1\n";
        let monitors = SummaryParser::parse(summary).unwrap();

        assert_eq!(monitors[0].name, "wide");
        assert!(!monitors[0].automatic);
        assert_eq!(monitors[0].outputs, vec!["eDP-1", "HDMI-1"]);

        let outputs = LayoutParser::parse(LISTING).unwrap();
        assert!(validate_summary(&outputs, &monitors).is_ok());
    }
}
