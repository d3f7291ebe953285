use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::layout::{Connection, Geometry, LayoutError, Mode, ModeRef, Output};

// 分辨率: 1920x1080（隔行模式会带 i 后缀，这里不关心）
static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)x(\d+)").expect("分辨率正则无效"));

// 刷新率: 空白后的 60.00，跟可选的 *（当前）和 +（推荐），xrandr 在没有 * 时用一个空格占位
static RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d+\.\d+)(\*)?(?: ?(\+))?").expect("刷新率正则无效"));

// 标题行中的当前区域: 1920x1080+0+0
static GEOMETRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)x(\d+)\+(-?\d+)\+(-?\d+)$").expect("区域正则无效"));

/// 一个刷新率及其标记
struct RateToken {
    rate: String,
    selected: bool,
    preferred: bool,
}

/// xrandr 详细列表解析器
pub struct LayoutParser;

impl LayoutParser {
    /// 解析 `xrandr` 的输出，第一行是屏幕信息，直接跳过
    pub fn parse(content: &str) -> Result<Vec<Output>, LayoutError> {
        let mut outputs: Vec<Output> = Vec::new();

        for (index, line) in content.lines().enumerate().skip(1) {
            let line_number = index + 1;

            // 末尾的空行
            if line.is_empty() {
                continue;
            }

            if is_header(line) {
                let output = parse_header(line);
                if outputs.iter().any(|o| o.name == output.name) {
                    warn!("第 {} 行: 输出口 {} 重复出现，两者都会保留", line_number, output.name);
                }
                debug!("第 {} 行: 输出口 {} ({:?})", line_number, output.name, output.connection);
                outputs.push(output);
                continue;
            }

            let Some(current) = outputs.last_mut() else {
                return Err(LayoutError::OrphanModeLine {
                    line: line_number,
                    content: line.to_string(),
                });
            };

            let (mode, tokens) = parse_mode_line(line, line_number)?;
            trace!(
                "第 {} 行: {} 的模式 {}x{} {:?}",
                line_number,
                current.name,
                mode.width,
                mode.height,
                mode.rates
            );
            current.modes.push(mode);
            let mode_index = current.modes.len() - 1;

            let selected: Vec<usize> = positions(&tokens, |t| t.selected);
            if !selected.is_empty() {
                current.selected = Some(ModeRef {
                    mode: mode_index,
                    rates: selected,
                });
            }

            let preferred: Vec<usize> = positions(&tokens, |t| t.preferred);
            if !preferred.is_empty() {
                current.preferred = Some(ModeRef {
                    mode: mode_index,
                    rates: preferred,
                });
            }
        }

        debug!("解析完成，共 {} 个输出口", outputs.len());
        Ok(outputs)
    }
}

/// 首字符不是空白的行是输出口标题
fn is_header(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn parse_header(line: &str) -> Output {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = tokens.collect();

    let connection = match rest.first().copied() {
        Some("connected") => Connection::Connected,
        Some("disconnected") => Connection::Disconnected,
        _ => Connection::Unknown,
    };
    let primary = rest.contains(&"primary");
    let geometry = rest.iter().find_map(|token| parse_geometry(token));

    Output {
        name,
        connection,
        primary,
        geometry,
        modes: Vec::new(),
        selected: None,
        preferred: None,
    }
}

fn parse_geometry(token: &str) -> Option<Geometry> {
    let cap = GEOMETRY_RE.captures(token)?;
    Some(Geometry {
        width: cap[1].parse().ok()?,
        height: cap[2].parse().ok()?,
        x: cap[3].parse().ok()?,
        y: cap[4].parse().ok()?,
    })
}

fn parse_mode_line(line: &str, line_number: usize) -> Result<(Mode, Vec<RateToken>), LayoutError> {
    let malformed = || LayoutError::MalformedModeLine {
        line: line_number,
        content: line.to_string(),
    };

    let mut resolutions = RESOLUTION_RE.captures_iter(line);
    let cap = resolutions.next().ok_or_else(malformed)?;
    if resolutions.next().is_some() {
        return Err(malformed());
    }

    let width: u32 = cap[1].parse().map_err(|_| malformed())?;
    let height: u32 = cap[2].parse().map_err(|_| malformed())?;
    if width == 0 || height == 0 {
        return Err(malformed());
    }

    // 跳过模式名的剩余部分（如 1920x1080_60.00、1920x1080i），只在之后查找刷新率
    let name_end = cap.get(0).map_or(line.len(), |m| m.end());
    let tail_start = line[name_end..]
        .find(char::is_whitespace)
        .map_or(line.len(), |offset| name_end + offset);
    let tokens: Vec<RateToken> = RATE_RE
        .captures_iter(&line[tail_start..])
        .map(|c| RateToken {
            rate: c[1].to_string(),
            selected: c.get(2).is_some(),
            preferred: c.get(3).is_some(),
        })
        .collect();

    let mode = Mode {
        width,
        height,
        rates: tokens.iter().map(|t| t.rate.clone()).collect(),
    };
    Ok((mode, tokens))
}

fn positions(tokens: &[RateToken], flag: impl Fn(&RateToken) -> bool) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| flag(t).then_some(i))
        .collect()
}
