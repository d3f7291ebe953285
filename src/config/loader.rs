use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// xrandr 命令设置
    pub xrandr: XrandrConfig,

    /// 输出设置
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct XrandrConfig {
    /// 命令路径
    pub command: String,

    /// 获取详细列表时的参数
    pub listing_args: Vec<String>,

    /// 获取显示器列表时的参数，为空时不获取
    pub summary_args: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// 是否格式化 JSON
    pub pretty: bool,

    /// 是否用显示器列表校验详细列表
    pub validate_summary: bool,

    /// 是否只输出正在使用的输出口
    pub active_only: bool,

    /// 是否同时输出显示器列表
    pub include_monitors: bool,
}

impl Default for XrandrConfig {
    fn default() -> Self {
        XrandrConfig {
            command: "xrandr".to_string(),
            listing_args: Vec::new(),
            summary_args: vec!["--listmonitors".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            pretty: true,
            validate_summary: true,
            active_only: false,
            include_monitors: false,
        }
    }
}

impl Config {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        let pkg_name = env!("CARGO_PKG_NAME");
        dirs::config_dir()
            .map(|p| p.join(pkg_name).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(format!("{}-config.toml", pkg_name)))
    }

    /// 加载配置，支持从指定路径或默认路径加载
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        debug!("尝试从 {:?} 加载配置文件", config_path);

        if !config_path.exists() {
            debug!("配置文件 {:?} 不存在，将创建默认配置", config_path);
            let default_config = Config::default();
            let toml = toml::to_string_pretty(&default_config)?;

            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建目录 {:?}", parent))?;
                debug!("已确保目录 {:?} 存在", parent);
            }

            fs::write(&config_path, toml)
                .with_context(|| format!("无法写入配置文件 {:?}", config_path))?;
            info!("已创建默认配置文件: {:?}", config_path);
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("无法读取配置文件 {:?}", config_path))?;
        let config: Config = match toml::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("解析配置文件 {:?} 失败: {}", config_path, e);
                warn!("由于解析错误，将加载默认配置");
                Config::default()
            }
        };

        debug!("已成功加载配置文件");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        // 再次加载应读到同样的内容
        assert_eq!(Config::load(Some(path)).unwrap(), Config::default());
    }

    #[test]
    fn test_reads_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[xrandr]
command = "/usr/bin/xrandr"
listing_args = ["--current"]
summary_args = []

[output]
pretty = false
validate_summary = false
active_only = true
include_monitors = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.xrandr.command, "/usr/bin/xrandr");
        assert_eq!(config.xrandr.listing_args, vec!["--current"]);
        assert!(config.xrandr.summary_args.is_empty());
        assert!(!config.output.pretty);
        assert!(config.output.active_only);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[xrandr]\ncommand = 42\n").unwrap();

        assert_eq!(Config::load(Some(path)).unwrap(), Config::default());
    }
}
