use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use randr_layout::app::App;
use randr_layout::config::Config;
use randr_layout::source::{FileSource, LayoutSource, XrandrSource};

/// 将 xrandr 的输出解析为 JSON
#[derive(Debug, Parser)]
#[command(name = "randr-layout", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 从文件读取详细列表，而不是执行 xrandr
    #[arg(long)]
    listing: Option<PathBuf>,

    /// 从文件读取显示器列表（需要同时指定 --listing）
    #[arg(long, requires = "listing")]
    summary: Option<PathBuf>,

    /// 不使用显示器列表校验
    #[arg(long)]
    no_validate: bool,

    /// 只输出正在使用的输出口
    #[arg(long)]
    active_only: bool,

    /// 同时输出显示器列表
    #[arg(long)]
    monitors: bool,

    /// 输出紧凑的 JSON
    #[arg(long)]
    compact: bool,

    /// 日志详细程度，可重复
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut Config) {
        if self.no_validate {
            config.output.validate_summary = false;
        }
        if self.active_only {
            config.output.active_only = true;
        }
        if self.monitors {
            config.output.include_monitors = true;
        }
        if self.compact {
            config.output.pretty = false;
        }
    }

    fn source(&self, config: &Config) -> Box<dyn LayoutSource> {
        match &self.listing {
            Some(listing) => Box::new(FileSource::new(listing.clone(), self.summary.clone())),
            None => Box::new(XrandrSource::new(config.xrandr.clone())),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.clone())?;
    cli.apply(&mut config);
    debug!("当前配置: {:?}", config);

    let source = cli.source(&config);
    let app = App::new(Arc::new(config));
    let json = app.run(source.as_ref()).await?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
