//! # fx-host
//!
//! 在内存页面上运行效果层。
//!
//! ## 用法
//!
//! ```bash
//! # 构建页面、触发就绪、回放场景，输出文档快照与资源统计
//! fx-host run --page page.json --scenario session.json
//!
//! # 只统计每个效果会认领的元素
//! fx-host inspect --page page.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fx_host::{AppConfig, NodeSnapshot, Page, PageLayout, PageReport, PlaybackSummary, Scenario};
use fx_runtime::PageSurvey;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "fx-host")]
#[command(about = "页面效果层的无界面宿主")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行页面并回放场景
    Run {
        /// 页面描述文件
        #[arg(long)]
        page: PathBuf,

        /// 场景文件
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// 统计页面上各效果会认领的元素
    Inspect {
        /// 页面描述文件
        #[arg(long)]
        page: PathBuf,
    },
}

#[derive(Serialize)]
struct RunOutput {
    playback: Option<PlaybackSummary>,
    report: PageReport,
    document: Option<NodeSnapshot>,
}

fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("fx-host error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config);
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.tracing_level()
    };
    init_logging(level);
    config.validate()?;
    info!(config = ?cli.config, "配置就绪");

    match cli.command {
        Commands::Run { page, scenario } => {
            let layout = PageLayout::load(&page)?;
            let mut page = Page::from_layout(&layout, &config);
            page.ready();

            let playback = match scenario {
                Some(path) => Some(Scenario::load(&path)?.play(&mut page)?),
                None => None,
            };

            let output = RunOutput {
                playback,
                report: page.report(),
                document: page.snapshot(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Inspect { page } => {
            let layout = PageLayout::load(&page)?;
            let surface = layout.build(&config.viewport);
            let survey = PageSurvey::collect(&surface, &config.effects);
            println!("{}", serde_json::to_string_pretty(&survey)?);
        }
    }

    Ok(())
}
