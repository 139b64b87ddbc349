//! # Stat Host CLI
//!
//! headless 模式：在内存文档上模拟统计卡片动画，便于调试配置与时序。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p stat-host -- simulate --value 1,250 --value 40 --update 1=30
//! cargo run -p stat-host -- simulate --value 10 --update 0=20 --update 0=5 --interval 300 --trace
//! cargo run -p stat-host -- format 1234567.891
//! cargo run -p stat-host -- --config config.json check-config
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use stat_host::logging::{init_logging, load_config_logged};
use stat_host::{AppConfig, Dashboard, DomBackend, MemoryDom, NodeId};
use stat_runtime::{Clock, ManualClock, parse_stat_value};

/// 单次步进的最大帧数
const MAX_FRAMES: u64 = 1_000_000;

#[derive(Parser)]
#[command(name = "stat-host")]
#[command(about = "仪表盘统计卡片动画 - headless 模拟工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 日志级别（覆盖配置文件中的 debug.log_level）
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 模拟页面初始化与数值更新
    Simulate {
        /// 每张卡片的原始数值属性（按顺序创建卡片）
        #[arg(short, long = "value", required = true, allow_hyphen_values = true)]
        values: Vec<String>,

        /// 初始化完成后依次执行的更新，格式为 INDEX=VALUE
        #[arg(short, long = "update", value_parser = parse_update)]
        updates: Vec<(usize, f64)>,

        /// 帧率
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,

        /// 相邻更新之间的间隔（毫秒），不指定时等待上一次更新完全结束
        #[arg(long)]
        interval: Option<f64>,

        /// 打印每一帧的文档变更
        #[arg(long)]
        trace: bool,
    },

    /// 按配置的数字格式输出
    Format {
        /// 数值（允许千位分隔符）
        #[arg(allow_hyphen_values = true)]
        number: String,
    },

    /// 检查配置文件
    CheckConfig,
}

fn parse_update(s: &str) -> Result<(usize, f64), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("无效的更新 '{s}'，格式应为 INDEX=VALUE"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("无效的卡片序号 '{index}': {e}"))?;
    let value = parse_stat_value(value.trim()).map_err(|e| e.to_string())?;
    Ok((index, value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig => check_config(&cli.config, cli.log_level.as_deref()),
        Commands::Format { number } => {
            let config = load_config(&cli.config, cli.log_level.as_deref())?;
            let value = parse_stat_value(&number)?;
            println!("{}", config.animation.number_format.format(value));
            Ok(())
        }
        Commands::Simulate {
            values,
            updates,
            fps,
            interval,
            trace,
        } => {
            let config = load_config(&cli.config, cli.log_level.as_deref())?;
            simulate(config, &values, &updates, fps, interval, trace)
        }
    }
}

fn load_config(path: &Path, log_level: Option<&str>) -> Result<AppConfig> {
    let config = load_config_logged(path, log_level, std::io::stderr);
    init_logging(log_level.unwrap_or(&config.debug.log_level));
    config.validate()?;
    Ok(config)
}

fn check_config(path: &Path, log_level: Option<&str>) -> Result<()> {
    init_logging(log_level.unwrap_or("info"));

    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
    let config = AppConfig::from_json_str(&content)?;
    config.validate()?;

    println!("✅ 配置有效: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// headless 帧循环
struct Simulation {
    dashboard: Dashboard<MemoryDom>,
    clock: ManualClock,
    frame_ms: f64,
    trace: bool,
}

impl Simulation {
    fn frame(&mut self) -> bool {
        let pending = self.dashboard.frame();
        if self.trace {
            let now = self.clock.now_ms();
            for mutation in self.dashboard.dom_mut().take_mutations() {
                println!("[{now:>8.1}ms] {mutation:?}");
            }
        }
        self.clock.advance(self.frame_ms);
        pending
    }

    /// 步进直到没有待处理的工作
    fn run_until_idle(&mut self) -> Result<()> {
        for _ in 0..MAX_FRAMES {
            if !self.frame() {
                return Ok(());
            }
        }
        bail!("模拟超过 {MAX_FRAMES} 帧仍未结束");
    }

    /// 步进指定时长
    fn run_for(&mut self, duration_ms: f64) {
        let target = self.clock.now_ms() + duration_ms;
        while self.clock.now_ms() < target {
            self.frame();
        }
    }
}

fn simulate(
    config: AppConfig,
    values: &[String],
    updates: &[(usize, f64)],
    fps: u32,
    interval: Option<f64>,
    trace: bool,
) -> Result<()> {
    if interval.is_some_and(|ms| !ms.is_finite() || ms < 0.0) {
        bail!("间隔必须是非负有限数");
    }

    let mut dom = MemoryDom::new();
    let nodes: Vec<NodeId> = values
        .iter()
        .map(|raw| {
            dom.create_stat_card(
                &config.selectors.card_class,
                &config.selectors.stat_class,
                &config.selectors.value_attribute,
                Some(raw),
            )
            .1
        })
        .collect();

    let clock = ManualClock::new(0.0);
    let mut sim = Simulation {
        dashboard: Dashboard::new(config, dom, Rc::new(clock.clone())),
        clock,
        frame_ms: 1000.0 / f64::from(fps),
        trace,
    };

    sim.dashboard.on_ready();
    sim.run_until_idle()?;

    for &(index, value) in updates {
        let Some(node) = nodes.get(index) else {
            bail!("卡片序号 {index} 超出范围（共 {} 张）", nodes.len());
        };
        sim.dashboard.update_stat(node, value)?;
        match interval {
            Some(interval) => sim.run_for(interval),
            None => sim.run_until_idle()?,
        }
    }
    sim.run_until_idle()?;

    let card_class = &sim.dashboard.config().selectors.card_class;
    let dom = sim.dashboard.dom();
    for (index, node) in nodes.iter().enumerate() {
        let classes = dom
            .closest_with_class(node, card_class)
            .map(|card| dom.classes(card).join(" "))
            .unwrap_or_default();
        println!("#{index} {} [{classes}]", dom.text(*node));
    }
    Ok(())
}
