//! 日志初始化

use std::path::Path;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::AppConfig;

fn parse_level(level: &str) -> Level {
    level.parse::<Level>().unwrap_or(Level::INFO)
}

/// 构建 fmt 订阅者
///
/// `level` 无法解析时回退到 `info`。
pub fn build_subscriber<W>(level: &str, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// 安装全局日志输出（stderr）。重复初始化会被忽略。
pub fn init_logging(level: &str) {
    let _ = tracing::subscriber::set_global_default(build_subscriber(level, std::io::stderr));
}

/// 加载配置文件
///
/// 全局日志级别取决于配置本身，因此加载期间使用临时订阅者，
/// 保证文件缺失或解析失败时的回退警告能够输出。
pub fn load_config_logged<W>(path: &Path, level: Option<&str>, writer: W) -> AppConfig
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let bootstrap = build_subscriber(level.unwrap_or("info"), writer);
    tracing::subscriber::with_default(bootstrap, || AppConfig::load(path))
}
