//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 stat-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `wasm-check`: 以 wasm32 目标检查 `web` feature
//! - `config-check`: 检查配置文件

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stat_host::AppConfig;
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 stat-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 以 wasm32-unknown-unknown 目标检查 web 绑定
    WasmCheck,
    /// 检查配置文件（默认 config.json；传入目录时检查其中所有 .json 文件）
    ConfigCheck { path: Option<PathBuf> },
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    match cmd!(sh, "cargo llvm-cov --version").quiet().run() {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Commands::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            step("cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Commands::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p stat-runtime --all-features --html");
            cmd!(sh, "cargo llvm-cov -p stat-runtime --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // web feature 需要 wasm 目标，不计入覆盖率；排除 xtask 以免稀释信号
            step("cargo llvm-cov --workspace --exclude xtask --html");
            cmd!(sh, "cargo llvm-cov --workspace --exclude xtask --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::WasmCheck => {
            step("cargo check -p stat-host --target wasm32-unknown-unknown --features web");
            cmd!(
                sh,
                "cargo check -p stat-host --target wasm32-unknown-unknown --no-default-features --features web"
            )
            .run()?;
        }
        Commands::ConfigCheck { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from("config.json"));
            config_check(&path)?;
        }
    }

    Ok(())
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 收集待检查的配置文件
fn collect_config_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("路径不存在: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let file = entry?.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// 检查单个配置文件，返回错误描述
fn check_config_file(file: &Path) -> Option<String> {
    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => return Some(format!("无法读取文件 - {e}")),
    };
    AppConfig::from_json_str(&content)
        .and_then(|config| config.validate())
        .err()
        .map(|e| e.to_string())
}

fn config_check(path: &Path) -> anyhow::Result<()> {
    let files = collect_config_files(path)?;
    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut error_count = 0;
    for file in &files {
        match check_config_file(file) {
            Some(e) => {
                eprintln!("[ERROR] {}: {e}", file.display());
                error_count += 1;
            }
            None => eprintln!("[OK] {}", file.display()),
        }
    }

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {error_count} 个错误");
        anyhow::bail!("配置检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}
