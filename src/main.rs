//! onest-pattern 命令行入口
//! 用于在终端调试条目正则、预览文件名模板、批量推导候选列表

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use onest_pattern::{
    ConfigManager, MatchConfig, MatchPolicy, MatchedCandidate, PatternCompiler, PatternError,
    RawCandidate, TemplateSubstitutor,
};

/// 条目正则与文件名模板调试工具
#[derive(Parser)]
#[command(name = "onest-pattern")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 输出调试日志（可用 RUST_LOG 覆盖）
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 校验正则，输出改写后的表达式
    Check {
        /// 条目正则（支持 \p{Han} 简写）
        regexp: String,
    },
    /// 对单条文本渲染模板
    Render {
        #[arg(short, long)]
        regexp: String,

        #[arg(short, long)]
        pattern: String,

        /// 待匹配文本
        text: String,
    },
    /// 对一批候选消息推导匹配结果，输出 JSON
    Derive(DeriveArgs),
}

#[derive(Args)]
struct DeriveArgs {
    /// 候选消息 JSON 数组文件
    #[arg(short, long, value_name = "FILE")]
    candidates: PathBuf,

    /// 表单配置 JSON 文件，命令行参数会覆盖其中的同名字段
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 上一轮推导结果 JSON 文件（保留用户的选择与优先级）
    #[arg(long, value_name = "FILE")]
    prior: Option<PathBuf>,

    #[arg(short, long)]
    regexp: Option<String>,

    #[arg(short, long)]
    pattern: Option<String>,

    #[arg(long)]
    match_pattern: Option<String>,

    #[arg(long)]
    match_content: Option<String>,

    /// 格式化输出
    #[arg(long)]
    pretty: bool,
}

impl DeriveArgs {
    fn load_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigManager::from_json_file(path)
                .with_context(|| format!("读取配置失败：{}", path.display()))?,
            None => ConfigManager::get_default(),
        };
        if let Some(regexp) = &self.regexp {
            config.regexp = regexp.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(match_pattern) = &self.match_pattern {
            config.match_pattern = match_pattern.clone();
        }
        if let Some(match_content) = &self.match_content {
            config.match_content = match_content.clone();
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("读取文件失败：{}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("JSON解析失败：{}", path.display()))
}

fn run_check(regexp: &str) -> Result<ExitCode> {
    match PatternCompiler::compile(regexp) {
        Ok(pattern) => {
            println!("{}", pattern.expanded());
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ PatternError::CompileError { .. }) | Err(e @ PatternError::EmptyPattern) => {
            eprintln!("{}", e.field_message());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn run_render(regexp: &str, pattern: &str, text: &str) -> Result<ExitCode> {
    let compiled = PatternCompiler::compile(regexp).context("正则无效")?;
    if !compiled.is_match(text) {
        debug!("文本未匹配，占位符将全部替换为空");
    }
    println!("{}", TemplateSubstitutor::substitute(text, &compiled, pattern));
    Ok(ExitCode::SUCCESS)
}

fn run_derive(args: &DeriveArgs) -> Result<ExitCode> {
    let config = args.load_config()?;
    let candidates: Vec<RawCandidate> = read_json(&args.candidates)?;
    let prior: Option<Vec<MatchedCandidate>> = args
        .prior
        .as_deref()
        .map(read_json::<Vec<MatchedCandidate>>)
        .transpose()?;

    // 正则无效时沿用上一轮结果，同时在 stderr 提示
    let pattern = match PatternCompiler::compile_optional(&config.regexp) {
        Ok(pattern) => pattern,
        Err(e) => {
            eprintln!("{}", e.field_message());
            None
        }
    };

    let derived = MatchPolicy::derive_with_config(&candidates, prior.as_deref(), pattern.as_ref(), &config);
    debug!("推导完成，可提交{}条", MatchPolicy::chosen(&derived).len());

    let output = if args.pretty {
        serde_json::to_string_pretty(&derived)?
    } else {
        serde_json::to_string(&derived)?
    };
    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Check { regexp } => run_check(regexp),
        Commands::Render { regexp, pattern, text } => run_render(regexp, pattern, text),
        Commands::Derive(args) => run_derive(args),
    }
}
