//! deveo-notify CLI
//!
//! 面向 CI 主机的薄封装：任务结束后由 post-build 钩子调用，
//! 从进程环境读取变量快照，组装并发送 Deveo 事件。
//! 参数解析通过后退出码恒为 0 —— 通知失败不能让任务失败。

use std::collections::HashMap;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use deveo_notifier::{BuildOutcome, DeveoNotifier, JobConfig, JobContext, NotifierConfig};

#[derive(Parser)]
#[command(name = "deveo-notify")]
#[command(about = "Send a job-completion event to Deveo")]
#[command(version)]
struct Cli {
    /// 任务显示名
    #[arg(long)]
    job_name: String,

    /// 任务终态结果 (success / failure / unstable / aborted / not_built)
    #[arg(long)]
    result: BuildOutcome,

    /// 账号密钥（任务级）
    #[arg(long)]
    account_key: String,

    /// Deveo 项目 ID
    #[arg(long)]
    project_id: String,

    /// Deveo 仓库 ID
    #[arg(long)]
    repository_id: String,

    /// 覆盖配置的 Deveo 服务地址
    #[arg(long)]
    hostname: Option<String>,

    /// 覆盖配置的公司密钥
    #[arg(long)]
    company_key: Option<String>,

    /// 覆盖 HTTP 请求超时（秒）
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// 以当前进程环境作为构建环境快照
struct ProcessJob {
    name: String,
    outcome: BuildOutcome,
}

impl JobContext for ProcessJob {
    fn job_name(&self) -> &str {
        &self.name
    }

    fn outcome(&self) -> BuildOutcome {
        self.outcome
    }

    fn build_environment(&self) -> Result<HashMap<String, String>> {
        Ok(std::env::vars().collect())
    }
}

fn main() {
    // 日志级别由 RUST_LOG 控制，默认 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("deveo_notifier=info,deveo_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let mut config = NotifierConfig::auto_load();
    if let Some(hostname) = cli.hostname {
        config.hostname = hostname;
    }
    if let Some(company_key) = cli.company_key {
        config.company_key = company_key;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    let job_config = JobConfig::new(cli.account_key, cli.project_id, cli.repository_id);
    let job = ProcessJob {
        name: cli.job_name,
        outcome: cli.result,
    };

    DeveoNotifier::new(config, job_config).notify(&job);
}
