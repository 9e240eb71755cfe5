//! 通知分发器 - 构建结束钩子与 Deveo API 之间的隔离层
//!
//! `notify` 是失败隔离边界：环境读取失败降级成空修订信息，
//! 投递失败只写日志。任何情况下都不向调用方返回错误，CI 任务
//! 自身的成败绝不受通知结果影响。
//!
//! 每次任务结束只调用一次，调用之间没有共享可变状态，主机并发
//! 触发多个任务时各自独立。

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, warn};

use crate::client::{ApiKeys, DeveoApi};
use crate::config::{api_keys, JobConfig, NotifierConfig};
use crate::event::{BuildOutcome, NotificationEvent};
use crate::revision::{RevisionInfo, ENV_BUILD_URL};

/// events 接口的资源路径
const EVENTS_RESOURCE: &str = "events";

/// 主机回调接口 - CI 主机在任务终态确定后提供这些信息
pub trait JobContext {
    /// 任务显示名
    fn job_name(&self) -> &str;

    /// 任务的终态结果
    fn outcome(&self) -> BuildOutcome;

    /// 环境变量快照（主机侧可能因 I/O 失败而出错）
    fn build_environment(&self) -> Result<HashMap<String, String>>;
}

/// 通知分发器
#[derive(Debug)]
pub struct DeveoNotifier {
    config: NotifierConfig,
    job: JobConfig,
}

impl DeveoNotifier {
    pub fn new(config: NotifierConfig, job: JobConfig) -> Self {
        Self { config, job }
    }

    /// 发送一次任务结束通知，永不失败
    ///
    /// 投递出错时写两行日志：固定的标记行和错误消息，然后正常
    /// 返回。
    pub fn notify(&self, job: &dyn JobContext) {
        let env = self.environment(job);
        let revision = RevisionInfo::from_env(&env);
        let build_url = env.get(ENV_BUILD_URL).cloned().unwrap_or_default();

        let event = NotificationEvent::new(
            job.outcome(),
            job.job_name(),
            &self.job.repository(),
            &revision,
            build_url,
        );

        if let Err(e) = self.send(&event) {
            error!("Deveo: failed to create event");
            error!("Deveo: {}", e);
        }
    }

    /// 读取环境快照，失败时记一行日志并降级为空快照
    fn environment(&self, job: &dyn JobContext) -> HashMap<String, String> {
        match job.build_environment() {
            Ok(env) => env,
            Err(e) => {
                warn!(job = job.job_name(), error = %e, "Build environment unavailable, sending event without revision info");
                HashMap::new()
            }
        }
    }

    fn send(&self, event: &NotificationEvent) -> Result<(), crate::client::NotifyError> {
        let keys: ApiKeys = api_keys(&self.config, &self.job);
        let api = DeveoApi::with_timeout(
            self.config.hostname.clone(),
            keys,
            Duration::from_secs(self.config.timeout_secs),
        )?;
        api.create(EVENTS_RESOURCE, event)
    }
}
