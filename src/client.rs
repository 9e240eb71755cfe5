//! Deveo API 客户端
//!
//! 负责把通知事件序列化成 JSON 并以单次 HTTP POST 发送到
//! Deveo 的 events 接口。不做重试：投递是尽力而为，失败由
//! 上层决定如何记录。
//!
//! 认证使用三段式密钥，通过 Authorization 头传递：
//! `deveo plugin_key='..',company_key='..',account_key='..'`

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::event::NotificationEvent;

/// 默认请求超时（秒）- 原实现没有超时，这里必须有界，
/// 避免卡住 CI 主机的收尾钩子
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 三段式 API 密钥
#[derive(Debug, Clone)]
pub struct ApiKeys {
    /// 插件标识密钥（集成本身的固定身份）
    pub plugin_key: String,
    /// 公司级密钥（运维方配置）
    pub company_key: String,
    /// 账号级密钥（每个任务单独配置）
    pub account_key: String,
}

impl ApiKeys {
    pub fn new(
        plugin_key: impl Into<String>,
        company_key: impl Into<String>,
        account_key: impl Into<String>,
    ) -> Self {
        Self {
            plugin_key: plugin_key.into(),
            company_key: company_key.into(),
            account_key: account_key.into(),
        }
    }

    /// 组装 Authorization 头的值
    fn authorization(&self) -> String {
        format!(
            "deveo plugin_key='{}',company_key='{}',account_key='{}'",
            self.plugin_key, self.company_key, self.account_key
        )
    }
}

/// 投递失败 - 消息面向任务控制台日志
#[derive(Debug, Error)]
pub enum NotifyError {
    /// 远端返回非 2xx 状态
    #[error("Deveo API responded with {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    /// 连接失败、超时等传输层错误
    #[error("request to Deveo failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Deveo API 客户端
#[derive(Debug)]
pub struct DeveoApi {
    hostname: String,
    keys: ApiKeys,
    client: reqwest::blocking::Client,
}

impl DeveoApi {
    /// 创建客户端，使用默认超时
    pub fn new(hostname: impl Into<String>, keys: ApiKeys) -> Result<Self, NotifyError> {
        Self::with_timeout(hostname, keys, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// 创建客户端并指定请求超时
    pub fn with_timeout(
        hostname: impl Into<String>,
        keys: ApiKeys,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            hostname: hostname.into(),
            keys,
            client,
        })
    }

    /// 把事件 POST 到 `{hostname}/{resource}`，单次尝试
    ///
    /// 非 2xx 状态、连接失败和超时统一映射为 `NotifyError`，
    /// 不会 panic。
    pub fn create(&self, resource: &str, event: &NotificationEvent) -> Result<(), NotifyError> {
        let url = format!("{}/{}", self.hostname.trim_end_matches('/'), resource);

        debug!(url = %url, operation = %event.operation, "Posting Deveo event");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.keys.authorization())
            .header("Content-Type", "application/json")
            .json(event)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Http { status, body });
        }

        Ok(())
    }
}
