//! Deveo Notifier - CI 任务结束时向 Deveo 发送事件通知
//!
//! 流程：主机回调 → 提取修订信息 → 组装事件 → 单次 HTTP 投递。
//! 投递失败只记日志，绝不影响任务本身的成败。

pub mod client;
pub mod config;
pub mod event;
pub mod notifier;
pub mod revision;

pub use client::{ApiKeys, DeveoApi, NotifyError, DEFAULT_TIMEOUT_SECS};
pub use config::{api_keys, JobConfig, NotifierConfig, DEFAULT_HOSTNAME, DEFAULT_PLUGIN_KEY};
pub use event::{BuildOutcome, NotificationEvent, Operation, RepositoryRef};
pub use notifier::{DeveoNotifier, JobContext};
pub use revision::{RevisionInfo, VcsKind};
