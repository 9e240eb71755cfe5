//! 通知事件结构 - 每次构建结束时组装一份，发送后即丢弃
//!
//! 线上格式（JSON 键名固定，全部为字符串）：
//! ```json
//! {
//!   "operation": "completed",
//!   "job_name": "app-build",
//!   "project_id": "P1",
//!   "repository_id": "R1",
//!   "ref": "main",
//!   "revision_id": "abc123",
//!   "build_url": "http://ci/42"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::revision::RevisionInfo;

/// 远端系统中被跟踪仓库的标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// 项目 ID
    pub project_id: String,
    /// 仓库 ID
    pub repository_id: String,
}

impl RepositoryRef {
    pub fn new(project_id: impl Into<String>, repository_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            repository_id: repository_id.into(),
        }
    }
}

/// 构建的终态结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
}

impl FromStr for BuildOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "unstable" => Ok(Self::Unstable),
            "aborted" => Ok(Self::Aborted),
            "not_built" | "notbuilt" => Ok(Self::NotBuilt),
            other => Err(format!("unknown build result: {}", other)),
        }
    }
}

/// 事件操作类型 - 只有 Success 映射到 completed，其余一律 failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Completed,
    Failed,
}

impl Operation {
    pub fn from_outcome(outcome: BuildOutcome) -> Self {
        match outcome {
            BuildOutcome::Success => Self::Completed,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// 通知事件 - 构造后不可变，所有字段保证有值（可以是空串）
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub operation: Operation,
    pub job_name: String,
    pub project_id: String,
    pub repository_id: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub revision_id: String,
    pub build_url: String,
}

impl NotificationEvent {
    /// 从构建结果和修订信息组装事件（纯转换，无 I/O）
    pub fn new(
        outcome: BuildOutcome,
        job_name: impl Into<String>,
        repository: &RepositoryRef,
        revision: &RevisionInfo,
        build_url: impl Into<String>,
    ) -> Self {
        Self {
            operation: Operation::from_outcome(outcome),
            job_name: job_name.into(),
            project_id: repository.project_id.clone(),
            repository_id: repository.repository_id.clone(),
            git_ref: revision.branch.clone(),
            revision_id: revision.revision_id.clone(),
            build_url: build_url.into(),
        }
    }
}
