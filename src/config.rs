//! 通知器配置
//!
//! 进程级配置（hostname / plugin_key / company_key）在进程启动时
//! 加载一次，之后只读，通过参数显式传入分发器，不走全局状态。
//!
//! 加载优先级：
//! 1. 配置文件 `~/.config/deveo-notifier/config.json`
//! 2. 环境变量 `DEVEO_HOSTNAME` / `DEVEO_COMPANY_KEY` / `DEVEO_PLUGIN_KEY`
//! 3. 内置默认值

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::client::{ApiKeys, DEFAULT_TIMEOUT_SECS};
use crate::event::RepositoryRef;

/// 默认 Deveo 服务地址
pub const DEFAULT_HOSTNAME: &str = "https://deveo.com";

/// 本集成的固定插件密钥
pub const DEFAULT_PLUGIN_KEY: &str = "3c94d47d6257ca0d3bc54a9b6a91aa64";

/// 进程级配置 - 构造后不可变
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Deveo 服务地址
    pub hostname: String,
    /// 插件密钥
    pub plugin_key: String,
    /// 公司密钥（运维方提供）
    pub company_key: String,
    /// HTTP 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            plugin_key: DEFAULT_PLUGIN_KEY.to_string(),
            company_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 配置文件的 JSON 结构（所有字段可选）
#[derive(Debug, Deserialize)]
struct ConfigFile {
    hostname: Option<String>,
    plugin_key: Option<String>,
    company_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl NotifierConfig {
    /// 按优先级加载配置
    pub fn auto_load() -> Self {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config/deveo-notifier/config.json");
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(file_config) => {
                        debug!(path = %path.display(), "Loaded Deveo config file");
                        config = file_config;
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    }
                }
            }
        }

        config.apply_env();
        config
    }

    /// 从 JSON 文件加载，文件中缺失的字段用默认值补齐
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;

        let defaults = Self::default();
        Ok(Self {
            hostname: file.hostname.unwrap_or(defaults.hostname),
            plugin_key: file.plugin_key.unwrap_or(defaults.plugin_key),
            company_key: file.company_key.unwrap_or(defaults.company_key),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        })
    }

    /// 环境变量覆盖（非空才生效）
    fn apply_env(&mut self) {
        if let Ok(hostname) = std::env::var("DEVEO_HOSTNAME") {
            if !hostname.is_empty() {
                self.hostname = hostname;
            }
        }
        if let Ok(company_key) = std::env::var("DEVEO_COMPANY_KEY") {
            if !company_key.is_empty() {
                self.company_key = company_key;
            }
        }
        if let Ok(plugin_key) = std::env::var("DEVEO_PLUGIN_KEY") {
            if !plugin_key.is_empty() {
                self.plugin_key = plugin_key;
            }
        }
    }
}

/// 每个任务的配置 - 由 CI 任务的构建步骤提供
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// 账号密钥
    pub account_key: String,
    /// 项目 ID
    pub project_id: String,
    /// 仓库 ID
    pub repository_id: String,
}

impl JobConfig {
    pub fn new(
        account_key: impl Into<String>,
        project_id: impl Into<String>,
        repository_id: impl Into<String>,
    ) -> Self {
        Self {
            account_key: account_key.into(),
            project_id: project_id.into(),
            repository_id: repository_id.into(),
        }
    }

    /// 任务对应的仓库标识
    pub fn repository(&self) -> RepositoryRef {
        RepositoryRef::new(self.project_id.clone(), self.repository_id.clone())
    }
}

/// 组装完整的三段式密钥
pub fn api_keys(config: &NotifierConfig, job: &JobConfig) -> ApiKeys {
    ApiKeys::new(
        config.plugin_key.clone(),
        config.company_key.clone(),
        job.account_key.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NotifierConfig::default();
        assert_eq!(config.hostname, DEFAULT_HOSTNAME);
        assert_eq!(config.plugin_key, DEFAULT_PLUGIN_KEY);
        assert_eq!(config.company_key, "");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"hostname": "https://deveo.example.com", "company_key": "ck"}}"#
        )
        .unwrap();

        let config = NotifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hostname, "https://deveo.example.com");
        assert_eq!(config.company_key, "ck");
        // 未出现的字段回落到默认值
        assert_eq!(config.plugin_key, DEFAULT_PLUGIN_KEY);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(NotifierConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_api_keys_combines_both_levels() {
        let config = NotifierConfig {
            company_key: "company".to_string(),
            ..Default::default()
        };
        let job = JobConfig::new("account", "P1", "R1");

        let keys = api_keys(&config, &job);
        assert_eq!(keys.plugin_key, DEFAULT_PLUGIN_KEY);
        assert_eq!(keys.company_key, "company");
        assert_eq!(keys.account_key, "account");
    }

    #[test]
    fn test_env_overrides() {
        // 只有本测试读写这些变量，和其他用例并行安全
        std::env::set_var("DEVEO_HOSTNAME", "https://deveo.env.example");
        std::env::set_var("DEVEO_COMPANY_KEY", "env-ck");

        let mut config = NotifierConfig::default();
        config.apply_env();

        std::env::remove_var("DEVEO_HOSTNAME");
        std::env::remove_var("DEVEO_COMPANY_KEY");

        assert_eq!(config.hostname, "https://deveo.env.example");
        assert_eq!(config.company_key, "env-ck");
        assert_eq!(config.plugin_key, DEFAULT_PLUGIN_KEY);
    }

    #[test]
    fn test_job_repository() {
        let job = JobConfig::new("ak", "P1", "R1");
        let repo = job.repository();
        assert_eq!(repo.project_id, "P1");
        assert_eq!(repo.repository_id, "R1");
    }
}
