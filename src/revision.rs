//! 版本控制上下文提取 - 从构建环境变量中归一化出修订信息
//!
//! CI 主机在构建结束时提供一份环境变量快照，Git 和 Subversion
//! 构建暴露的键不同。这里统一成 `RevisionInfo`，缺失的键一律
//! 当作空字符串处理，绝不报错。

use std::collections::HashMap;

/// Git commit 哈希的环境变量键
pub const ENV_GIT_COMMIT: &str = "GIT_COMMIT";

/// Git 分支的环境变量键
pub const ENV_GIT_BRANCH: &str = "GIT_BRANCH";

/// Subversion 修订号的环境变量键
pub const ENV_SVN_REVISION: &str = "SVN_REVISION";

/// 构建页面 URL 的环境变量键
pub const ENV_BUILD_URL: &str = "BUILD_URL";

/// 版本控制系统类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    Svn,
    Unknown,
}

/// 归一化后的修订信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    /// VCS 类型
    pub vcs: VcsKind,
    /// 分支名（非 Git 构建为空）
    pub branch: String,
    /// commit 哈希或 SVN 修订号（可能为空）
    pub revision_id: String,
}

impl RevisionInfo {
    /// 空修订信息 - 环境快照不可用时的降级值
    pub fn empty() -> Self {
        Self {
            vcs: VcsKind::Unknown,
            branch: String::new(),
            revision_id: String::new(),
        }
    }

    /// 从环境变量快照提取修订信息
    ///
    /// 检测规则：`GIT_COMMIT` 非空即认为是 Git 构建，否则按
    /// SVN 处理（`SVN_REVISION` 也缺失时 VCS 类型为 Unknown）。
    /// Git 分支名去掉开头的一个 `origin/` 前缀。
    pub fn from_env(env: &HashMap<String, String>) -> Self {
        let git_commit = lookup(env, ENV_GIT_COMMIT);

        if !git_commit.trim().is_empty() {
            let branch = lookup(env, ENV_GIT_BRANCH);
            return Self {
                vcs: VcsKind::Git,
                branch: strip_origin(&branch),
                revision_id: git_commit,
            };
        }

        let svn_revision = lookup(env, ENV_SVN_REVISION);
        let vcs = if svn_revision.is_empty() {
            VcsKind::Unknown
        } else {
            VcsKind::Svn
        };

        Self {
            vcs,
            branch: String::new(),
            revision_id: svn_revision,
        }
    }
}

/// 读取环境变量，缺失时返回空字符串
fn lookup(env: &HashMap<String, String>, key: &str) -> String {
    env.get(key).cloned().unwrap_or_default()
}

/// 去掉分支名开头的 `origin/` 前缀（只处理开头的一次）
fn strip_origin(branch: &str) -> String {
    branch
        .strip_prefix("origin/")
        .unwrap_or(branch)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_git_commit_wins() {
        let info = RevisionInfo::from_env(&env(&[
            ("GIT_COMMIT", "abc123"),
            ("GIT_BRANCH", "origin/main"),
            ("SVN_REVISION", "42"),
        ]));

        assert_eq!(info.vcs, VcsKind::Git);
        assert_eq!(info.revision_id, "abc123");
        assert_eq!(info.branch, "main");
    }

    #[test]
    fn test_blank_git_commit_falls_back_to_svn() {
        let info = RevisionInfo::from_env(&env(&[
            ("GIT_COMMIT", "   "),
            ("SVN_REVISION", "42"),
        ]));

        assert_eq!(info.vcs, VcsKind::Svn);
        assert_eq!(info.revision_id, "42");
        assert_eq!(info.branch, "");
    }

    #[test]
    fn test_branch_without_origin_prefix() {
        let info = RevisionInfo::from_env(&env(&[
            ("GIT_COMMIT", "abc123"),
            ("GIT_BRANCH", "main"),
        ]));

        assert_eq!(info.branch, "main");
    }

    #[test]
    fn test_origin_stripped_only_at_start() {
        // 只去掉开头的前缀，中间出现的 origin/ 保留
        let info = RevisionInfo::from_env(&env(&[
            ("GIT_COMMIT", "abc123"),
            ("GIT_BRANCH", "origin/feature/origin/x"),
        ]));

        assert_eq!(info.branch, "feature/origin/x");
    }

    #[test]
    fn test_empty_env() {
        let info = RevisionInfo::from_env(&HashMap::new());

        assert_eq!(info.vcs, VcsKind::Unknown);
        assert_eq!(info.branch, "");
        assert_eq!(info.revision_id, "");
        assert_eq!(info, RevisionInfo::empty());
    }

    #[test]
    fn test_git_branch_missing() {
        let info = RevisionInfo::from_env(&env(&[("GIT_COMMIT", "abc123")]));

        assert_eq!(info.vcs, VcsKind::Git);
        assert_eq!(info.revision_id, "abc123");
        assert_eq!(info.branch, "");
    }
}
