// 配置管理模块：命令行与可选的 TOML 配置文件合并为一个 AppConfig，
// 在启动时构造一次并以引用传入各入口

use crate::error::{ProbeError, Result};
use crate::stats::SizeMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认根证书文件
pub const DEFAULT_ROOT_CERT: &str = "rootPEM.txt";

/// TLS 信任库配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// 额外信任的根证书（PEM）
    pub root_cert: PathBuf,
    /// 是否同时信任系统根证书
    pub system_roots: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            root_cert: PathBuf::from(DEFAULT_ROOT_CERT),
            system_roots: true,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 单次请求模式的 URL
    pub url: Option<String>,
    /// 性能分析模式的请求次数（0 表示不运行）
    pub profile: u32,
    /// 性能分析报告使用精确字节数而不是近似大小
    pub exact_size: bool,
    /// TLS 配置
    pub tls: TlsSettings,
}

impl AppConfig {
    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Failed to parse configuration")?;
        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.tls.root_cert.as_os_str().is_empty() {
            return Err(ProbeError::config_error("tls.root_cert cannot be empty"));
        }
        if let Some(ref url) = self.url {
            if url.trim() != url {
                return Err(ProbeError::config_error(
                    "url must not have leading or trailing whitespace",
                ));
            }
        }
        Ok(())
    }

    /// 单次请求 URL，空字符串视为未设置
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    /// 性能分析报告使用的大小口径
    pub fn size_mode(&self) -> SizeMode {
        if self.exact_size {
            SizeMode::Exact
        } else {
            SizeMode::Approximate
        }
    }
}
