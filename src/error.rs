/// 自定义错误类型
///
/// 使用 thiserror 定义精确的错误类型，调用者据此区分
/// 可恢复的 URL 解析错误与必须终止进程的网络/证书错误
use std::io;
use thiserror::Error;

/// HTTP Probe 的主要错误类型
#[derive(Error, Debug)]
pub enum ProbeError {
    /// URL 中既没有 https:// 也没有 http://
    #[error("Unsupported or missing scheme in '{url}': please include http or https in the URL")]
    UnsupportedScheme { url: String },

    /// URL 无法解析或缺少主机
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// 连接失败
    #[error("Error connecting to {host}: {source}")]
    ConnectionFailed {
        host: String,
        #[source]
        source: io::Error,
    },

    /// 读取状态行失败
    #[error("Error reading response from {host}: {source}")]
    ReadFailed {
        host: String,
        #[source]
        source: io::Error,
    },

    /// 对端在发送状态行之前关闭了连接
    #[error("Empty response from {host}: connection closed before the status line")]
    EmptyResponse { host: String },

    /// 状态行格式错误
    #[error("Malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// 根证书池构建失败
    #[error("Trust store error: {0}")]
    TrustStore(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 其他错误（保留与 anyhow 的兼容性）
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// 创建不支持的协议错误
    pub fn unsupported_scheme(url: impl Into<String>) -> Self {
        Self::UnsupportedScheme { url: url.into() }
    }

    /// 创建 URL 无效错误
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// 创建连接失败错误
    pub fn connection_failed(host: impl Into<String>, source: io::Error) -> Self {
        Self::ConnectionFailed {
            host: host.into(),
            source,
        }
    }

    /// 创建读取失败错误
    pub fn read_failed(host: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailed {
            host: host.into(),
            source,
        }
    }

    /// 创建证书池错误
    pub fn trust_store(msg: impl Into<String>) -> Self {
        Self::TrustStore(msg.into())
    }

    /// 创建配置错误
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 在打开任何连接之前产生的错误，报告后程序继续运行
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnsupportedScheme { .. } | Self::InvalidUrl { .. })
    }

    /// 必须以非零状态终止进程的错误
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// 检查是否为证书池错误
    pub fn is_trust_store(&self) -> bool {
        matches!(self, Self::TrustStore(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_scheme() {
        let err = ProbeError::unsupported_scheme("example.com");
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("please include http or https"));
    }

    #[test]
    fn test_connection_failed() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = ProbeError::connection_failed("example.com", io_err);
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Error connecting to example.com: refused");
    }

    #[test]
    fn test_read_failed() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = ProbeError::read_failed("example.com", io_err);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Error reading response"));
    }

    #[test]
    fn test_error_is_checks() {
        let invalid = ProbeError::invalid_url("https://", "missing host");
        let trust = ProbeError::trust_store("failed to parse root certificate");
        let malformed = ProbeError::MalformedStatusLine("garbage".to_string());

        assert!(invalid.is_recoverable());
        assert!(!invalid.is_trust_store());

        assert!(trust.is_fatal());
        assert!(trust.is_trust_store());

        assert!(malformed.is_fatal());
        assert_eq!(malformed.to_string(), "Malformed status line: \"garbage\"");
    }
}
