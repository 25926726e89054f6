use crate::error::{ProbeError, Result};
use std::fmt;
use url::Url;

/// Host of the fixed profiling endpoint.
pub const PROFILE_HOST: &str = "my-worker.ejchen.workers.dev";
/// Path of the fixed profiling endpoint.
pub const PROFILE_PATH: &str = "/links";

/// 请求协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// 明文 TCP（http）
    Plain,
    /// TCP + TLS（https）
    Secure,
}

impl Scheme {
    /// 协议默认端口
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Plain => 80,
            Scheme::Secure => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Plain => "http",
            Scheme::Secure => "https",
        }
    }

    /// Scheme selection works on substring containment, not on the parsed
    /// URL scheme: any `https://` anywhere in the input wins, then `http://`.
    pub fn detect(input: &str) -> Option<Self> {
        if input.contains("https://") {
            Some(Scheme::Secure)
        } else if input.contains("http://") {
            Some(Scheme::Plain)
        } else {
            None
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Plain),
            "https" => Ok(Self::Secure),
            _ => Err(ProbeError::unsupported_scheme(s)),
        }
    }
}

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Target {
    /// Target on the scheme's default port.
    pub fn new(scheme: Scheme, host: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            scheme,
            host: host.into(),
            port: scheme.default_port(),
            path: if path.is_empty() { "/".to_string() } else { path },
        }
    }

    /// The fixed endpoint hit by the profiler.
    pub fn profile_endpoint() -> Self {
        Self::new(Scheme::Secure, PROFILE_HOST, PROFILE_PATH)
    }

    /// Resolve a user supplied URL.
    ///
    /// The scheme check runs first so that input without `http://` or
    /// `https://` fails without being parsed. Host and port come from the
    /// parsed URL; the path is taken verbatim from the input text, without
    /// dot-segment removal or percent-encoding. Query and fragment are not
    /// part of the path and are dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let scheme = Scheme::detect(input).ok_or_else(|| ProbeError::unsupported_scheme(input))?;

        let url = Url::parse(input).map_err(|e| ProbeError::invalid_url(input, e.to_string()))?;
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ProbeError::invalid_url(input, "missing host")),
        };

        let port = url.port().unwrap_or_else(|| scheme.default_port());
        let path = match raw_path(input) {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    /// Value of the `Host` header: the host, plus the port when it is not
    /// the scheme default.
    pub fn authority(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `host:port` string suitable for address resolution.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host name with IPv6 brackets removed, used as the TLS server name.
    pub fn server_name(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

/// Path component exactly as written: everything after the authority up to
/// the first `?` or `#`.
fn raw_path(input: &str) -> &str {
    let after_scheme = match input.find("://") {
        Some(idx) => &input[idx + 3..],
        None => return "",
    };
    let without_suffix = match after_scheme.find(['?', '#']) {
        Some(idx) => &after_scheme[..idx],
        None => after_scheme,
    };
    match without_suffix.find('/') {
        Some(idx) => &without_suffix[idx..],
        None => "",
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}
