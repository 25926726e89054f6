/// HTTP/1.1 线格式：请求构造与状态行解析
use crate::error::{ProbeError, Result};

/// 状态行前缀
const HTTP_PREFIX: &str = "HTTP/";

/// 构造 GET 请求
///
/// 只携带 Host 与 `Connection: close`，服务器发送完响应后关闭连接，
/// 因此读取端无需理解 Content-Length 或 chunked 编码
pub fn build_get_request(authority: &str, path: &str) -> String {
    format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, authority
    )
}

/// 解析后的状态行：`HTTP/<version> <code> <reason>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: String,
    code: String,
    pub reason: String,
}

/// 状态行分词器的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Version,
    Code,
    Reason,
}

impl StatusLine {
    /// 解析响应首行
    ///
    /// 原因短语可以为空（`HTTP/1.1 204` 也是合法输入），状态码必须恰好是三位数字
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || ProbeError::MalformedStatusLine(line.to_string());

        let rest = line.strip_prefix(HTTP_PREFIX).ok_or_else(malformed)?;

        let mut state = State::Version;
        let mut version = String::new();
        let mut code = String::new();
        let mut reason = String::new();

        for ch in rest.chars() {
            match state {
                State::Version => match ch {
                    ' ' if !version.is_empty() => state = State::Code,
                    '0'..='9' => version.push(ch),
                    '.' if !version.is_empty() && !version.ends_with('.') => version.push(ch),
                    _ => return Err(malformed()),
                },
                State::Code => match ch {
                    '0'..='9' if code.len() < 3 => code.push(ch),
                    ' ' if code.len() == 3 => state = State::Reason,
                    _ => return Err(malformed()),
                },
                State::Reason => reason.push(ch),
            }
        }

        if state == State::Version || code.len() != 3 || version.ends_with('.') {
            return Err(malformed());
        }

        Ok(Self {
            version,
            code,
            reason,
        })
    }

    /// 三位状态码
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        self.code.starts_with('2')
    }
}
