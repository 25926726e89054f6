mod tcp;
mod tls;

pub use tcp::PlainConnector;
pub use tls::SecureConnector;

use crate::error::{ProbeError, Result};
use crate::line_reader::LineReader;
use crate::protocol::{build_get_request, StatusLine};
use crate::stats::SizeMode;
use crate::target::{Scheme, Target};
use async_trait::async_trait;
use std::io::Write;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// 传输层连接抽象
///
/// 统一封装明文 TCP 与 TLS 连接
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

// 为所有满足条件的类型自动实现 Transport
impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

/// 传输层连接器接口
#[async_trait]
pub trait Connector: Send + Sync {
    /// 连接前的一次性准备工作（如构建证书池），不计入请求耗时
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// 连接到目标并返回传输层连接
    async fn connect(&self, target: &Target) -> Result<Pin<Box<dyn Transport>>>;

    /// 连接器对应的协议
    fn scheme(&self) -> Scheme;
}

/// One completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Time from connection start to the end of the response stream.
    pub elapsed: Duration,
    /// Sum of the reader's buffer depth at each line boundary. A rough proxy
    /// for response size, not a content length.
    pub approx_size: u64,
    /// Bytes actually consumed from the stream, line terminators included.
    pub bytes_read: u64,
    /// Three digit status code from the first response line.
    pub status: String,
}

impl Measurement {
    /// Elapsed time in whole milliseconds (truncated).
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }

    pub fn size(&self, mode: SizeMode) -> u64 {
        match mode {
            SizeMode::Approximate => self.approx_size,
            SizeMode::Exact => self.bytes_read,
        }
    }
}

/// Run one GET exchange over a fresh connection.
///
/// The first response line is mandatory; any read error after it is taken as
/// the end of the response. When `echo` is given every line is written to it
/// in the order it was read. The connection is dropped before the status line
/// is parsed, on every path.
pub async fn exchange(
    connector: &dyn Connector,
    target: &Target,
    mut echo: Option<&mut (dyn Write + Send)>,
) -> Result<Measurement> {
    connector.prepare().await?;

    let start = Instant::now();
    let mut stream = connector.connect(target).await?;

    let request = build_get_request(&target.authority(), &target.path);
    debug!("Sending request to {}: GET {}", target.socket_addr(), target.path);
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?;
    stream
        .flush()
        .await
        .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?;

    let mut reader = LineReader::new(stream);
    let status_line = match reader.next_line().await {
        Ok(Some(line)) => line,
        Ok(None) => {
            return Err(ProbeError::EmptyResponse {
                host: target.host.clone(),
            })
        }
        Err(e) => return Err(ProbeError::read_failed(target.host.clone(), e)),
    };
    if let Some(out) = echo.as_deref_mut() {
        writeln!(out, "{}", status_line)?;
    }

    loop {
        match reader.next_line().await {
            Ok(Some(line)) => {
                if let Some(out) = echo.as_deref_mut() {
                    writeln!(out, "{}", line)?;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Response stream from {} ended: {}", target.host, e);
                break;
            }
        }
    }

    let elapsed = start.elapsed();
    if let Some(out) = echo {
        out.flush()?;
    }
    let approx_size = reader.approx_size();
    let bytes_read = reader.bytes_read();
    drop(reader);

    let status = StatusLine::parse(&status_line)?;
    debug!(
        "{} answered {} after {:?} ({} bytes read)",
        target,
        status.code(),
        elapsed,
        bytes_read
    );

    Ok(Measurement {
        elapsed,
        approx_size,
        bytes_read,
        status: status.code().to_string(),
    })
}
