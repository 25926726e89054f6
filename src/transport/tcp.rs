use super::{Connector, Transport};
use crate::error::{ProbeError, Result};
use crate::target::{Scheme, Target};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use tokio::net::{lookup_host, TcpStream};
use tracing::debug;

/// 明文 TCP 连接器
///
/// 只使用解析结果中的第一个 IPv4 地址
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainConnector;

impl PlainConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for PlainConnector {
    async fn connect(&self, target: &Target) -> Result<Pin<Box<dyn Transport>>> {
        let addr = target.socket_addr();
        debug!("Connecting to {} via TCP", addr);

        let resolved = lookup_host(&addr)
            .await
            .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| {
                ProbeError::connection_failed(
                    target.host.clone(),
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no IPv4 address found for {}", addr),
                    ),
                )
            })?;

        let stream = TcpStream::connect(resolved)
            .await
            .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?;

        debug!("TCP connection established to {}", resolved);
        Ok(Box::pin(stream))
    }

    fn scheme(&self) -> Scheme {
        Scheme::Plain
    }
}
