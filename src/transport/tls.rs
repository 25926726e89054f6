use super::{Connector, Transport};
use crate::config::TlsSettings;
use crate::error::{ProbeError, Result};
use crate::target::{Scheme, Target};
use async_trait::async_trait;
use rustls::pki_types::ServerName;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::OnceCell;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// TLS 连接器
///
/// 证书池在第一次使用时构建一次，之后的请求复用同一个 TlsConnector
pub struct SecureConnector {
    settings: TlsSettings,
    connector: OnceCell<TlsConnector>,
}

impl SecureConnector {
    pub fn new(settings: TlsSettings) -> Self {
        Self {
            settings,
            connector: OnceCell::new(),
        }
    }

    /// 使用已构建好的客户端配置
    pub fn from_client_config(config: Arc<rustls::ClientConfig>) -> Self {
        Self {
            settings: TlsSettings::default(),
            connector: OnceCell::from(TlsConnector::from(config)),
        }
    }

    async fn tls_connector(&self) -> Result<&TlsConnector> {
        self.connector
            .get_or_try_init(|| async {
                debug!(
                    "Building trust store from {:?} (system roots: {})",
                    self.settings.root_cert, self.settings.system_roots
                );
                crate::tls::load_client_config(&self.settings)
                    .map(TlsConnector::from)
                    .map_err(|e| ProbeError::trust_store(format!("{:#}", e)))
            })
            .await
    }
}

#[async_trait]
impl Connector for SecureConnector {
    async fn prepare(&self) -> Result<()> {
        self.tls_connector().await.map(|_| ())
    }

    async fn connect(&self, target: &Target) -> Result<Pin<Box<dyn Transport>>> {
        let connector = self.tls_connector().await?;
        let addr = target.socket_addr();
        debug!("Connecting to {} via TLS", addr);

        let tcp_stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?;

        let server_name = ServerName::try_from(target.server_name().to_string())
            .map_err(|e| {
                ProbeError::connection_failed(
                    target.host.clone(),
                    io::Error::new(io::ErrorKind::InvalidInput, e),
                )
            })?;

        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| ProbeError::connection_failed(target.host.clone(), e))?;

        debug!("TLS connection established to {}", addr);
        Ok(Box::pin(tls_stream))
    }

    fn scheme(&self) -> Scheme {
        Scheme::Secure
    }
}
