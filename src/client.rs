//! Single-request executor: picks the connector for a target's scheme and
//! runs one exchange.

use crate::config::AppConfig;
use crate::error::Result;
use crate::target::{Scheme, Target};
use crate::transport::{exchange, Connector, Measurement, PlainConnector, SecureConnector};
use std::io::{self, Write};
use tracing::info;

/// Holds one connector per scheme. Connections are never reused; every
/// fetch dials a new one.
pub struct Client {
    plain: PlainConnector,
    secure: SecureConnector,
}

impl Client {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_connectors(PlainConnector::new(), SecureConnector::new(config.tls.clone()))
    }

    pub fn with_connectors(plain: PlainConnector, secure: SecureConnector) -> Self {
        Self { plain, secure }
    }

    /// Connector for the given scheme
    pub fn connector(&self, scheme: Scheme) -> &dyn Connector {
        match scheme {
            Scheme::Plain => &self.plain,
            Scheme::Secure => &self.secure,
        }
    }

    /// Request `target` once, writing each response line to `echo` when
    /// one is given.
    pub async fn fetch(
        &self,
        target: &Target,
        echo: Option<&mut (dyn Write + Send)>,
    ) -> Result<Measurement> {
        exchange(self.connector(target.scheme), target, echo).await
    }

    /// One-shot mode: resolve `url` and fetch it, echoing the response to
    /// stdout.
    ///
    /// Resolution errors are returned before any socket is opened; callers
    /// can tell them apart with [`ProbeError::is_recoverable`].
    ///
    /// [`ProbeError::is_recoverable`]: crate::error::ProbeError::is_recoverable
    pub async fn get(&self, url: &str) -> Result<Measurement> {
        let mut stdout = io::stdout();
        self.get_to(url, &mut stdout).await
    }

    /// Same as [`Client::get`], with the response lines written to `out`.
    pub async fn get_to(&self, url: &str, out: &mut (dyn Write + Send)) -> Result<Measurement> {
        let target = Target::parse(url)?;
        info!("GET {}", target);
        self.fetch(&target, Some(out)).await
    }
}
