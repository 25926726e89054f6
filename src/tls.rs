use crate::config::TlsSettings;
use anyhow::{bail, Context, Result};
use rustls::pki_types::CertificateDer;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// 加载客户端 TLS 配置
///
/// 信任库 = 系统根证书（可关闭）+ 根证书 PEM 文件中的全部证书
pub fn load_client_config(settings: &TlsSettings) -> Result<Arc<rustls::ClientConfig>> {
    let mut root_store = rustls::RootCertStore::empty();

    if settings.system_roots {
        // 使用系统 CA 证书
        let native_certs = rustls_native_certs::load_native_certs();
        for err in &native_certs.errors {
            warn!("Failed to load a system root certificate: {}", err);
        }
        let (added, ignored) = root_store.add_parsable_certificates(native_certs.certs);
        debug!(
            "Loaded {} system root certificates ({} ignored)",
            added, ignored
        );
    }

    // 加载根证书文件
    for cert in load_pem_certs(&settings.root_cert)? {
        root_store
            .add(cert)
            .context("Failed to add root certificate")?;
    }

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// 读取 PEM 文件中的证书，文件中没有任何证书视为错误
pub fn load_pem_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open root certificate file: {:?}", path))?;
    let mut reader = BufReader::new(file);
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to parse root certificate")?;

    if certs.is_empty() {
        bail!("failed to parse root certificate: no certificate found in {:?}", path);
    }

    Ok(certs)
}
