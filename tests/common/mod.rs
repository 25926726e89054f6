/// Common utilities for integration tests
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

/// Find an available port
pub fn get_available_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to random port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Unique path in the temp directory
pub fn temp_path(prefix: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64;
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "{}-{}-{}-{}.pem",
        prefix,
        timestamp,
        counter,
        std::process::id()
    ))
}

/// Self-signed certificate for `localhost`
pub struct TestCert {
    pub cert_der: CertificateDer<'static>,
    pub key_der: Vec<u8>,
    pub cert_pem: String,
}

pub fn generate_test_cert() -> TestCert {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("Failed to generate test certificate");
    TestCert {
        cert_der: cert.cert.der().clone(),
        key_der: cert.signing_key.serialize_der(),
        cert_pem: cert.cert.pem(),
    }
}

/// Write the certificate PEM to a temporary root file
pub fn write_root_file(cert: &TestCert) -> PathBuf {
    let path = temp_path("http-probe-root");
    std::fs::write(&path, &cert.cert_pem).expect("Failed to write root certificate");
    path
}

/// Read one request head, answer with the canned response and close.
async fn serve_one<S>(mut stream: S, response: &[u8]) -> Vec<u8>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut request = Vec::new();
    let mut buf = vec![0u8; 1024];
    while !request.ends_with(b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let _ = stream.write_all(response).await;
    let _ = stream.shutdown().await;
    request
}

/// Plain HTTP server answering one connection per canned response, in order.
/// The handle yields the raw request heads it received.
pub async fn start_http_server(responses: Vec<&'static [u8]>) -> (u16, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind http server");
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (socket, _) = listener.accept().await.expect("accept failed");
            requests.push(serve_one(socket, response).await);
        }
        requests
    });

    (port, handle)
}

/// TLS server presenting `cert`, otherwise like [`start_http_server`].
pub async fn start_https_server(
    cert: &TestCert,
    responses: Vec<&'static [u8]>,
) -> (u16, JoinHandle<Vec<Vec<u8>>>) {
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(cert.key_der.clone()));
    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert.cert_der.clone()], key)
        .expect("Failed to create server config");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind https server");
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (socket, _) = listener.accept().await.expect("accept failed");
            match acceptor.accept(socket).await {
                Ok(stream) => requests.push(serve_one(stream, response).await),
                Err(_) => requests.push(Vec::new()),
            }
        }
        requests
    });

    (port, handle)
}

/// Removes temporary files when dropped
pub struct TestCleanup {
    paths: Vec<PathBuf>,
}

impl TestCleanup {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Drop for TestCleanup {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            let _ = std::fs::remove_file(path);
        }
    }
}
