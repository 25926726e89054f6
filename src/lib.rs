/// HTTP Probe 库入口
///
/// 将核心模块导出为库，方便测试和复用
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod line_reader;
pub mod profiler;
pub mod protocol;
pub mod stats;
pub mod target;
pub mod tls;
pub mod transport;

// 重新导出常用类型
pub use client::Client;
pub use config::{AppConfig, TlsSettings};
pub use error::{ProbeError, Result};
pub use line_reader::{LineReader, READ_BUFFER_SIZE};
pub use profiler::Profiler;
pub use stats::{ProfileReport, ProfileStats, SizeMode};
pub use target::{Scheme, Target};
pub use transport::{Connector, Measurement, PlainConnector, SecureConnector};
