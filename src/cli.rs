use crate::config::AppConfig;
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "http-probe")]
#[command(author, version, about = "Raw HTTP/1.1 GET client and latency profiler", long_about = None)]
pub struct Cli {
    /// Make a GET request to the URL and print the response (http:// or https://)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Profile https://my-worker.ejchen.workers.dev/links with this many requests
    #[arg(long, value_name = "N")]
    pub profile: Option<u32>,

    /// PEM root certificate trusted in addition to the system roots [default: rootPEM.txt]
    #[arg(long, value_name = "PATH")]
    pub root_cert: Option<PathBuf>,

    /// Do not trust the system root certificates
    #[arg(long)]
    pub no_system_roots: bool,

    /// Report exact bytes read instead of the buffered-bytes approximation
    #[arg(long)]
    pub exact_size: bool,

    /// TOML configuration file; command line flags take precedence
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// 合并配置文件与命令行参数
    pub fn to_config(&self) -> Result<AppConfig> {
        let mut config = match self.config {
            Some(ref path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(ref url) = self.url {
            config.url = Some(url.clone());
        }
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if let Some(ref root_cert) = self.root_cert {
            config.tls.root_cert = root_cert.clone();
        }
        if self.no_system_roots {
            config.tls.system_roots = false;
        }
        if self.exact_size {
            config.exact_size = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// 日志级别
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "off",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
