use crate::client::Client;
use crate::error::Result;
use crate::stats::{ProfileReport, ProfileStats, SizeMode};
use crate::target::Target;
use tracing::info;

/// Issues a fixed number of strictly sequential requests against one target
/// and aggregates the measurements.
pub struct Profiler<'a> {
    client: &'a Client,
    target: Target,
    size_mode: SizeMode,
}

impl<'a> Profiler<'a> {
    /// Profiler against the built-in endpoint.
    pub fn new(client: &'a Client, size_mode: SizeMode) -> Self {
        Self::with_target(client, Target::profile_endpoint(), size_mode)
    }

    pub fn with_target(client: &'a Client, target: Target, size_mode: SizeMode) -> Self {
        Self {
            client,
            target,
            size_mode,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run `requests` fetches one after another without echo.
    ///
    /// Returns `Ok(None)` without any network activity when `requests` is 0.
    /// The first fatal error aborts the run.
    pub async fn run(&self, requests: u32) -> Result<Option<ProfileReport>> {
        if requests == 0 {
            return Ok(None);
        }

        info!("Profiling {} with {} requests", self.target, requests);
        let mut stats = ProfileStats::new(self.size_mode);

        for i in 1..=requests {
            let measurement = self.client.fetch(&self.target, None).await?;
            info!(
                "Request {}/{}: status {} in {} ms ({} bytes)",
                i,
                requests,
                measurement.status,
                measurement.elapsed_ms(),
                measurement.size(self.size_mode)
            );
            stats.record(&measurement);
        }

        Ok(stats.finish(&self.target))
    }
}
