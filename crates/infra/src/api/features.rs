//! Installed server features

use async_trait::async_trait;
use conduit_domain::{FeatureDescriptor, ListResponse, Result};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::registry::{ApiSurface, RestClient};

#[async_trait]
pub trait FeaturesApi: Send + Sync {
    /// `GET features/installed`
    async fn list_installed(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ListResponse<FeatureDescriptor>>;

    /// `GET features/installed/{fullName}`
    async fn get(&self, full_name: &str, cancel: &CancellationToken) -> Result<FeatureDescriptor>;
}

/// HTTP adapter for [`FeaturesApi`]
#[derive(Debug, Clone)]
pub struct FeaturesClient {
    rest: RestClient,
}

impl ApiSurface for FeaturesClient {
    const NAME: &'static str = "FeaturesApi";

    fn bind(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl FeaturesApi for FeaturesClient {
    #[instrument(skip(self, cancel))]
    async fn list_installed(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ListResponse<FeatureDescriptor>> {
        self.rest.get(&["features", "installed"]).send(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn get(&self, full_name: &str, cancel: &CancellationToken) -> Result<FeatureDescriptor> {
        self.rest.get(&["features", "installed", full_name]).send(cancel).await
    }
}
