//! Activity descriptor catalogue

use async_trait::async_trait;
use conduit_domain::{ActivityDescriptor, ListResponse, Result};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::registry::{ApiSurface, RestClient};

#[async_trait]
pub trait ActivityDescriptorsApi: Send + Sync {
    /// `GET descriptors/activities`; `refresh` asks the server to rebuild its
    /// catalogue first.
    async fn list(
        &self,
        refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<ListResponse<ActivityDescriptor>>;
}

/// HTTP adapter for [`ActivityDescriptorsApi`]
#[derive(Debug, Clone)]
pub struct ActivityDescriptorsClient {
    rest: RestClient,
}

impl ApiSurface for ActivityDescriptorsClient {
    const NAME: &'static str = "ActivityDescriptorsApi";

    fn bind(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ActivityDescriptorsApi for ActivityDescriptorsClient {
    #[instrument(skip(self, cancel))]
    async fn list(
        &self,
        refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<ListResponse<ActivityDescriptor>> {
        self.rest
            .get(&["descriptors", "activities"])
            .query_opt("refresh", refresh.then_some(true))
            .send(cancel)
            .await
    }
}
