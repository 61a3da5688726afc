//! Workflow instance queries

use async_trait::async_trait;
use conduit_domain::{
    ListWorkflowInstancesRequest, PagedListResponse, Result, WorkflowInstance,
    WorkflowInstanceSummary,
};
use serde::de::IgnoredAny;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::registry::{ApiSurface, RestClient};

const RESOURCE: &str = "workflow-instances";

/// Remote contract for workflow instances
#[async_trait]
pub trait WorkflowInstancesApi: Send + Sync {
    /// `POST workflow-instances` with the filter as JSON body
    async fn list(
        &self,
        request: &ListWorkflowInstancesRequest,
        cancel: &CancellationToken,
    ) -> Result<PagedListResponse<WorkflowInstanceSummary>>;

    /// `GET workflow-instances/{id}`
    async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<WorkflowInstance>;

    /// `DELETE workflow-instances/{id}`
    async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<()>;
}

/// HTTP adapter for [`WorkflowInstancesApi`]
#[derive(Debug, Clone)]
pub struct WorkflowInstancesClient {
    rest: RestClient,
}

impl ApiSurface for WorkflowInstancesClient {
    const NAME: &'static str = "WorkflowInstancesApi";

    fn bind(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl WorkflowInstancesApi for WorkflowInstancesClient {
    #[instrument(skip(self, request, cancel))]
    async fn list(
        &self,
        request: &ListWorkflowInstancesRequest,
        cancel: &CancellationToken,
    ) -> Result<PagedListResponse<WorkflowInstanceSummary>> {
        self.rest.post(&[RESOURCE]).json(request).send(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<WorkflowInstance> {
        self.rest.get(&[RESOURCE, id]).send(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<()> {
        let _: IgnoredAny = self.rest.delete(&[RESOURCE, id]).send(cancel).await?;
        Ok(())
    }
}
