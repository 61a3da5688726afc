//! Workflow definition management

use async_trait::async_trait;
use conduit_domain::{
    ListWorkflowDefinitionsRequest, PagedListResponse, Result, VersionOptions, WorkflowDefinition,
    WorkflowDefinitionSummary,
};
use serde::de::IgnoredAny;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::registry::{ApiSurface, RestClient};

const RESOURCE: &str = "workflow-definitions";

/// Remote contract for workflow definitions
#[async_trait]
pub trait WorkflowDefinitionsApi: Send + Sync {
    /// `GET workflow-definitions`
    async fn list(
        &self,
        request: &ListWorkflowDefinitionsRequest,
        cancel: &CancellationToken,
    ) -> Result<PagedListResponse<WorkflowDefinitionSummary>>;

    /// `GET workflow-definitions/by-definition-id/{definitionId}`
    async fn get_by_definition_id(
        &self,
        definition_id: &str,
        version_options: VersionOptions,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition>;

    /// `POST workflow-definitions/{definitionId}/publish`
    async fn publish(
        &self,
        definition_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition>;

    /// `POST workflow-definitions/{definitionId}/retract`
    async fn retract(
        &self,
        definition_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition>;

    /// `DELETE workflow-definitions/{definitionId}`
    async fn delete(&self, definition_id: &str, cancel: &CancellationToken) -> Result<()>;
}

/// HTTP adapter for [`WorkflowDefinitionsApi`]
#[derive(Debug, Clone)]
pub struct WorkflowDefinitionsClient {
    rest: RestClient,
}

impl ApiSurface for WorkflowDefinitionsClient {
    const NAME: &'static str = "WorkflowDefinitionsApi";

    fn bind(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl WorkflowDefinitionsApi for WorkflowDefinitionsClient {
    #[instrument(skip(self, cancel))]
    async fn list(
        &self,
        request: &ListWorkflowDefinitionsRequest,
        cancel: &CancellationToken,
    ) -> Result<PagedListResponse<WorkflowDefinitionSummary>> {
        self.rest
            .get(&[RESOURCE])
            .query_opt("page", request.page)
            .query_opt("page_size", request.page_size)
            .query_opt("version_options", request.version_options)
            .query_opt("search_term", request.search_term.as_deref())
            .query_opt("order_by", request.order_by)
            .query_opt("order_direction", request.order_direction)
            .send(cancel)
            .await
    }

    #[instrument(skip(self, cancel))]
    async fn get_by_definition_id(
        &self,
        definition_id: &str,
        version_options: VersionOptions,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition> {
        self.rest
            .get(&[RESOURCE, "by-definition-id", definition_id])
            .query("version_options", &version_options)
            .send(cancel)
            .await
    }

    #[instrument(skip(self, cancel))]
    async fn publish(
        &self,
        definition_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition> {
        self.rest.post(&[RESOURCE, definition_id, "publish"]).send(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn retract(
        &self,
        definition_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowDefinition> {
        self.rest.post(&[RESOURCE, definition_id, "retract"]).send(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn delete(&self, definition_id: &str, cancel: &CancellationToken) -> Result<()> {
        let _: IgnoredAny = self.rest.delete(&[RESOURCE, definition_id]).send(cancel).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use conduit_common::SerializationPolicy;
    use conduit_domain::{ClientError, OrderByWorkflowDefinition, OrderDirection};
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::HttpClient;

    fn client(server: &MockServer) -> WorkflowDefinitionsClient {
        let base = Url::parse(&format!("{}/elsa/api", server.uri())).unwrap();
        WorkflowDefinitionsClient::bind(RestClient::new(
            WorkflowDefinitionsClient::NAME,
            HttpClient::new().unwrap(),
            base,
            Arc::new(SerializationPolicy::standard()),
        ))
    }

    fn definition_json(version: i32, published: bool) -> serde_json::Value {
        json!({
            "id": format!("def-1:v{version}"),
            "definitionId": "def-1",
            "name": "Approve Invoice",
            "version": version,
            "isLatest": true,
            "isPublished": published,
            "createdAt": "2024-05-01T10:00:00Z",
            "toolVersion": "3.0.0",
            "root": { "type": "Elsa.Flowchart" }
        })
    }

    #[tokio::test]
    async fn list_sends_camel_case_query_with_string_enums() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/elsa/api/workflow-definitions"))
            .and(query_param("page", "0"))
            .and(query_param("pageSize", "10"))
            .and(query_param("versionOptions", "Published"))
            .and(query_param("orderBy", "Created"))
            .and(query_param("orderDirection", "Descending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": "def-1:v2",
                    "definitionId": "def-1",
                    "name": "Approve Invoice",
                    "version": 2,
                    "isLatest": true,
                    "isPublished": true,
                    "createdAt": "2024-05-01T10:00:00Z"
                }],
                "totalCount": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ListWorkflowDefinitionsRequest {
            order_by: Some(OrderByWorkflowDefinition::Created),
            order_direction: Some(OrderDirection::Descending),
            ..ListWorkflowDefinitionsRequest::paged(0, 10)
        }
        .with_version_options(VersionOptions::Published);

        let page = client(&server).list(&request, &CancellationToken::new()).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].definition_id, "def-1");
        assert!(page.items[0].is_published);
    }

    #[tokio::test]
    async fn get_by_definition_id_encodes_specific_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/elsa/api/workflow-definitions/by-definition-id/def-1"))
            .and(query_param("versionOptions", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(definition_json(3, false)))
            .expect(1)
            .mount(&server)
            .await;

        let definition = client(&server)
            .get_by_definition_id("def-1", VersionOptions::Specific(3), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(definition.version, 3);
        assert_eq!(definition.root["type"], "Elsa.Flowchart");
    }

    #[tokio::test]
    async fn publish_and_retract_post_to_action_paths() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/elsa/api/workflow-definitions/def-1/publish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(definition_json(2, true)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/elsa/api/workflow-definitions/def-1/retract"))
            .respond_with(ResponseTemplate::new(200).set_body_json(definition_json(2, false)))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let cancel = CancellationToken::new();
        assert!(api.publish("def-1", &cancel).await.unwrap().is_published);
        assert!(!api.retract("def-1", &cancel).await.unwrap().is_published);
    }

    #[tokio::test]
    async fn delete_accepts_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/elsa/api/workflow-definitions/def-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete("def-1", &CancellationToken::new()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_definition_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)
            .get_by_definition_id("nope", VersionOptions::Latest, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ClientError::Permanent { status: Some(404), .. })));
    }
}
