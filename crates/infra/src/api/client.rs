//! Aggregate workflow-server client
//!
//! Registers every surface in one call and bundles one adapter per surface.

use conduit_domain::{ClientError, Result};
use tracing::info;
use url::Url;

use super::activity_descriptors::ActivityDescriptorsClient;
use super::features::FeaturesClient;
use super::workflow_definitions::WorkflowDefinitionsClient;
use super::workflow_instances::WorkflowInstancesClient;
use crate::registry::{ApiRegistry, ApiSurface, ClientOptions};

/// Register all workflow-server surfaces with the same options.
///
/// # Errors
/// Returns the first registration error.
pub fn register_workflow_apis(registry: &mut ApiRegistry, options: &ClientOptions) -> Result<()> {
    registry.register_api::<WorkflowDefinitionsClient>(options.clone())?;
    registry.register_api::<WorkflowInstancesClient>(options.clone())?;
    registry.register_api::<ActivityDescriptorsClient>(options.clone())?;
    registry.register_api::<FeaturesClient>(options.clone())?;
    info!(base_url = %options.base_url, "registered workflow-server APIs");
    Ok(())
}

/// Authenticated variant of [`register_workflow_apis`].
///
/// # Errors
/// Returns `ClientError::Config` before registering anything when the
/// options carry no usable credential.
pub fn register_authenticated_workflow_apis(
    registry: &mut ApiRegistry,
    options: &ClientOptions,
) -> Result<()> {
    let credential = options.credential.as_ref().ok_or_else(|| {
        ClientError::config("workflow-server APIs require a credential for authenticated registration")
    })?;
    credential.header_value()?;

    registry.register_authenticated_api::<WorkflowDefinitionsClient>(options.clone())?;
    registry.register_authenticated_api::<WorkflowInstancesClient>(options.clone())?;
    registry.register_authenticated_api::<ActivityDescriptorsClient>(options.clone())?;
    registry.register_authenticated_api::<FeaturesClient>(options.clone())?;
    info!(
        base_url = %options.base_url,
        scheme = credential.scheme(),
        "registered authenticated workflow-server APIs"
    );
    Ok(())
}

/// One adapter per workflow-server surface
#[derive(Debug, Clone)]
pub struct WorkflowServerClient {
    workflow_definitions: WorkflowDefinitionsClient,
    workflow_instances: WorkflowInstancesClient,
    activity_descriptors: ActivityDescriptorsClient,
    features: FeaturesClient,
}

impl WorkflowServerClient {
    /// Create every adapter from `registry`.
    ///
    /// # Errors
    /// Returns `ClientError::Config` naming the first surface that is not
    /// registered.
    pub fn from_registry(registry: &ApiRegistry, base_url_override: Option<Url>) -> Result<Self> {
        Ok(Self {
            workflow_definitions: registry.create_client(base_url_override.clone())?,
            workflow_instances: registry.create_client(base_url_override.clone())?,
            activity_descriptors: registry.create_client(base_url_override.clone())?,
            features: registry.create_client(base_url_override)?,
        })
    }

    pub fn workflow_definitions(&self) -> &WorkflowDefinitionsClient {
        &self.workflow_definitions
    }

    pub fn workflow_instances(&self) -> &WorkflowInstancesClient {
        &self.workflow_instances
    }

    pub fn activity_descriptors(&self) -> &ActivityDescriptorsClient {
        &self.activity_descriptors
    }

    pub fn features(&self) -> &FeaturesClient {
        &self.features
    }

    /// Names of the surfaces this client spans.
    pub fn surface_names() -> [&'static str; 4] {
        [
            WorkflowDefinitionsClient::NAME,
            WorkflowInstancesClient::NAME,
            ActivityDescriptorsClient::NAME,
            FeaturesClient::NAME,
        ]
    }
}

#[cfg(test)]
mod tests {
    use conduit_common::RetryPolicy;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::FeaturesApi;
    use crate::registry::Credential;

    #[test]
    fn register_all_surfaces() {
        let mut registry = ApiRegistry::new();
        let options = ClientOptions::new(Url::parse("http://localhost:5000/elsa/api").unwrap());
        register_workflow_apis(&mut registry, &options).unwrap();

        let mut names: Vec<_> = registry.descriptors().iter().map(|d| d.name()).collect();
        names.sort_unstable();
        let mut expected = WorkflowServerClient::surface_names().to_vec();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert!(WorkflowServerClient::from_registry(&registry, None).is_ok());
    }

    #[test]
    fn authenticated_registration_without_credential_registers_nothing() {
        let mut registry = ApiRegistry::new();
        let options = ClientOptions::new(Url::parse("http://localhost:5000").unwrap());

        let result = register_authenticated_workflow_apis(&mut registry, &options);

        assert!(matches!(result, Err(ClientError::Config(_))));
        assert!(registry.descriptors().is_empty());
    }

    #[test]
    fn partial_registration_names_missing_surface() {
        let mut registry = ApiRegistry::new();
        let options = ClientOptions::new(Url::parse("http://localhost:5000").unwrap());
        registry.register_api::<WorkflowDefinitionsClient>(options).unwrap();

        match WorkflowServerClient::from_registry(&registry, None) {
            Err(ClientError::Config(message)) => assert!(message.contains("WorkflowInstancesApi")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn aggregate_client_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/elsa/api/features/installed"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut registry = ApiRegistry::new().with_retry_policy(RetryPolicy::none());
        let options = ClientOptions::new(Url::parse(&format!("{}/elsa/api", server.uri())).unwrap())
            .with_credential(Credential::bearer("t0ken"));
        register_authenticated_workflow_apis(&mut registry, &options).unwrap();

        let client = WorkflowServerClient::from_registry(&registry, None).unwrap();
        let features = client.features().list_installed(&CancellationToken::new()).await.unwrap();
        assert!(features.items.is_empty());
    }
}
