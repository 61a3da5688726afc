//! Example: Listing published workflow definitions
//!
//! Loads settings from the environment (a `.env` file is honoured) or a
//! `conduit.{json,toml}` file, registers the authenticated workflow-server
//! APIs and prints the first page of published definitions.
//!
//! # Setup
//!
//! 1. Point the client at a server: ```bash export
//!    CONDUIT_BASE_URL=http://localhost:5000/elsa/api
//!    CONDUIT_API_KEY=<key> ```
//!
//! 2. Run this example: ```bash RUST_LOG=debug cargo run -p conduit-infra
//!    --example list_workflows ```
//!
//! Set `CONDUIT_LOG_FORMAT=json` for JSON log lines.

use anyhow::Context;
use conduit_domain::{ListWorkflowDefinitionsRequest, VersionOptions};
use conduit_infra::{
    config, init_tracing, register_authenticated_workflow_apis, ApiRegistry, ClientOptions,
    FeaturesApi, LogFormat, WorkflowDefinitionsApi, WorkflowServerClient,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let format = std::env::var("CONDUIT_LOG_FORMAT")
        .ok()
        .map(|raw| raw.parse::<LogFormat>())
        .transpose()?
        .unwrap_or_default();
    init_tracing(format);

    let settings = config::load().context("loading client settings")?;
    let options = ClientOptions::from_settings(&settings)?;

    let mut registry = ApiRegistry::new();
    register_authenticated_workflow_apis(&mut registry, &options)
        .context("CONDUIT_API_KEY is required for the workflow server")?;
    let client = WorkflowServerClient::from_registry(&registry, None)?;

    // Ctrl-C abandons in-flight calls and pending retries.
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let features = client.features().list_installed(&cancel).await?;
    tracing::info!(count = features.items.len(), "installed features");

    let request = ListWorkflowDefinitionsRequest::paged(0, 25)
        .with_version_options(VersionOptions::Published);
    let page = client.workflow_definitions().list(&request, &cancel).await?;

    println!("{} published workflow definition(s)", page.total_count);
    for definition in &page.items {
        println!(
            "  {:<36} v{:<4} {}",
            definition.definition_id,
            definition.version,
            definition.name.as_deref().unwrap_or("<unnamed>")
        );
    }

    Ok(())
}
