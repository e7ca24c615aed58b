//! Walks a session through login, silent refresh and expiry against scripted
//! server answers. Run with `cargo run --bin session_demo`.

use cablebill::application_impl::*;
use cablebill::application_port::*;
use cablebill::domain_model::*;
use cablebill::infra_memory::*;
use cablebill::logger::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "debug".to_string(),
    })?;

    let server = Arc::new(FakeHttpTransport::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let durable = Arc::new(MemoryCredentialStore::new());
    let api = RealApiClient::new(
        server.clone(),
        Arc::new(ExplicitTokenBackend::new(durable)),
        navigator.clone(),
        "/login",
    );

    server.respond_json(
        Method::Post,
        LOGIN_PATH,
        200,
        json!({ "accessToken": "tok1", "refreshToken": "ref1" }),
    );
    api.login(LoginInput {
        username: "operator".to_string(),
        password: "demo".to_string(),
    })
    .await?;

    // tok1 expires, the refresh hands out tok2
    server
        .respond(Method::Get, "/customers", ApiResponse::new(401, "expired"))
        .respond_json(Method::Get, "/customers", 200, json!([{ "name": "Asha" }]));
    server.respond_json(Method::Post, REFRESH_PATH, 200, json!({ "accessToken": "tok2" }));
    let customers: serde_json::Value = api.get_json("/customers").await?;
    info!(%customers, "fetched after silent refresh");

    // the refresh token is revoked too
    server.respond(Method::Get, "/customers", ApiResponse::new(401, "expired"));
    server.respond(Method::Post, REFRESH_PATH, ApiResponse::new(400, "revoked"));
    match api.get_json::<serde_json::Value>("/customers").await {
        Ok(_) => warn!("expected the session to end"),
        Err(e) => info!(error = %e, "request failed"),
    }

    info!(
        notices = ?navigator.notices(),
        routes = ?navigator.routes(),
        authenticated = api.is_authenticated(),
        "final state"
    );
    Ok(())
}
