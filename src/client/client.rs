use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_fs::*;
use crate::infra_reqwest::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Wires the API client from settings.
pub fn try_build(settings: &Settings, navigator: Arc<dyn Navigator>) -> anyhow::Result<RealApiClient> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(
        settings.api.base_url.clone(),
        Duration::from_secs(settings.api.timeout_secs),
    )?);

    let backend = credential_backend(settings)?;
    info!(
        base_url = %settings.api.base_url,
        backend = backend.name(),
        "api client configured"
    );

    Ok(RealApiClient::new(
        transport,
        backend,
        navigator,
        &settings.session.login_route,
    ))
}

pub fn credential_backend(settings: &Settings) -> anyhow::Result<Arc<dyn CredentialBackend>> {
    let backend: Arc<dyn CredentialBackend> = match settings.credentials.backend.as_str() {
        "explicit" => {
            let store: Arc<dyn DurableCredentialStore> =
                Arc::new(FileCredentialStore::new(&settings.credentials.path));
            Arc::new(ExplicitTokenBackend::new(store))
        }
        "transport" => Arc::new(TransportCredentialBackend::new()),
        other => return Err(anyhow::anyhow!("Unknown credentials backend: {}", other)),
    };
    Ok(backend)
}
