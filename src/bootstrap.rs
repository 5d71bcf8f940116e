use crate::application::services::AccessControlService;
use crate::config::Config;
use crate::domain::errors::DomainResult;
use crate::domain::ports::rbac_client::RbacClient;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::kubernetes::KubernetesClient;
use std::sync::Arc;

pub fn build_app_state(config: &Config) -> DomainResult<AppState> {
    let client = KubernetesClient::new(config.k8s_api_url.clone(), config.k8s_request_timeout)?;
    tracing::info!(
        "Kubernetes client initialized for {} (timeout {:?})",
        client.base_url(),
        config.k8s_request_timeout
    );

    let rbac_client: Arc<dyn RbacClient> = Arc::new(client);

    Ok(AppState {
        access_control_service: AccessControlService::new(rbac_client),
    })
}
