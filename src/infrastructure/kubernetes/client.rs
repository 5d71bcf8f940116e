use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::rbac::{
    ClusterRoleBinding, ClusterRoleBindingList, ClusterRoleList, K8sStatus, RoleBinding,
    RoleBindingList, RoleList, ServiceAccount, ServiceAccountList, API_VERSION, LABEL_UI_DISPLAY,
};
use crate::domain::models::user::LoggedInUser;
use crate::domain::ports::rbac_client::RbacClient;
use crate::infrastructure::kubernetes::k8s_url::{self, K8sUrlOptions};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const CLUSTER_ROLES: &str = "clusterroles";
const ROLES: &str = "roles";
const CLUSTER_ROLE_BINDINGS: &str = "clusterrolebindings";
const ROLE_BINDINGS: &str = "rolebindings";
const SERVICE_ACCOUNTS: &str = "serviceaccounts";

/// Talks to the Kubernetes API of the management cluster with the
/// credentials of the calling user.
#[derive(Clone)]
pub struct KubernetesClient {
    base_url: String,
    http_client: Client,
    timeout: Duration,
}

impl KubernetesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DomainResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rbac_url(
        &self,
        kind: &str,
        namespace: Option<&str>,
        name: Option<&str>,
        label_selector: Option<&BTreeMap<String, String>>,
    ) -> DomainResult<String> {
        k8s_url::create(
            &self.base_url,
            &K8sUrlOptions {
                kind,
                api_version: Some(API_VERSION),
                is_core: false,
                namespace,
                name,
                label_selector,
            },
        )
    }

    fn cluster_role_list_url(&self) -> DomainResult<String> {
        // Only cluster roles meant for the UI are listed.
        let mut selector = BTreeMap::new();
        selector.insert(LABEL_UI_DISPLAY.to_string(), "true".to_string());
        self.rbac_url(CLUSTER_ROLES, None, None, Some(&selector))
    }

    fn service_account_url(&self, namespace: &str, name: Option<&str>) -> DomainResult<String> {
        k8s_url::create(
            &self.base_url,
            &K8sUrlOptions {
                kind: SERVICE_ACCOUNTS,
                is_core: true,
                namespace: Some(namespace),
                name,
                ..Default::default()
            },
        )
    }

    fn request(&self, method: Method, url: &str, user: &LoggedInUser) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, user.authorization_header())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn get<T: DeserializeOwned>(&self, user: &LoggedInUser, url: &str) -> DomainResult<T> {
        let response = self.send(Method::GET, url, self.request(Method::GET, url, user)).await?;
        Self::decode(response).await
    }

    async fn write<B, T>(
        &self,
        method: Method,
        user: &LoggedInUser,
        url: &str,
        body: &B,
    ) -> DomainResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), url, user).json(body);
        let response = self.send(method, url, builder).await?;
        Self::decode(response).await
    }

    async fn delete(&self, user: &LoggedInUser, url: &str) -> DomainResult<()> {
        self.send(
            Method::DELETE,
            url,
            self.request(Method::DELETE, url, user),
        )
        .await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        builder: RequestBuilder,
    ) -> DomainResult<reqwest::Response> {
        let started = Instant::now();
        let result = builder.send().await;
        metrics::histogram!("happa_kubernetes_request_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_timeout() {
                    format!("Request timeout after {:?}: {}", self.timeout, e)
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    format!("Network error: {}", e)
                };

                warn!("{} {} failed: {}", method, url, message);
                metrics::counter!("happa_kubernetes_requests_total", "outcome" => "transport_error")
                    .increment(1);
                return Err(DomainError::Transport(message));
            }
        };

        let status = response.status();
        debug!("{} {} returned status {}", method, url, status.as_u16());

        if status.is_success() {
            metrics::counter!("happa_kubernetes_requests_total", "outcome" => "success")
                .increment(1);
            return Ok(response);
        }

        metrics::counter!("happa_kubernetes_requests_total", "outcome" => "api_error")
            .increment(1);

        let body = response.text().await.unwrap_or_default();
        Err(DomainError::Kubernetes(status_from_body(status.as_u16(), &body)))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> DomainResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::Internal(format!("Invalid Kubernetes API response: {}", e)))
    }
}

/// Turn an error response body into a `Status`, keeping the HTTP code when
/// the body is not a `Status` object.
fn status_from_body(code: u16, body: &str) -> K8sStatus {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if K8sStatus::is_status(&value) {
            if let Ok(mut status) = serde_json::from_value::<K8sStatus>(value) {
                if status.code == 0 {
                    status.code = code;
                }
                return status;
            }
        }
    }

    let message = if body.len() > 500 {
        let mut end = 500;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("HTTP {}: {}", code, &body[..end])
    } else if body.is_empty() {
        format!("HTTP {} error", code)
    } else {
        format!("HTTP {}: {}", code, body)
    };

    K8sStatus {
        api_version: None,
        kind: None,
        status: Some("Failure".to_string()),
        message: Some(message),
        reason: None,
        code,
    }
}

#[async_trait]
impl RbacClient for KubernetesClient {
    async fn list_cluster_roles(&self, user: &LoggedInUser) -> DomainResult<ClusterRoleList> {
        let url = self.cluster_role_list_url()?;
        self.get(user, &url).await
    }

    async fn list_roles(&self, user: &LoggedInUser, namespace: &str) -> DomainResult<RoleList> {
        let url = self.rbac_url(ROLES, Some(namespace), None, None)?;
        self.get(user, &url).await
    }

    async fn list_cluster_role_bindings(
        &self,
        user: &LoggedInUser,
    ) -> DomainResult<ClusterRoleBindingList> {
        let url = self.rbac_url(CLUSTER_ROLE_BINDINGS, None, None, None)?;
        self.get(user, &url).await
    }

    async fn list_role_bindings(
        &self,
        user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<RoleBindingList> {
        let url = self.rbac_url(ROLE_BINDINGS, Some(namespace), None, None)?;
        self.get(user, &url).await
    }

    fn cluster_role_list_key(&self, user: Option<&LoggedInUser>) -> Option<String> {
        user?;
        self.cluster_role_list_url().ok()
    }

    fn role_list_key(&self, user: Option<&LoggedInUser>, namespace: &str) -> Option<String> {
        user?;
        self.rbac_url(ROLES, Some(namespace), None, None).ok()
    }

    fn cluster_role_binding_list_key(&self, user: Option<&LoggedInUser>) -> Option<String> {
        user?;
        self.rbac_url(CLUSTER_ROLE_BINDINGS, None, None, None).ok()
    }

    fn role_binding_list_key(
        &self,
        user: Option<&LoggedInUser>,
        namespace: &str,
    ) -> Option<String> {
        user?;
        self.rbac_url(ROLE_BINDINGS, Some(namespace), None, None).ok()
    }

    async fn get_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        name: &str,
    ) -> DomainResult<ClusterRoleBinding> {
        let url = self.rbac_url(CLUSTER_ROLE_BINDINGS, None, Some(name), None)?;
        self.get(user, &url).await
    }

    async fn create_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding> {
        let url = self.rbac_url(CLUSTER_ROLE_BINDINGS, None, None, None)?;
        self.write(Method::POST, user, &url, binding).await
    }

    async fn update_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding> {
        let url = self.rbac_url(
            CLUSTER_ROLE_BINDINGS,
            None,
            Some(&binding.metadata.name),
            None,
        )?;
        self.write(Method::PUT, user, &url, binding).await
    }

    async fn delete_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<()> {
        let url = self.rbac_url(
            CLUSTER_ROLE_BINDINGS,
            None,
            Some(&binding.metadata.name),
            None,
        )?;
        self.delete(user, &url).await
    }

    async fn get_role_binding(
        &self,
        user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<RoleBinding> {
        let url = self.rbac_url(ROLE_BINDINGS, Some(namespace), Some(name), None)?;
        self.get(user, &url).await
    }

    async fn create_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding> {
        let url = self.rbac_url(
            ROLE_BINDINGS,
            binding.metadata.namespace.as_deref(),
            None,
            None,
        )?;
        self.write(Method::POST, user, &url, binding).await
    }

    async fn update_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding> {
        let url = self.rbac_url(
            ROLE_BINDINGS,
            binding.metadata.namespace.as_deref(),
            Some(&binding.metadata.name),
            None,
        )?;
        self.write(Method::PUT, user, &url, binding).await
    }

    async fn delete_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<()> {
        let url = self.rbac_url(
            ROLE_BINDINGS,
            binding.metadata.namespace.as_deref(),
            Some(&binding.metadata.name),
            None,
        )?;
        self.delete(user, &url).await
    }

    async fn list_service_accounts(
        &self,
        user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<ServiceAccountList> {
        let url = self.service_account_url(namespace, None)?;
        self.get(user, &url).await
    }

    async fn get_service_account(
        &self,
        user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<ServiceAccount> {
        let url = self.service_account_url(namespace, Some(name))?;
        self.get(user, &url).await
    }

    async fn create_service_account(
        &self,
        user: &LoggedInUser,
        service_account: &ServiceAccount,
    ) -> DomainResult<ServiceAccount> {
        let namespace = service_account
            .metadata
            .namespace
            .as_deref()
            .unwrap_or("default");
        let url = self.service_account_url(namespace, None)?;
        self.write(Method::POST, user, &url, service_account).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> KubernetesClient {
        KubernetesClient::new("https://api.g8s.test.io", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_list_keys_require_user() {
        let client = client();
        assert!(client.cluster_role_list_key(None).is_none());
        assert!(client.role_list_key(None, "org-giantswarm").is_none());
        assert!(client.cluster_role_binding_list_key(None).is_none());
        assert!(client.role_binding_list_key(None, "org-giantswarm").is_none());
    }

    #[test]
    fn test_list_keys_are_request_urls() {
        let client = client();
        let user = LoggedInUser::new("Bearer", "token");

        assert_eq!(
            client.cluster_role_list_key(Some(&user)).unwrap(),
            "https://api.g8s.test.io/apis/rbac.authorization.k8s.io/v1/clusterroles/?labelSelector=ui.giantswarm.io%2Fdisplay%3Dtrue"
        );
        assert_eq!(
            client.role_binding_list_key(Some(&user), "org-giantswarm").unwrap(),
            "https://api.g8s.test.io/apis/rbac.authorization.k8s.io/v1/namespaces/org-giantswarm/rolebindings"
        );
    }

    #[test]
    fn test_status_from_status_body() {
        let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"rolebindings.rbac.authorization.k8s.io \"x\" not found","reason":"NotFound","code":404}"#;
        let status = status_from_body(404, body);

        assert!(status.is_not_found());
        assert_eq!(
            status.message.as_deref(),
            Some("rolebindings.rbac.authorization.k8s.io \"x\" not found")
        );
    }

    #[test]
    fn test_status_from_plain_body() {
        let status = status_from_body(502, "bad gateway");
        assert_eq!(status.code, 502);
        assert_eq!(status.message.as_deref(), Some("HTTP 502: bad gateway"));

        let status = status_from_body(500, "");
        assert_eq!(status.message.as_deref(), Some("HTTP 500 error"));
    }
}
