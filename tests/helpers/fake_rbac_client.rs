use async_trait::async_trait;
use happa::domain::errors::{DomainError, DomainResult};
use happa::domain::models::rbac::{
    ClusterRole, ClusterRoleBinding, ClusterRoleBindingList, ClusterRoleList, K8sStatus, List,
    Role, RoleBinding, RoleBindingList, RoleList, ServiceAccount, ServiceAccountList,
};
use happa::domain::models::user::LoggedInUser;
use happa::domain::ports::rbac_client::RbacClient;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the Kubernetes API.
#[derive(Default)]
pub struct FakeRbacClient {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub struct FakeState {
    pub cluster_roles: Vec<ClusterRole>,
    pub roles: Vec<Role>,
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
    pub role_bindings: Vec<RoleBinding>,
    pub service_accounts: Vec<ServiceAccount>,
    /// Operation name that should fail with a 403 `Status`.
    pub failing_operation: Option<&'static str>,
    /// Cache keys to return instead of the default ones.
    pub key_overrides: HashMap<&'static str, Option<String>>,
    pub calls: Vec<String>,
}

impl FakeRbacClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(f: impl FnOnce(&mut FakeState)) -> Self {
        let client = Self::new();
        f(&mut client.state.lock().unwrap());
        client
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn record(&self, operation: &'static str, detail: &str) -> DomainResult<()> {
        let mut state = self.state();
        state.calls.push(format!("{} {}", operation, detail).trim_end().to_string());

        if state.failing_operation == Some(operation) {
            return Err(forbidden(operation));
        }
        Ok(())
    }

    fn key(
        &self,
        operation: &'static str,
        user: Option<&LoggedInUser>,
        default: String,
    ) -> Option<String> {
        user?;
        match self.state().key_overrides.get(operation) {
            Some(key) => key.clone(),
            None => Some(default),
        }
    }
}

pub fn forbidden(operation: &str) -> DomainError {
    DomainError::Kubernetes(K8sStatus {
        api_version: Some("v1".to_string()),
        kind: Some("Status".to_string()),
        status: Some("Failure".to_string()),
        message: Some(format!("{} is forbidden", operation)),
        reason: Some("Forbidden".to_string()),
        code: 403,
    })
}

fn not_found(what: &str) -> DomainError {
    DomainError::Kubernetes(K8sStatus {
        api_version: Some("v1".to_string()),
        kind: Some("Status".to_string()),
        status: Some("Failure".to_string()),
        message: Some(format!("{} not found", what)),
        reason: Some("NotFound".to_string()),
        code: 404,
    })
}

fn in_namespace(namespace: &Option<String>, expected: &str) -> bool {
    namespace.as_deref() == Some(expected)
}

#[async_trait]
impl RbacClient for FakeRbacClient {
    async fn list_cluster_roles(&self, _user: &LoggedInUser) -> DomainResult<ClusterRoleList> {
        self.record("list_cluster_roles", "")?;
        Ok(List::new("ClusterRoleList", self.state().cluster_roles.clone()))
    }

    async fn list_roles(&self, _user: &LoggedInUser, namespace: &str) -> DomainResult<RoleList> {
        self.record("list_roles", namespace)?;
        let items = self
            .state()
            .roles
            .iter()
            .filter(|r| in_namespace(&r.metadata.namespace, namespace))
            .cloned()
            .collect();
        Ok(List::new("RoleList", items))
    }

    async fn list_cluster_role_bindings(
        &self,
        _user: &LoggedInUser,
    ) -> DomainResult<ClusterRoleBindingList> {
        self.record("list_cluster_role_bindings", "")?;
        Ok(List::new(
            "ClusterRoleBindingList",
            self.state().cluster_role_bindings.clone(),
        ))
    }

    async fn list_role_bindings(
        &self,
        _user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<RoleBindingList> {
        self.record("list_role_bindings", namespace)?;
        let items = self
            .state()
            .role_bindings
            .iter()
            .filter(|b| in_namespace(&b.metadata.namespace, namespace))
            .cloned()
            .collect();
        Ok(List::new("RoleBindingList", items))
    }

    fn cluster_role_list_key(&self, user: Option<&LoggedInUser>) -> Option<String> {
        self.key("cluster_roles", user, "/clusterroles".to_string())
    }

    fn role_list_key(&self, user: Option<&LoggedInUser>, namespace: &str) -> Option<String> {
        self.key("roles", user, format!("/namespaces/{}/roles", namespace))
    }

    fn cluster_role_binding_list_key(&self, user: Option<&LoggedInUser>) -> Option<String> {
        self.key("cluster_role_bindings", user, "/clusterrolebindings".to_string())
    }

    fn role_binding_list_key(
        &self,
        user: Option<&LoggedInUser>,
        namespace: &str,
    ) -> Option<String> {
        self.key(
            "role_bindings",
            user,
            format!("/namespaces/{}/rolebindings", namespace),
        )
    }

    async fn get_cluster_role_binding(
        &self,
        _user: &LoggedInUser,
        name: &str,
    ) -> DomainResult<ClusterRoleBinding> {
        self.record("get_cluster_role_binding", name)?;
        self.state()
            .cluster_role_bindings
            .iter()
            .find(|b| b.metadata.name == name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn create_cluster_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding> {
        self.record("create_cluster_role_binding", &binding.metadata.name)?;
        self.state().cluster_role_bindings.push(binding.clone());
        Ok(binding.clone())
    }

    async fn update_cluster_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding> {
        self.record("update_cluster_role_binding", &binding.metadata.name)?;
        let mut state = self.state();
        let existing = state
            .cluster_role_bindings
            .iter_mut()
            .find(|b| b.metadata.name == binding.metadata.name)
            .ok_or_else(|| not_found(&binding.metadata.name))?;
        *existing = binding.clone();
        Ok(binding.clone())
    }

    async fn delete_cluster_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<()> {
        self.record("delete_cluster_role_binding", &binding.metadata.name)?;
        self.state()
            .cluster_role_bindings
            .retain(|b| b.metadata.name != binding.metadata.name);
        Ok(())
    }

    async fn get_role_binding(
        &self,
        _user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<RoleBinding> {
        self.record("get_role_binding", name)?;
        self.state()
            .role_bindings
            .iter()
            .find(|b| b.metadata.name == name && in_namespace(&b.metadata.namespace, namespace))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn create_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding> {
        self.record("create_role_binding", &binding.metadata.name)?;
        self.state().role_bindings.push(binding.clone());
        Ok(binding.clone())
    }

    async fn update_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding> {
        self.record("update_role_binding", &binding.metadata.name)?;
        let mut state = self.state();
        let existing = state
            .role_bindings
            .iter_mut()
            .find(|b| {
                b.metadata.name == binding.metadata.name
                    && b.metadata.namespace == binding.metadata.namespace
            })
            .ok_or_else(|| not_found(&binding.metadata.name))?;
        *existing = binding.clone();
        Ok(binding.clone())
    }

    async fn delete_role_binding(
        &self,
        _user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<()> {
        self.record("delete_role_binding", &binding.metadata.name)?;
        self.state().role_bindings.retain(|b| {
            !(b.metadata.name == binding.metadata.name
                && b.metadata.namespace == binding.metadata.namespace)
        });
        Ok(())
    }

    async fn list_service_accounts(
        &self,
        _user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<ServiceAccountList> {
        self.record("list_service_accounts", namespace)?;
        let items = self
            .state()
            .service_accounts
            .iter()
            .filter(|sa| in_namespace(&sa.metadata.namespace, namespace))
            .cloned()
            .collect();
        Ok(List::new("ServiceAccountList", items))
    }

    async fn get_service_account(
        &self,
        _user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<ServiceAccount> {
        self.record("get_service_account", name)?;
        self.state()
            .service_accounts
            .iter()
            .find(|sa| sa.metadata.name == name && in_namespace(&sa.metadata.namespace, namespace))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn create_service_account(
        &self,
        _user: &LoggedInUser,
        service_account: &ServiceAccount,
    ) -> DomainResult<ServiceAccount> {
        self.record("create_service_account", &service_account.metadata.name)?;
        self.state().service_accounts.push(service_account.clone());
        Ok(service_account.clone())
    }
}
