use crate::domain::errors::DomainResult;
use crate::domain::models::rbac::{
    ClusterRoleBinding, ClusterRoleBindingList, ClusterRoleList, RoleBinding, RoleBindingList,
    RoleList, ServiceAccount, ServiceAccountList,
};
use crate::domain::models::user::LoggedInUser;
use async_trait::async_trait;

/// Access to the RBAC resources of the management cluster.
///
/// The `*_key` functions return the cache key of the matching list
/// request, or `None` while no key can be built (e.g. no user yet).
#[async_trait]
pub trait RbacClient: Send + Sync {
    async fn list_cluster_roles(&self, user: &LoggedInUser) -> DomainResult<ClusterRoleList>;
    async fn list_roles(&self, user: &LoggedInUser, namespace: &str) -> DomainResult<RoleList>;
    async fn list_cluster_role_bindings(
        &self,
        user: &LoggedInUser,
    ) -> DomainResult<ClusterRoleBindingList>;
    async fn list_role_bindings(
        &self,
        user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<RoleBindingList>;

    fn cluster_role_list_key(&self, user: Option<&LoggedInUser>) -> Option<String>;
    fn role_list_key(&self, user: Option<&LoggedInUser>, namespace: &str) -> Option<String>;
    fn cluster_role_binding_list_key(&self, user: Option<&LoggedInUser>) -> Option<String>;
    fn role_binding_list_key(&self, user: Option<&LoggedInUser>, namespace: &str)
        -> Option<String>;

    async fn get_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        name: &str,
    ) -> DomainResult<ClusterRoleBinding>;
    async fn create_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding>;
    async fn update_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<ClusterRoleBinding>;
    async fn delete_cluster_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &ClusterRoleBinding,
    ) -> DomainResult<()>;

    async fn get_role_binding(
        &self,
        user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<RoleBinding>;
    async fn create_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding>;
    async fn update_role_binding(
        &self,
        user: &LoggedInUser,
        binding: &RoleBinding,
    ) -> DomainResult<RoleBinding>;
    async fn delete_role_binding(&self, user: &LoggedInUser, binding: &RoleBinding)
        -> DomainResult<()>;

    async fn list_service_accounts(
        &self,
        user: &LoggedInUser,
        namespace: &str,
    ) -> DomainResult<ServiceAccountList>;
    async fn get_service_account(
        &self,
        user: &LoggedInUser,
        name: &str,
        namespace: &str,
    ) -> DomainResult<ServiceAccount>;
    async fn create_service_account(
        &self,
        user: &LoggedInUser,
        service_account: &ServiceAccount,
    ) -> DomainResult<ServiceAccount>;
}
