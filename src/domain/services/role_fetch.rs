use crate::domain::errors::DomainResult;
use crate::domain::models::access_control::RoleItem;
use crate::domain::models::user::LoggedInUser;
use crate::domain::ports::rbac_client::RbacClient;
use crate::domain::services::role_aggregator::map_resources_to_ui_roles;

/// Fetch the roles and role bindings visible in `namespace` and map them to
/// role items.
///
/// The four list requests run concurrently. The first failure is returned
/// as is; no partial result is produced.
#[tracing::instrument(skip(client, user))]
pub async fn get_role_items(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    namespace: &str,
) -> DomainResult<Vec<RoleItem>> {
    let (cluster_roles, roles, cluster_role_bindings, role_bindings) = futures::try_join!(
        client.list_cluster_roles(user),
        client.list_roles(user, namespace),
        client.list_cluster_role_bindings(user),
        client.list_role_bindings(user, namespace),
    )?;

    Ok(map_resources_to_ui_roles(
        &cluster_roles,
        &roles,
        &cluster_role_bindings,
        &role_bindings,
    ))
}

/// The cache key of [`get_role_items`], or `None` if any of the underlying
/// list requests cannot be keyed yet.
pub fn get_role_items_key(
    client: &dyn RbacClient,
    user: Option<&LoggedInUser>,
    namespace: &str,
) -> Option<String> {
    let key_parts = [
        client.cluster_role_list_key(user),
        client.role_list_key(user, namespace),
        client.cluster_role_binding_list_key(user),
        client.role_binding_list_key(user, namespace),
    ];

    let mut key = String::new();
    for part in key_parts {
        match part {
            Some(part) if !part.is_empty() => key.push_str(&part),
            _ => return None,
        }
    }

    Some(key)
}

/// Organizations live in their own `org-<name>` namespace.
pub fn get_org_namespace_from_org_name(name: &str) -> String {
    format!("org-{}", name)
}
