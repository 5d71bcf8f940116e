use crate::domain::models::access_control::{Permission, RoleBindingRef, RoleItem, SubjectItem};
use crate::domain::models::rbac::{
    ClusterRoleBindingList, ClusterRoleList, PolicyRule, Role, RoleBinding, RoleBindingList,
    RoleList, SubjectKind,
};
use std::collections::HashMap;

const SYSTEM_PREFIX: &str = "system:";
const RBAC_OPERATOR: &str = "rbac-operator";

/// Merge roles and their bindings into the items rendered by the
/// access control view.
///
/// Cluster roles are inserted first, so a namespaced role never replaces a
/// cluster role with the same name. `ClusterRoleBinding`s only attach
/// subjects to cluster roles and `RoleBinding`s only to namespaced ones.
pub fn map_resources_to_ui_roles(
    cluster_roles: &ClusterRoleList,
    roles: &RoleList,
    cluster_role_bindings: &ClusterRoleBindingList,
    role_bindings: &RoleBindingList,
) -> Vec<RoleItem> {
    let mut role_map = RoleMap::default();

    for role in &cluster_roles.items {
        if !role_map.contains(&role.metadata.name) && should_display_role(role) {
            role_map.insert(make_role_item(role, true, String::new()));
        }
    }

    for role in &roles.items {
        if !role_map.contains(&role.metadata.name) && should_display_role(role) {
            let namespace = role.metadata.namespace.clone().unwrap_or_default();
            role_map.insert(make_role_item(role, false, namespace));
        }
    }

    for binding in &cluster_role_bindings.items {
        if let Some(item) = role_map.get_mut(&binding.role_ref.name) {
            if item.in_cluster {
                append_subjects_to_role_item(binding, item);
            }
        }
    }

    for binding in &role_bindings.items {
        if let Some(item) = role_map.get_mut(&binding.role_ref.name) {
            if !item.in_cluster {
                append_subjects_to_role_item(binding, item);
            }
        }
    }

    let items = role_map.into_items();
    metrics::counter!("happa_role_aggregations_total").increment(1);
    tracing::debug!(roles = items.len(), "Aggregated access control roles");

    items
}

/// Map every policy rule of a role to a permission, keeping rule order.
pub fn get_role_permissions(rules: &[PolicyRule]) -> Vec<Permission> {
    rules
        .iter()
        .map(|rule| Permission {
            api_groups: rule.api_groups.clone().unwrap_or_default(),
            resources: rule.resources.clone().unwrap_or_default(),
            resource_names: rule.resource_names.clone().unwrap_or_default(),
            verbs: rule.verbs.clone().unwrap_or_default(),
        })
        .collect()
}

/// Sort permissions by API groups, then resources, resource names and verbs.
pub fn sort_permissions(permissions: &mut [Permission]) {
    permissions.sort();
}

/// Roles that are internal to Kubernetes or to the platform stay hidden.
pub fn should_display_role(role: &Role) -> bool {
    let meta = &role.metadata;

    if meta.name.starts_with(SYSTEM_PREFIX) {
        return false;
    }
    if meta.app_branch().is_some() && meta.managed_by() == Some(RBAC_OPERATOR) {
        return false;
    }
    if meta.ui_display() == Some(false) {
        return false;
    }

    true
}

pub fn is_subject_editable(name: &str) -> bool {
    !name.starts_with(SYSTEM_PREFIX)
}

/// Group the subjects of a binding by kind and add them to `role`.
pub fn append_subjects_to_role_item(binding: &RoleBinding, role: &mut RoleItem) {
    let binding_ref = RoleBindingRef {
        name: binding.metadata.name.clone(),
        namespace: binding.metadata.namespace.clone().unwrap_or_default(),
    };

    for subject in &binding.subjects {
        let subjects = match subject.kind {
            SubjectKind::Group => &mut role.groups,
            SubjectKind::User => &mut role.users,
            SubjectKind::ServiceAccount => &mut role.service_accounts,
            SubjectKind::Unknown(ref kind) => {
                tracing::trace!(kind = %kind, name = %subject.name, "Ignoring subject of unknown kind");
                continue;
            }
        };

        let mut role_bindings = subjects
            .remove(&subject.name)
            .map(|existing| existing.role_bindings)
            .unwrap_or_default();
        if !role_bindings.contains(&binding_ref) {
            role_bindings.push(binding_ref.clone());
        }

        subjects.insert(
            subject.name.clone(),
            SubjectItem {
                name: subject.name.clone(),
                is_editable: is_subject_editable(&subject.name),
                role_bindings,
            },
        );
    }
}

fn make_role_item(role: &Role, in_cluster: bool, namespace: String) -> RoleItem {
    RoleItem {
        name: role.metadata.name.clone(),
        namespace,
        in_cluster,
        managed_by: role.metadata.managed_by().unwrap_or_default().to_string(),
        groups: Default::default(),
        users: Default::default(),
        service_accounts: Default::default(),
        permissions: get_role_permissions(&role.rules),
    }
}

/// Name-keyed role items that remember insertion order. The first insert
/// for a name wins.
#[derive(Default)]
struct RoleMap {
    items: Vec<RoleItem>,
    index: HashMap<String, usize>,
}

impl RoleMap {
    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn insert(&mut self, item: RoleItem) {
        if self.contains(&item.name) {
            return;
        }
        self.index.insert(item.name.clone(), self.items.len());
        self.items.push(item);
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut RoleItem> {
        let position = *self.index.get(name)?;
        self.items.get_mut(position)
    }

    fn into_items(self) -> Vec<RoleItem> {
        self.items
    }
}
