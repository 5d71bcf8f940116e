use crate::domain::models::access_control::RoleItem;

/// Keep the roles whose name contains `query`, ignoring case.
///
/// A blank query keeps every role.
pub fn filter_roles(roles: &[RoleItem], query: &str) -> Vec<RoleItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return roles.to_vec();
    }

    roles
        .iter()
        .filter(|role| role.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
