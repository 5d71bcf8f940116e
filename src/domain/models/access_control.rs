use crate::domain::models::rbac::SubjectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A role as rendered by the access control view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleItem {
    pub name: String,
    /// Empty for cluster-scoped roles.
    pub namespace: String,
    pub in_cluster: bool,
    pub managed_by: String,
    pub groups: BTreeMap<String, SubjectItem>,
    pub users: BTreeMap<String, SubjectItem>,
    pub service_accounts: BTreeMap<String, SubjectItem>,
    pub permissions: Vec<Permission>,
}

impl RoleItem {
    pub fn subjects(&self, subject_type: SubjectType) -> &BTreeMap<String, SubjectItem> {
        match subject_type {
            SubjectType::Group => &self.groups,
            SubjectType::User => &self.users,
            SubjectType::ServiceAccount => &self.service_accounts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectItem {
    pub name: String,
    pub is_editable: bool,
    /// Every binding that grants the role to this subject.
    pub role_bindings: Vec<RoleBindingRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleBindingRef {
    pub name: String,
    /// Empty for `ClusterRoleBinding`s.
    pub namespace: String,
}

/// Ordered field by field, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub resource_names: Vec<String>,
    pub verbs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SubjectType {
    Group,
    User,
    ServiceAccount,
}

impl SubjectType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "group" | "groups" => Some(SubjectType::Group),
            "user" | "users" => Some(SubjectType::User),
            "serviceAccount" | "serviceAccounts" => Some(SubjectType::ServiceAccount),
            _ => None,
        }
    }
}

pub fn map_ui_subject_type_to_subject_kind(subject_type: SubjectType) -> SubjectKind {
    match subject_type {
        SubjectType::Group => SubjectKind::Group,
        SubjectType::User => SubjectKind::User,
        SubjectType::ServiceAccount => SubjectKind::ServiceAccount,
    }
}
