//! Kubernetes resources consumed by the access control view.
//!
//! Only the fields the dashboard reads or writes are modelled. Absent and
//! `null` values both deserialize to `None`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_GROUP: &str = "rbac.authorization.k8s.io";
pub const API_VERSION: &str = "rbac.authorization.k8s.io/v1";

pub const CLUSTER_ROLE: &str = "ClusterRole";
pub const ROLE: &str = "Role";
pub const CLUSTER_ROLE_BINDING: &str = "ClusterRoleBinding";
pub const ROLE_BINDING: &str = "RoleBinding";
pub const SERVICE_ACCOUNT: &str = "ServiceAccount";

pub const LABEL_MANAGED_BY: &str = "giantswarm.io/managed-by";
pub const LABEL_UI_DISPLAY: &str = "ui.giantswarm.io/display";
pub const LABEL_APP_BRANCH: &str = "app.giantswarm.io/branch";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalizers: Option<Vec<String>>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }

    pub fn managed_by(&self) -> Option<&str> {
        self.label(LABEL_MANAGED_BY)
    }

    pub fn app_branch(&self) -> Option<&str> {
        self.label(LABEL_APP_BRANCH)
    }

    /// `Some(false)` only when the label is explicitly set to `"false"`.
    pub fn ui_display(&self) -> Option<bool> {
        match self.label(LABEL_UI_DISPLAY)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbs: Option<Vec<String>>,
    #[serde(
        default,
        rename = "nonResourceURLs",
        skip_serializing_if = "Option::is_none"
    )]
    pub non_resource_urls: Option<Vec<String>>,
}

/// A `Role` or a `ClusterRole`. The scope is given by the list it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<PolicyRule>,
}

pub type ClusterRole = Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub api_group: String,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectKind {
    Group,
    User,
    ServiceAccount,
    /// Any kind this dashboard does not know about.
    Unknown(String),
}

impl From<String> for SubjectKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "Group" => SubjectKind::Group,
            "User" => SubjectKind::User,
            "ServiceAccount" => SubjectKind::ServiceAccount,
            _ => SubjectKind::Unknown(kind),
        }
    }
}

impl From<SubjectKind> for String {
    fn from(kind: SubjectKind) -> Self {
        match kind {
            SubjectKind::Group => "Group".to_string(),
            SubjectKind::User => "User".to_string(),
            SubjectKind::ServiceAccount => "ServiceAccount".to_string(),
            SubjectKind::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// A `RoleBinding` or a `ClusterRoleBinding`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub role_ref: RoleRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjects: Vec<Subject>,
}

pub type ClusterRoleBinding = RoleBinding;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: ObjectMeta,
}

impl ServiceAccount {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: SERVICE_ACCOUNT.to_string(),
            metadata: ObjectMeta {
                namespace: Some(namespace.to_string()),
                ..ObjectMeta::named(name)
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct List<T> {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub items: Vec<T>,
}

impl<T> List<T> {
    pub fn new(kind: &str, items: Vec<T>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: kind.to_string(),
            metadata: ListMeta::default(),
            items,
        }
    }
}

pub type ClusterRoleList = List<ClusterRole>;
pub type RoleList = List<Role>;
pub type ClusterRoleBindingList = List<ClusterRoleBinding>;
pub type RoleBindingList = List<RoleBinding>;
pub type ServiceAccountList = List<ServiceAccount>;

/// `meta/v1` `Status`, returned by the API server on failed requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K8sStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub code: u16,
}

impl K8sStatus {
    pub fn is_status(value: &serde_json::Value) -> bool {
        value.get("kind").and_then(|kind| kind.as_str()) == Some("Status")
    }

    pub fn is_not_found(&self) -> bool {
        self.reason.as_deref() == Some("NotFound") || self.code == 404
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
