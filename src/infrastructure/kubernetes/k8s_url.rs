//! URLs for the Kubernetes API.

use crate::domain::errors::{DomainError, DomainResult};
use std::collections::BTreeMap;

/// Where a request goes: `{base}/{api prefix}[/namespaces/{ns}]/{kind}[/{name}]`.
#[derive(Debug, Clone, Default)]
pub struct K8sUrlOptions<'a> {
    /// Plural resource kind, e.g. `rolebindings`.
    pub kind: &'a str,
    /// Group and version, e.g. `rbac.authorization.k8s.io/v1`. Must be
    /// `None` for core resources.
    pub api_version: Option<&'a str>,
    pub is_core: bool,
    pub namespace: Option<&'a str>,
    pub name: Option<&'a str>,
    pub label_selector: Option<&'a BTreeMap<String, String>>,
}

pub fn create(base_url: &str, options: &K8sUrlOptions<'_>) -> DomainResult<String> {
    let mut parts: Vec<String> = Vec::new();

    match (options.api_version, options.is_core) {
        (Some(_), true) => {
            return Err(DomainError::Internal(
                "The option 'api_version' cannot be set for core resources".to_string(),
            ))
        }
        (Some(api_version), false) => {
            parts.push("apis".to_string());
            parts.push(api_version.to_string());
        }
        (None, true) => {
            parts.push("api".to_string());
            parts.push("v1".to_string());
        }
        (None, false) => {
            return Err(DomainError::Internal(
                "The option 'api_version' must be set for non-core resources".to_string(),
            ))
        }
    }

    if let Some(namespace) = options.namespace.filter(|ns| !ns.is_empty()) {
        parts.push(format!("namespaces/{}", namespace));
    }

    parts.push(options.kind.to_string());

    if let Some(name) = options.name {
        parts.push(name.to_string());
    }

    let mut url = format!("{}/{}", base_url.trim_end_matches('/'), parts.join("/"));

    if let Some(selector) = options.label_selector.filter(|s| !s.is_empty()) {
        let selector = selector
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");
        url.push_str("/?labelSelector=");
        url.push_str(&urlencoding::encode(&selector));
    }

    Ok(url)
}
