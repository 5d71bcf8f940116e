use happa::domain::models::rbac::{
    ObjectMeta, PolicyRule, Role, RoleBinding, RoleRef, Subject, SubjectKind, API_GROUP,
    API_VERSION, CLUSTER_ROLE, CLUSTER_ROLE_BINDING, ROLE, ROLE_BINDING,
};
use happa::domain::models::user::LoggedInUser;
use std::collections::BTreeMap;

pub const ORG: &str = "giantswarm";
pub const ORG_NAMESPACE: &str = "org-giantswarm";

pub fn test_user() -> LoggedInUser {
    LoggedInUser::new("Bearer", "test-token")
}

pub fn rule(api_groups: &[&str], resources: &[&str], verbs: &[&str]) -> PolicyRule {
    PolicyRule {
        api_groups: Some(api_groups.iter().map(|s| s.to_string()).collect()),
        resources: Some(resources.iter().map(|s| s.to_string()).collect()),
        verbs: Some(verbs.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
}

pub fn cluster_role(name: &str) -> Role {
    Role {
        api_version: API_VERSION.to_string(),
        kind: CLUSTER_ROLE.to_string(),
        metadata: ObjectMeta::named(name),
        rules: vec![rule(&["*"], &["*"], &["*"])],
    }
}

pub fn namespaced_role(name: &str, namespace: &str) -> Role {
    Role {
        api_version: API_VERSION.to_string(),
        kind: ROLE.to_string(),
        metadata: ObjectMeta {
            namespace: Some(namespace.to_string()),
            ..ObjectMeta::named(name)
        },
        rules: vec![rule(&[""], &["pods"], &["get", "list", "watch"])],
    }
}

pub fn labelled(mut role: Role, labels: &[(&str, &str)]) -> Role {
    let map: BTreeMap<String, String> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    role.metadata.labels = Some(map);
    role
}

pub fn subject(kind: SubjectKind, name: &str) -> Subject {
    Subject {
        kind,
        name: name.to_string(),
        api_group: Some(API_GROUP.to_string()),
        namespace: None,
    }
}

pub fn cluster_role_binding(name: &str, role: &str, subjects: Vec<Subject>) -> RoleBinding {
    RoleBinding {
        api_version: API_VERSION.to_string(),
        kind: CLUSTER_ROLE_BINDING.to_string(),
        metadata: ObjectMeta::named(name),
        role_ref: RoleRef {
            api_group: API_GROUP.to_string(),
            kind: CLUSTER_ROLE.to_string(),
            name: role.to_string(),
        },
        subjects,
    }
}

pub fn role_binding(
    name: &str,
    namespace: &str,
    role_kind: &str,
    role: &str,
    subjects: Vec<Subject>,
) -> RoleBinding {
    RoleBinding {
        api_version: API_VERSION.to_string(),
        kind: ROLE_BINDING.to_string(),
        metadata: ObjectMeta {
            namespace: Some(namespace.to_string()),
            ..ObjectMeta::named(name)
        },
        role_ref: RoleRef {
            api_group: API_GROUP.to_string(),
            kind: role_kind.to_string(),
            name: role.to_string(),
        },
        subjects,
    }
}
