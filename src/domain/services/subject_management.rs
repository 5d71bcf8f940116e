//! Adding and removing subjects on a role, through its bindings.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::access_control::{
    map_ui_subject_type_to_subject_kind, RoleBindingRef, RoleItem, SubjectItem, SubjectType,
};
use crate::domain::models::rbac::{
    ObjectMeta, RoleBinding, RoleRef, ServiceAccount, Subject, SubjectKind, API_GROUP,
    API_VERSION, CLUSTER_ROLE, CLUSTER_ROLE_BINDING, ROLE, ROLE_BINDING,
};
use crate::domain::models::user::LoggedInUser;
use crate::domain::ports::rbac_client::RbacClient;
use futures::future::try_join_all;
use std::collections::BTreeSet;
use tracing::{debug, info};

const DEFAULT_NAMESPACE: &str = "default";

/// An empty binding that points to `role`.
///
/// Cluster roles get a `ClusterRoleBinding`, namespaced roles a
/// `RoleBinding` in the role's namespace.
pub fn make_role_binding(role: &RoleItem, now_millis: i64) -> RoleBinding {
    let (kind, role_kind) = if role.in_cluster {
        (CLUSTER_ROLE_BINDING, CLUSTER_ROLE)
    } else {
        (ROLE_BINDING, ROLE)
    };

    let namespace = (!role.in_cluster).then(|| role.namespace.clone());

    RoleBinding {
        api_version: API_VERSION.to_string(),
        kind: kind.to_string(),
        metadata: ObjectMeta {
            namespace,
            ..ObjectMeta::named(format!("{}-{}", role.name, now_millis))
        },
        role_ref: RoleRef {
            api_group: API_GROUP.to_string(),
            kind: role_kind.to_string(),
            name: role.name.clone(),
        },
        subjects: Vec::new(),
    }
}

/// Bind `subject_names` of the given type to `role` with a new binding.
///
/// Service accounts are created first when they don't exist yet.
#[tracing::instrument(skip(client, user, role), fields(role = %role.name))]
pub async fn create_role_binding_with_subjects(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    subject_type: SubjectType,
    subject_names: &[String],
    role: &RoleItem,
) -> DomainResult<RoleBinding> {
    if subject_names.is_empty() {
        return Err(DomainError::ValidationError(
            "At least one subject is required".to_string(),
        ));
    }

    let kind = map_ui_subject_type_to_subject_kind(subject_type);
    let mut binding = make_role_binding(role, chrono::Utc::now().timestamp_millis());
    let mut service_accounts = BTreeSet::new();

    for name in subject_names {
        let mut subject = Subject {
            kind: kind.clone(),
            name: name.clone(),
            api_group: Some(API_GROUP.to_string()),
            namespace: None,
        };

        if kind == SubjectKind::ServiceAccount {
            let namespace = if role.namespace.is_empty() {
                DEFAULT_NAMESPACE.to_string()
            } else {
                role.namespace.clone()
            };
            subject.api_group = Some(String::new());
            subject.namespace = Some(namespace.clone());
            service_accounts.insert((name.clone(), namespace));
        }

        binding.subjects.push(subject);
    }

    try_join_all(
        service_accounts
            .iter()
            .map(|(name, namespace)| ensure_service_account(client, user, name, namespace)),
    )
    .await?;

    let created = if role.in_cluster {
        client.create_cluster_role_binding(user, &binding).await?
    } else {
        client.create_role_binding(user, &binding).await?
    };

    info!(
        binding = %created.metadata.name,
        subjects = created.subjects.len(),
        "Created role binding"
    );

    Ok(created)
}

/// Remove a subject from every binding that grants it `role`.
///
/// Bindings left without subjects are deleted. Unknown subjects are a no-op.
#[tracing::instrument(skip(client, user, role), fields(role = %role.name))]
pub async fn delete_subject_from_role(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    subject_name: &str,
    subject_type: SubjectType,
    role: &RoleItem,
) -> DomainResult<()> {
    let Some(subject) = find_subject_in_role_item(subject_name, subject_type, role) else {
        debug!("Subject not bound to role, nothing to delete");
        return Ok(());
    };

    try_join_all(subject.role_bindings.iter().map(|binding| {
        delete_subject_from_binding(client, user, subject, subject_type, binding, role.in_cluster)
    }))
    .await?;

    Ok(())
}

pub fn find_subject_in_role_item<'a>(
    subject_name: &str,
    subject_type: SubjectType,
    role: &'a RoleItem,
) -> Option<&'a SubjectItem> {
    role.subjects(subject_type).get(subject_name)
}

async fn delete_subject_from_binding(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    subject: &SubjectItem,
    subject_type: SubjectType,
    binding: &RoleBindingRef,
    in_cluster: bool,
) -> DomainResult<()> {
    let kind = map_ui_subject_type_to_subject_kind(subject_type);

    let mut resource = if in_cluster {
        client.get_cluster_role_binding(user, &binding.name).await?
    } else {
        client
            .get_role_binding(user, &binding.name, &binding.namespace)
            .await?
    };

    resource
        .subjects
        .retain(|s| !(s.kind == kind && s.name == subject.name));

    match (resource.subjects.is_empty(), in_cluster) {
        (true, true) => client.delete_cluster_role_binding(user, &resource).await?,
        (true, false) => client.delete_role_binding(user, &resource).await?,
        (false, true) => {
            client.update_cluster_role_binding(user, &resource).await?;
        }
        (false, false) => {
            client.update_role_binding(user, &resource).await?;
        }
    }

    debug!(binding = %binding.name, "Removed subject from binding");
    Ok(())
}

async fn ensure_service_account(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    name: &str,
    namespace: &str,
) -> DomainResult<ServiceAccount> {
    match client.get_service_account(user, name, namespace).await {
        Ok(existing) => Ok(existing),
        Err(err) if err.is_not_found() => {
            info!(name, namespace, "Creating service account");
            client
                .create_service_account(user, &ServiceAccount::new(name, namespace))
                .await
        }
        Err(err) => Err(err),
    }
}
