use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::access_control::{RoleItem, SubjectType};
use crate::domain::models::user::LoggedInUser;
use crate::domain::ports::rbac_client::RbacClient;
use crate::domain::services::{
    create_role_binding_with_subjects, delete_subject_from_role,
    fetch_service_account_suggestions, filter_roles, filter_subject_suggestions,
    get_org_namespace_from_org_name, get_role_items, get_role_items_key, parse_subjects,
};
use std::sync::Arc;

/// Access control operations for one organization at a time.
#[derive(Clone)]
pub struct AccessControlService {
    client: Arc<dyn RbacClient>,
}

impl AccessControlService {
    pub fn new(client: Arc<dyn RbacClient>) -> Self {
        Self { client }
    }

    /// Roles of the organization, filtered by `query`.
    pub async fn list_roles(
        &self,
        user: &LoggedInUser,
        organization: &str,
        query: &str,
    ) -> DomainResult<Vec<RoleItem>> {
        let namespace = get_org_namespace_from_org_name(organization);
        let roles = get_role_items(self.client.as_ref(), user, &namespace).await?;

        Ok(filter_roles(&roles, query))
    }

    pub fn roles_key(&self, user: Option<&LoggedInUser>, organization: &str) -> Option<String> {
        let namespace = get_org_namespace_from_org_name(organization);
        get_role_items_key(self.client.as_ref(), user, &namespace)
    }

    pub async fn get_role(
        &self,
        user: &LoggedInUser,
        organization: &str,
        role_name: &str,
    ) -> DomainResult<RoleItem> {
        let namespace = get_org_namespace_from_org_name(organization);
        get_role_items(self.client.as_ref(), user, &namespace)
            .await?
            .into_iter()
            .find(|role| role.name == role_name)
            .ok_or_else(|| DomainError::NotFound(format!("Role {} not found", role_name)))
    }

    /// Bind the subjects typed by the user to a role and return the
    /// refreshed role.
    pub async fn add_subjects(
        &self,
        user: &LoggedInUser,
        organization: &str,
        role_name: &str,
        subject_type: SubjectType,
        raw_subjects: &str,
    ) -> DomainResult<RoleItem> {
        let subject_names = parse_subjects(raw_subjects);
        if subject_names.is_empty() {
            return Err(DomainError::ValidationError(
                "Please enter at least one subject".to_string(),
            ));
        }

        let role = self.get_role(user, organization, role_name).await?;
        create_role_binding_with_subjects(
            self.client.as_ref(),
            user,
            subject_type,
            &subject_names,
            &role,
        )
        .await?;

        self.get_role(user, organization, role_name).await
    }

    pub async fn remove_subject(
        &self,
        user: &LoggedInUser,
        organization: &str,
        role_name: &str,
        subject_type: SubjectType,
        subject_name: &str,
    ) -> DomainResult<()> {
        let role = self.get_role(user, organization, role_name).await?;

        if let Some(subject) = role.subjects(subject_type).get(subject_name) {
            if !subject.is_editable {
                return Err(DomainError::Forbidden(format!(
                    "Subject {} is managed by the system",
                    subject_name
                )));
            }
        }

        delete_subject_from_role(
            self.client.as_ref(),
            user,
            subject_name,
            subject_type,
            &role,
        )
        .await
    }

    /// Existing service accounts of the organization matching the subject
    /// being typed in `input`.
    pub async fn service_account_suggestions(
        &self,
        user: &LoggedInUser,
        organization: &str,
        input: &str,
        limit: usize,
    ) -> DomainResult<Vec<String>> {
        let namespace = get_org_namespace_from_org_name(organization);
        let suggestions =
            fetch_service_account_suggestions(self.client.as_ref(), user, &namespace).await?;

        Ok(filter_subject_suggestions(input, &suggestions, limit))
    }
}
