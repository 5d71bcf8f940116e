//! Completion of the subject input with existing names.

use crate::domain::errors::DomainResult;
use crate::domain::models::user::LoggedInUser;
use crate::domain::ports::rbac_client::RbacClient;

const FRAGMENT_DELIMITERS: [char; 2] = [',', ';'];

/// Byte offset where the fragment currently being typed starts.
fn fragment_start(value: &str) -> usize {
    value
        .rfind(FRAGMENT_DELIMITERS)
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// Suggestions that contain the fragment being typed, at most `limit`.
///
/// An empty fragment matches every suggestion.
pub fn filter_subject_suggestions(
    input: &str,
    suggestions: &[String],
    limit: usize,
) -> Vec<String> {
    let fragment = input[fragment_start(input)..].trim();

    suggestions
        .iter()
        .filter(|suggestion| fragment.is_empty() || suggestion.contains(fragment))
        .take(limit)
        .cloned()
        .collect()
}

/// Replace the fragment being typed with `suggestion` and start a new one.
pub fn append_subject_suggestion_to_value(value: &str, suggestion: &str) -> String {
    if suggestion.is_empty() {
        return value.to_string();
    }

    let start = fragment_start(value);
    let fragment = &value[start..];
    let indent = fragment.len() - fragment.trim_start().len();

    format!("{}{}, ", &value[..start + indent], suggestion)
}

/// Names of the service accounts that already exist in `namespace`.
#[tracing::instrument(skip(client, user))]
pub async fn fetch_service_account_suggestions(
    client: &dyn RbacClient,
    user: &LoggedInUser,
    namespace: &str,
) -> DomainResult<Vec<String>> {
    let service_accounts = client.list_service_accounts(user, namespace).await?;

    Ok(service_accounts
        .items
        .into_iter()
        .map(|service_account| service_account.metadata.name)
        .collect())
}
