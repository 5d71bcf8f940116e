use crate::domain::models::user::LoggedInUser;
use crate::infrastructure::http::middleware::error::ApiError;
use crate::application::services::AccessControlService;
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

#[derive(Clone)]
pub struct AppState {
    pub access_control_service: AccessControlService,
}

/// The caller's credentials, forwarded to the Kubernetes API as is.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: LoggedInUser,
}

/// Middleware that rejects requests without usable credentials.
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(LoggedInUser::from_authorization_header)
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}
