use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::account::models::AccountId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity resolved from a verified token, stored in request extensions
/// for the downstream handler. Derived purely from the signed claim; the
/// gate never consults the store.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub account_id: AccountId,
}

/// Middleware gating every protected route.
///
/// A request without a bearer credential is rejected as forbidden; a
/// request whose token fails verification is rejected as unauthorized.
/// The two cases are told apart in the logs only.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_bearer_token(&req)?;

    // Verify signature and expiry
    let claims = state.token_service.verify(token).map_err(|e| {
        tracing::warn!(reason = "unauthorized", error = %e, "token rejected");
        ApiError::Unauthorized("Unauthorized access".to_string()).into_response()
    })?;

    let account_id = AccountId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(reason = "unauthorized", error = %e, "token subject is not an account id");
        ApiError::Unauthorized("Unauthorized access".to_string()).into_response()
    })?;

    req.extensions_mut()
        .insert(AuthenticatedIdentity { account_id });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!(reason = "no_credential", "missing Authorization header");
            ApiError::Forbidden("No credential provided".to_string()).into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!(reason = "no_credential", "Authorization header is not valid UTF-8");
        ApiError::Forbidden("No credential provided".to_string()).into_response()
    })?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        tracing::warn!(reason = "no_credential", "Authorization header is not a bearer scheme");
        return Err(ApiError::Forbidden("No credential provided".to_string()).into_response());
    };

    Ok(token)
}
