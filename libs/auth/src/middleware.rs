use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use common_errors::AppError;

use crate::{AuthError, JwtKeys};

/// Rejects requests without a valid `Authorization: Bearer` token.
///
/// A missing or non-bearer header is 401, a token that fails verification is
/// 403. Verified [`Claims`](crate::Claims) are inserted into the request
/// extensions.
pub async fn require_bearer(
    State(keys): State<JwtKeys>, mut request: Request, next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)?;

    let claims = keys.verify(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
