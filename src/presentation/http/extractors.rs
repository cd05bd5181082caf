//! Custom Axum Extractors

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json, RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::presentation::middleware::verify_token;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Longest user id accepted from the trusted header
const MAX_USER_ID_LENGTH: usize = 64;

/// The user making the request.
///
/// A bearer token wins when present. The plain user id header is only
/// honoured when `auth.trust_user_id_header` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.settings.auth;

        if parts.headers.contains_key(AUTHORIZATION) {
            if !auth.verifies_tokens() {
                return Err(AppError::Unauthorized("Bearer tokens are not accepted".into()));
            }
            let TypedHeader(Authorization(bearer)) = parts
                .extract::<TypedHeader<Authorization<Bearer>>>()
                .await
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".into()))?;
            let user_id = verify_token(bearer.token(), &auth.jwt_secret)?;
            return Ok(Caller { user_id });
        }

        if auth.trust_user_id_header {
            if let Some(value) = parts.headers.get(auth.user_id_header.as_str()) {
                let user_id = value
                    .to_str()
                    .map_err(|_| AppError::Unauthorized("Invalid user id header".into()))?
                    .trim();
                if user_id.is_empty() || user_id.len() > MAX_USER_ID_LENGTH {
                    return Err(AppError::Unauthorized("Invalid user id header".into()));
                }
                return Ok(Caller {
                    user_id: user_id.to_string(),
                });
            }
        }

        Err(AppError::Unauthorized("Missing caller identity".into()))
    }
}

/// JSON body that has passed `validator` checks.
///
/// Unreadable bodies are reported as 400 rather than axum's 415/422.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        validate(&value)?;
        Ok(Self(value))
    }
}
