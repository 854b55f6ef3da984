use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use http::HeaderName;
use once_cell::sync::Lazy;

use crate::error::ApiError;

static X_USER_ID: Lazy<HeaderName> = Lazy::new(|| HeaderName::from_static("x-user-id"));
static X_USER_NAME: Lazy<HeaderName> = Lazy::new(|| HeaderName::from_static("x-user-name"));

/// Caller identity, injected as headers by the upstream auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (header(&X_USER_ID), header(&X_USER_NAME)) {
            (Some(id), Some(name)) => Ok(AuthUser { id, name }),
            _ => Err(ApiError::Unauthorized("Authentication required".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[tokio::test]
    async fn test_extracts_identity_headers() {
        let request = Request::builder()
            .header("x-user-id", "user-1")
            .header("x-user-name", "Anna Kowalska")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.name, "Anna Kowalska");
    }

    #[tokio::test]
    async fn test_rejects_missing_identity() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        assert!(AuthUser::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_blank_user_id() {
        let request = Request::builder()
            .header("x-user-id", "  ")
            .header("x-user-name", "Anna")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        assert!(AuthUser::from_request_parts(&mut parts, &()).await.is_err());
    }
}
