//! Acting-user extraction.
//!
//! Authentication happens upstream; the gateway in front of this service
//! forwards the authenticated user as a UUID in `x-actor-id`.

use axum::{extract::FromRequestParts, http::request::Parts};

use tourbook_core::transaction::Actor;
use tourbook_shared::AppError;
use tourbook_shared::types::UserId;

use crate::error::ApiError;

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The back-office user performing the request.
///
/// ```ignore
/// async fn handler(actor: CurrentActor) -> impl IntoResponse {
///     let user_id = actor.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentActor(pub UserId);

impl CurrentActor {
    /// Returns the user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0
    }

    /// Returns the engine actor.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::User(self.0)
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| ApiError::from(AppError::Unauthorized(message.to_string()));

        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| unauthorized("x-actor-id header is required"))?;

        value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<UserId>().ok())
            .map(CurrentActor)
            .ok_or_else(|| unauthorized("x-actor-id is not a valid id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use rstest::rstest;

    async fn extract(header: Option<&str>) -> Result<CurrentActor, ApiError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACTOR_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        CurrentActor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_header() {
        let id = UserId::new();
        let actor = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(actor.user_id(), id);
        assert_eq!(actor.actor(), Actor::User(id));
    }

    #[rstest]
    #[case::missing(None)]
    #[case::empty(Some(""))]
    #[case::not_a_uuid(Some("not-a-uuid"))]
    #[case::bearer_token(Some("Bearer abc.def"))]
    #[tokio::test]
    async fn test_bad_header_is_unauthorized(#[case] header: Option<&str>) {
        let err = extract(header).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
