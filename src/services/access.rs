//! Staff capability gate for mutating endpoints

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

pub const ROLE_HEADER: &str = "x-user-role";
pub const STAFF_ROLE: &str = "staff";

/// Proof that the request carried the staff role. Mutating order operations
/// take a `&Staff`, so they are unreachable without passing the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    role: String,
}

impl Staff {
    pub fn role(&self) -> &str {
        &self.role
    }
}

/// The role must be exactly `staff`; anything else, or no role, is forbidden.
pub fn require_staff(role: Option<&str>) -> Result<Staff, ApiError> {
    match role {
        Some(STAFF_ROLE) => Ok(Staff {
            role: STAFF_ROLE.to_string(),
        }),
        other => {
            tracing::warn!(role = ?other, "Rejected request without staff role");
            Err(ApiError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for Staff
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok());
        require_staff(role)
    }
}
