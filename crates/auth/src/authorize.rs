use thiserror::Error;
use tracing::{debug, warn};

use frontdesk_core::{ApiError, DispatchError, RequestContext};

use crate::{AuthorizationParams, Partner, PartnerBackend, PublicActions};

/// Why a request was let through. There is no "denied" variant: denial is
/// always an [`AuthzError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The action is on the public allow-list; no partner was consulted.
    Public,
    /// The partner backend accepted the request.
    Partner,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The backend raised its own error. It takes precedence over the
    /// generic decline.
    #[error("partner backend rejected request: {0}")]
    Backend(ApiError),

    /// The backend declined without saying why.
    #[error("invalid action request")]
    Declined,
}

impl AuthzError {
    pub fn into_api_error(self) -> ApiError {
        match self {
            Self::Backend(err) => err,
            Self::Declined => ApiError::invalid_action_request(),
        }
    }
}

impl From<AuthzError> for DispatchError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Backend(err) => DispatchError::Backend(err),
            AuthzError::Declined => DispatchError::Authorization(ApiError::invalid_action_request()),
        }
    }
}

/// Authorize the requested action.
///
/// - Public actions pass without building a [`Partner`]
/// - Otherwise a partner is built from the request's credentials and handed
///   to the backend; a backend error propagates unchanged, a plain `false`
///   becomes [`AuthzError::Declined`]
///
/// No IO of its own; whatever the backend does is the backend's business.
pub fn authorize<B>(
    public: &PublicActions,
    backend: &B,
    ctx: &RequestContext,
) -> Result<Authorization, AuthzError>
where
    B: PartnerBackend + ?Sized,
{
    let action = ctx.action();

    if public.is_public(action) {
        debug!(%action, "public action, skipping partner check");
        return Ok(Authorization::Public);
    }

    let partner = Partner::new(action.clone(), AuthorizationParams::from_headers(ctx.headers()));

    match backend.authorize(&partner) {
        Ok(true) => {
            debug!(%action, "partner authorized");
            Ok(Authorization::Partner)
        }
        Ok(false) => {
            warn!(%action, has_digest = partner.digest().is_some(), "partner declined");
            Err(AuthzError::Declined)
        }
        Err(err) => {
            warn!(%action, error = %err, "partner backend error");
            Err(AuthzError::Backend(err))
        }
    }
}
