use std::collections::HashSet;

use frontdesk_core::{ActionName, ApiError, Headers};

/// Header carrying a partner digest when no `Authorization: Digest` is sent.
pub const PARTNER_DIGEST_HEADER: &str = "x-partner-digest";

const DIGEST_SCHEME: &str = "Digest ";

/// Raw credentials extracted from the request for a partner check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationParams {
    pub digest: Option<String>,
}

impl AuthorizationParams {
    /// Extract a digest credential from request headers.
    ///
    /// `Authorization: Digest <credential>` wins over `X-Partner-Digest`.
    pub fn from_headers(headers: &Headers) -> Self {
        let from_authorization = headers.get("authorization").and_then(|value| {
            value
                .get(..DIGEST_SCHEME.len())
                .filter(|scheme| scheme.eq_ignore_ascii_case(DIGEST_SCHEME))
                .map(|_| value[DIGEST_SCHEME.len()..].trim())
        });

        let digest = from_authorization
            .or_else(|| headers.get(PARTNER_DIGEST_HEADER).map(str::trim))
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Self { digest }
    }
}

/// A stateless authorization principal, scoped to a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    action: ActionName,
    params: AuthorizationParams,
}

impl Partner {
    pub fn new(action: ActionName, params: AuthorizationParams) -> Self {
        Self { action, params }
    }

    pub fn action(&self) -> &ActionName {
        &self.action
    }

    pub fn params(&self) -> &AuthorizationParams {
        &self.params
    }

    pub fn digest(&self) -> Option<&str> {
        self.params.digest.as_deref()
    }
}

/// Partner verification backend.
///
/// Three outcomes, all meaningful:
/// - `Ok(true)`: authorized
/// - `Ok(false)`: declined without a reason
/// - `Err(_)`: declined with a reason the client should see
pub trait PartnerBackend: Send + Sync {
    fn authorize(&self, partner: &Partner) -> Result<bool, ApiError>;
}

/// In-memory backend accepting a fixed set of digests for any action.
#[derive(Debug, Clone, Default)]
pub struct StaticPartnerBackend {
    digests: HashSet<String>,
}

impl StaticPartnerBackend {
    pub fn new<I, S>(digests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            digests: digests.into_iter().map(Into::into).collect(),
        }
    }
}

impl PartnerBackend for StaticPartnerBackend {
    fn authorize(&self, partner: &Partner) -> Result<bool, ApiError> {
        let Some(digest) = partner.digest() else {
            return Err(ApiError::new(
                "ERROR_MISSING_PARTNER_DIGEST",
                "A partner digest credential is required for this action",
                401,
            )
            .with_at(partner.action().as_str()));
        };

        Ok(self.digests.contains(digest))
    }
}
