//! Caller identity resolution.
//!
//! A deployment picks one of three strategies: open (no identity), bearer
//! claims (the transport verifies a token and forwards its claim set), or
//! session (the transport binds an authenticated username to the request).
//! Operations resolve identity before reading any other input or touching
//! the store, so a failed resolution reveals nothing about the data.

use serde_json::{Map, Value};

use crate::LedgerError;

/// Request context the transport attaches to every operation call.
///
/// At most one of the two credential slots is populated; which one is
/// consulted depends on the configured [`IdentityMode`].
#[derive(Clone, Debug, Default)]
pub struct Caller {
    /// Claim set of a bearer token the transport already verified.
    pub claims: Option<Map<String, Value>>,
    /// Username bound to the request by a session-style transport.
    pub session_user: Option<String>,
}

impl Caller {
    /// A caller with no credentials attached.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_claims(claims: Map<String, Value>) -> Self {
        Self {
            claims: Some(claims),
            session_user: None,
        }
    }

    pub fn with_session_user(user: impl Into<String>) -> Self {
        Self {
            claims: None,
            session_user: Some(user.into()),
        }
    }
}

/// How the ledger answers "who is making this request".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// No identity: writes are unowned and reads are unfiltered.
    #[default]
    Open,
    /// Read the named claim from the caller's verified token.
    BearerClaims { claim: String },
    /// Use the username the transport authenticated for the session.
    Session,
}

impl IdentityMode {
    /// Resolves the acting identity, `None` in open mode.
    ///
    /// In the other modes a missing or unusable credential is an error;
    /// the claim value must be a non-empty string.
    pub fn resolve(&self, caller: &Caller) -> Result<Option<String>, LedgerError> {
        match self {
            Self::Open => Ok(None),
            Self::BearerClaims { claim } => {
                let claims = caller.claims.as_ref().ok_or_else(|| {
                    LedgerError::Unauthenticated("missing bearer token".to_string())
                })?;
                let subject = claims
                    .get(claim)
                    .and_then(Value::as_str)
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        LedgerError::Unauthenticated(format!("token has no usable '{claim}' claim"))
                    })?;
                Ok(Some(subject.to_string()))
            }
            Self::Session => {
                let user = caller
                    .session_user
                    .as_deref()
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        LedgerError::Unauthenticated("no session identity".to_string())
                    })?;
                Ok(Some(user.to_string()))
            }
        }
    }
}
