//! The authentication context shared by everything that calls the API.
//!
//! The admin API issues JWT bearer tokens. The token's payload is decoded
//! locally with `jsonwebtoken` to learn when it expires and which role it
//! grants. The signature is not checked here since the API verifies it on
//! every request.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::Error;

/// The role that grants access to the admin console.
pub const ADMIN_ROLE: &str = "admin";

/// The claims the admin console cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch. Tokens without it never expire.
    #[serde(default)]
    pub exp: Option<i64>,
    /// The user's role, e.g. "admin".
    #[serde(default)]
    pub role: Option<String>,
    /// The user's email address, for display.
    #[serde(default)]
    pub email: Option<String>,
}

impl Claims {
    /// Whether the token has expired at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.exp.is_some_and(|exp| exp < now.unix_timestamp())
    }

    /// Whether the token grants the admin role.
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role.eq_ignore_ascii_case(ADMIN_ROLE))
    }
}

struct Session {
    token: String,
    claims: Claims,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"********")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Holds the bearer token for the current admin, if any.
///
/// Clones share the same session, so logging out through one handle logs out
/// every API client built with another.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Arc<RwLock<Option<Session>>>,
}

impl AuthContext {
    /// Create a logged out context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `token` as the current session.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if the token is not a decodable JWT, in
    /// which case any previous session is kept.
    pub fn login(&self, token: &str) -> Result<Claims, Error> {
        let claims = decode_claims(token)?;
        let mut session = self.session.write().map_err(|_| Error::AuthLockError)?;
        *session = Some(Session {
            token: token.to_owned(),
            claims: claims.clone(),
        });

        tracing::info!("Logged in as {:?}", claims.email);
        Ok(claims)
    }

    /// Forget the current session.
    pub fn logout(&self) -> Result<(), Error> {
        let mut session = self.session.write().map_err(|_| Error::AuthLockError)?;
        *session = None;

        tracing::info!("Logged out");
        Ok(())
    }

    /// The claims of the current session, if logged in.
    pub fn claims(&self) -> Result<Option<Claims>, Error> {
        let session = self.session.read().map_err(|_| Error::AuthLockError)?;

        Ok(session.as_ref().map(|session| session.claims.clone()))
    }

    /// Whether there is a session that grants the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self.claims(), Ok(Some(claims)) if claims.is_admin())
    }

    /// The token to send as the `Authorization: Bearer` header.
    ///
    /// # Errors
    /// - [Error::NotAuthenticated] if there is no session.
    /// - [Error::TokenExpired] if the session's token expired before `now`.
    pub fn bearer_token(&self, now: OffsetDateTime) -> Result<String, Error> {
        let session = self.session.read().map_err(|_| Error::AuthLockError)?;
        let session = session.as_ref().ok_or(Error::NotAuthenticated)?;

        if session.claims.is_expired(now) {
            return Err(Error::TokenExpired);
        }

        Ok(session.token.clone())
    }
}

/// Decode the payload of a JWT without verifying its signature.
///
/// Expiry is not validated here either; see [Claims::is_expired].
///
/// # Errors
/// Returns [Error::InvalidToken] if `token` is not a well-formed JWT or its
/// payload does not hold the expected claims.
pub fn decode_claims(token: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| Error::InvalidToken(error.to_string()))
}

#[cfg(test)]
pub(crate) mod test_utils {
    use jsonwebtoken::{EncodingKey, Header, encode};

    /// Build a JWT with `payload` as its claims, signed with a throwaway secret.
    pub fn make_token(payload: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(b"not the api's secret"),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        auth::{AuthContext, Claims, decode_claims, test_utils::make_token},
    };

    #[test]
    fn decodes_claims_from_payload() {
        let token = make_token(json!({
            "exp": 1_800_000_000,
            "role": "admin",
            "email": "admin@belancer.com",
            "iat": 1_700_000_000
        }));

        let claims = decode_claims(&token).unwrap();

        assert_eq!(
            claims,
            Claims {
                exp: Some(1_800_000_000),
                role: Some("admin".to_owned()),
                email: Some("admin@belancer.com".to_owned()),
            }
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            assert!(
                matches!(decode_claims(token), Err(Error::InvalidToken(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_payloads_that_are_not_json() {
        let token = make_token(json!({}));
        let header = token.split('.').next().unwrap();

        let result = decode_claims(&format!("{header}.bm90IGpzb24.c2ln"));

        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }

    #[test]
    fn bearer_token_requires_login() {
        let auth = AuthContext::new();

        assert_eq!(
            auth.bearer_token(datetime!(2026-10-18 00:00 UTC)),
            Err(Error::NotAuthenticated)
        );
    }

    #[test]
    fn bearer_token_rejects_expired_tokens() {
        let auth = AuthContext::new();
        let now = datetime!(2026-10-18 00:00 UTC);
        auth.login(&make_token(json!({ "exp": now.unix_timestamp() - 1 })))
            .unwrap();

        assert_eq!(auth.bearer_token(now), Err(Error::TokenExpired));
    }

    #[test]
    fn bearer_token_returns_valid_token() {
        let auth = AuthContext::new();
        let now = datetime!(2026-10-18 00:00 UTC);
        let token = make_token(json!({ "exp": now.unix_timestamp() + 60 }));
        auth.login(&token).unwrap();

        assert_eq!(auth.bearer_token(now), Ok(token));
    }

    #[test]
    fn logout_is_shared_between_clones() {
        let auth = AuthContext::new();
        let handle = auth.clone();
        auth.login(&make_token(json!({ "role": "Admin" }))).unwrap();
        assert!(handle.is_admin());

        auth.logout().unwrap();

        assert!(!handle.is_admin());
        assert_eq!(
            handle.bearer_token(datetime!(2026-10-18 00:00 UTC)),
            Err(Error::NotAuthenticated)
        );
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let auth = AuthContext::new();
        auth.login(&make_token(json!({ "role": "admin" }))).unwrap();

        let result = auth.login("garbage");

        assert!(matches!(result, Err(Error::InvalidToken(_))));
        assert!(auth.is_admin());
    }

    #[test]
    fn non_admin_roles_are_not_admin() {
        let auth = AuthContext::new();
        auth.login(&make_token(json!({ "role": "freelancer" })))
            .unwrap();

        assert!(!auth.is_admin());
    }
}
