use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Tokens are renewed this long before they actually expire.
pub const EXPIRY_BUFFER_MINUTES: i64 = 5;

/// Credentials used to authenticate against the Blink Debit APIs.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum Credentials {
    ClientCredentials {
        client_id: String,
        client_secret: Token,
    },
}

impl Credentials {
    /// Returns a reference to the client id stored in this [`Credentials`](crate::apis::auth::Credentials).
    pub fn client_id(&self) -> &str {
        match self {
            Credentials::ClientCredentials { client_id, .. } => client_id,
        }
    }

    /// Returns a reference to the client secret stored in this [`Credentials`](crate::apis::auth::Credentials).
    pub fn client_secret(&self) -> &Token {
        match self {
            Credentials::ClientCredentials { client_secret, .. } => client_secret,
        }
    }
}

/// Opaque access token used to authenticate to the Blink Debit APIs.
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub(crate) token: Token,
    pub(crate) issued_at: DateTime<Utc>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Builds a new access token issued at `issued_at`.
    ///
    /// The expiry is read from the `exp` claim when the token is a JWT, and otherwise
    /// computed from `expires_in` (in seconds) if the server provided it.
    /// An `expires_in` out of the representable range leaves the expiry unknown.
    pub(crate) fn new(token: Token, issued_at: DateTime<Utc>, expires_in: Option<i64>) -> Self {
        let expires_at = jwt_expiry(token.expose_secret()).or_else(|| {
            expires_in
                .and_then(Duration::try_seconds)
                .and_then(|expires_in| issued_at.checked_add_signed(expires_in))
        });

        Self {
            token,
            issued_at,
            expires_at,
        }
    }

    /// Actual token contents held by this `AccessToken` instance.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// When the token was obtained.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Expiration date of the token.
    ///
    /// Returns `None` if the expiration date could not be determined.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Value of the `Authorization` header carrying this token.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Returns `true` if the token expires within the next 5 minutes, already expired,
    /// or has an unknown expiration date.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .and_then(|expires_at| {
                expires_at.checked_sub_signed(Duration::minutes(EXPIRY_BUFFER_MINUTES))
            })
            .map_or(true, |refresh_at| now >= refresh_at)
    }
}

impl Deref for AccessToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        self.token()
    }
}

/// Reads the `exp` claim of a JWT without validating its signature.
fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }

    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Wrapper for a secret string that makes it harder to accidentally expose secrets
/// and ensures the backing memory is wiped on drop.
///
/// It is a wrapper around a [`secrecy::Secret`](secrecy::Secret).
///
/// ```rust
/// # use blink_debit_rust::apis::auth::Token;
/// let token = Token::new("supersecret");
///
/// // The secret is redacted when printed with Debug
/// assert!(!format!("{:?}", token).contains("supersecret"));
///
/// // But can be manually exposed calling `expose_secret()`...
/// assert_eq!(token.expose_secret(), "supersecret");
///
/// // ... Or if serialized with Serde
/// let serialized = serde_json::to_string(&token).unwrap();
/// assert!(serialized.contains("supersecret"));
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Token(#[serde(serialize_with = "serialize_secret")] Secret<String>);

impl Token {
    /// Wraps a secret string in a new `Token`.
    pub fn new<T: Into<String>>(s: T) -> Self {
        Self(Secret::new(s.into()))
    }

    /// Exposes a reference to the underlying secret string.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T> From<T> for Token
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        Token::new(s)
    }
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    secret.expose_secret().serialize(serializer)
}
