//! API credential: the scraped client id plus an optional session token.
//!
//! A [`Credential`] is built per download action and passed explicitly to every
//! API call. The client id comes from session setup; the session token is read
//! from the cookie jar for that action only and is never written anywhere.

mod cookies;

use std::fmt;
use std::path::{Path, PathBuf};

pub use cookies::{parse_cookie_jar, Cookie};

/// Cookie the site stores the signed-in session under.
pub const SESSION_COOKIE: &str = "oauth_token";
const SESSION_DOMAIN: &str = "soundcloud.com";

/// Public client identifier required on every API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        ClientId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Private session token. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        SessionToken(token.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone)]
pub struct Credential {
    pub client_id: ClientId,
    pub session: Option<SessionToken>,
}

impl Credential {
    pub fn anonymous(client_id: ClientId) -> Self {
        Self {
            client_id,
            session: None,
        }
    }

    pub fn with_session(client_id: ClientId, session: SessionToken) -> Self {
        Self {
            client_id,
            session: Some(session),
        }
    }

    /// Value for the `Authorization` header, when a session is attached.
    pub(crate) fn authorization(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|t| format!("OAuth {}", t.expose()))
    }
}

/// Netscape-format cookie file exported from a browser.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file and returns the live session token, if any.
    ///
    /// An unreadable jar behaves like a signed-out browser: the download goes
    /// ahead without a session.
    pub fn session_token(&self) -> Option<SessionToken> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("cannot read cookie jar {}: {}", self.path.display(), e);
                return None;
            }
        };
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        parse_cookie_jar(&data)
            .into_iter()
            .filter(|c| c.name == SESSION_COOKIE && !c.value.is_empty())
            .filter(|c| c.matches_domain(SESSION_DOMAIN))
            .find(|c| !c.is_expired(now))
            .map(|c| SessionToken::new(c.value))
    }
}
