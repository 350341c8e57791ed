//! Client-held session attributes.
//!
//! There is no server-side session table: a session is the set of HTTP-only
//! cookies written at login, and every request re-presents them as an untrusted
//! claim that the guards evaluate again.
//!
//! Cookies carry no `Secure`, `SameSite`, domain or expiry, matching the
//! identity API's own cookies.

use actix_web::{cookie::Cookie, HttpRequest};

use crate::{auth::credentials::VerifiedIdentity, models::domain::UserRole};

pub const SESSION_ROLE_COOKIE: &str = "session_role";
pub const SESSION_USER_ID_COOKIE: &str = "session_user_id";
pub const SESSION_TOKEN_COOKIE: &str = "session_token";

const SESSION_COOKIES: [&str; 3] = [
    SESSION_ROLE_COOKIE,
    SESSION_USER_ID_COOKIE,
    SESSION_TOKEN_COOKIE,
];

/// Raw session attributes as presented by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAttributes {
    pub role: Option<String>,
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl SessionAttributes {
    pub fn from_request(req: &HttpRequest) -> Self {
        let read = |name: &str| {
            req.cookie(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            role: read(SESSION_ROLE_COOKIE),
            user_id: read(SESSION_USER_ID_COOKIE),
            token: read(SESSION_TOKEN_COOKIE),
        }
    }

    /// The role attribute, if present and one of the known roles.
    pub fn parsed_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

/// Turns a verified identity into session cookies and back out again.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionIssuer;

impl SessionIssuer {
    pub fn issue(&self, identity: &VerifiedIdentity) -> Vec<Cookie<'static>> {
        let mut cookies = vec![
            session_cookie(SESSION_ROLE_COOKIE, identity.role.as_str().to_string()),
            session_cookie(SESSION_USER_ID_COOKIE, identity.user_id.clone()),
        ];

        // a token left over from an earlier session must not outlive it
        cookies.push(match identity.token.as_ref().filter(|t| !t.is_empty()) {
            Some(token) => session_cookie(SESSION_TOKEN_COOKIE, token.clone()),
            None => removal_cookie(SESSION_TOKEN_COOKIE),
        });

        cookies
    }

    /// Removal directives for every session attribute, whether or not it was set.
    pub fn revoke(&self) -> Vec<Cookie<'static>> {
        SESSION_COOKIES.iter().map(|name| removal_cookie(name)).collect()
    }
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value).path("/").http_only(true).finish()
}
