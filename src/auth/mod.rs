pub mod credentials;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

pub use credentials::{
    authenticate, CredentialVerifier, LocalCredentialVerifier, RemoteCredentialVerifier,
    VerifiedIdentity,
};
pub use guard::{AuthContext, Guard, GuardChain, InjectUserId, RequireRole};
pub use middleware::{AuthGate, SessionContext};
pub use password::PasswordService;
pub use session::{
    SessionAttributes, SessionIssuer, SESSION_ROLE_COOKIE, SESSION_TOKEN_COOKIE,
    SESSION_USER_ID_COOKIE,
};
pub use token::{Claims, TokenCodec};
