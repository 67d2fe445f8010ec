pub mod authenticator;
pub mod code;
pub mod middleware;
pub mod session;

// Re-export so we can do "use crate::auth::*;"
pub use authenticator::{AuthError, Authenticator};
pub use code::extract_code;
pub use middleware::{auth_middleware, AuthContext};
pub use session::{SessionCodec, SESSION_COOKIE};

/// Where unauthenticated browsers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Scope requested for both the sign-in URL and the code exchange.
pub const USER_READ_SCOPE: &str = "user.read";
