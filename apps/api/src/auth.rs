//! Authentication endpoints and session token transport.

mod bootstrap;
mod password;
mod request_context;
mod session;

pub use bootstrap::bootstrap_handler;
pub use password::change_password_handler;
pub(crate) use request_context::{extract_request_context, extract_session_token};
pub use session::{login_handler, logout_handler, session_handler};

/// Alternative header carrying the raw session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";
