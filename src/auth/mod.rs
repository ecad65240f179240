pub mod handlers;
pub mod middleware;

pub use middleware::{authenticate_request, optional_auth, require_auth, AuthUser};
