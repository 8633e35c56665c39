mod middleware;
mod service;

pub use middleware::basic_auth_middleware;
pub use service::{authenticate, AuthError, Principal};
