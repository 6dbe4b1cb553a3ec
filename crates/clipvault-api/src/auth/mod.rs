pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{AuthError, JwtService, ACCESS_TOKEN_ISSUER};
pub use middleware::auth_middleware;
pub use models::{AccessClaims, AuthenticatedUser};
