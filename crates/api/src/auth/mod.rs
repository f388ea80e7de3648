pub mod config;
pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod permissions;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtService};
pub use oauth::OAuthService;
pub use permissions::{Permissions, Role};
