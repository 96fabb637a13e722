pub mod admin;
pub mod auth;
pub mod health;

pub use admin::admin_config;
pub use auth::auth_config;
pub use health::health_config;
