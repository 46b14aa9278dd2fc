mod auth_service;
mod identity_service;
mod notification_service;

pub use auth_service::*;
pub use identity_service::*;
pub use notification_service::*;
