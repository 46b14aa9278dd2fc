mod identity;
mod notification;
mod route;

pub use identity::*;
pub use notification::*;
pub use route::*;
