pub mod analytics;
pub mod link;
pub mod user;

pub use analytics::*;
pub use link::*;
pub use user::*;
