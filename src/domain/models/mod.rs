pub mod access_control;
pub mod rbac;
pub mod user;

pub use access_control::*;
pub use user::LoggedInUser;
