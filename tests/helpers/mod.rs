#![allow(dead_code)]
#![allow(unused_imports)]
pub mod fake_rbac_client;
pub mod rbac_fixtures;

pub use fake_rbac_client::*;
pub use rbac_fixtures::*;
