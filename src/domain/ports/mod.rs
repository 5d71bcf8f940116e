pub mod rbac_client;

pub use rbac_client::RbacClient;
