pub mod http;
pub mod kubernetes;
pub mod observability;
