pub mod access_control_service;

pub use access_control_service::AccessControlService;
