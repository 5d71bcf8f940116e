pub mod access_control;
