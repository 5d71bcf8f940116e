pub mod client;
pub mod k8s_url;

pub use client::KubernetesClient;
