pub mod proc_loader;
pub mod proc_validator;
pub mod request;
pub mod settings;

pub use request::{PropagateConfig, RefreshConfig, RequestConfig, ServiceConfig};
