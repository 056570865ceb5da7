#![forbid(unsafe_code)]

pub mod http;
pub mod repository;
mod wire;

pub use http::{ApiConfig, ConfigError, HttpApi};
pub use repository::{ApiError, Backend, CatalogApi, EnrollmentApi, InMemoryApi, ProgressApi};
