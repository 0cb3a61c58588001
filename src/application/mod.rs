mod application;
pub mod data;
pub mod logging;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
