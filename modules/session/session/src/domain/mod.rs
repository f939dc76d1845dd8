pub mod error;
pub mod local_client;
pub mod repo;
pub mod service;
pub mod state;

pub use error::DomainError;
pub use local_client::SessionLocalClient;
pub use service::Service;
