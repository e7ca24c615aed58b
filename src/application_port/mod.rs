mod api_client;
mod credential_backend;
mod session_service;

pub use api_client::*;
pub use credential_backend::*;
pub use session_service::*;
