mod api_client_impl;
mod credential_backend_explicit;
mod credential_backend_transport;
mod credential_store;
mod refresh_coordinator;
mod request_authenticator;
mod session_terminator;

pub use api_client_impl::*;
pub use credential_backend_explicit::*;
pub use credential_backend_transport::*;
pub use credential_store::*;
pub use refresh_coordinator::*;
pub use request_authenticator::*;
pub use session_terminator::*;
