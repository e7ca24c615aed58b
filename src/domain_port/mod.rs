// store

mod credential_store;

pub use credential_store::*;

// outbound

mod http_transport;
mod navigator;

pub use http_transport::*;
pub use navigator::*;
