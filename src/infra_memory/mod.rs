//! In-process implementations of the outbound ports, used by tests and the demo binary.

mod credential_store_memory;
mod http_transport_fake;
mod navigator_recording;

pub use credential_store_memory::*;
pub use http_transport_fake::*;
pub use navigator_recording::*;
