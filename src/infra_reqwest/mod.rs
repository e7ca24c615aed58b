mod http_transport_reqwest;

pub use http_transport_reqwest::*;
