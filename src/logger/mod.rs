//! Tracing setup plus the log macros every module pulls in with `use crate::logger::*`.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
