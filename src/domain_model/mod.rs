mod balance;
mod request;
mod token;

pub use balance::*;
pub use request::*;
pub use token::*;
