mod navigator_terminal;

pub use navigator_terminal::*;
