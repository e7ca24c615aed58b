use crate::domain_port::Navigator;
use crate::logger::*;

/// Navigator for the command line: notices go to stderr, the login boundary
/// is a hint to run `login` again.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl TerminalNavigator {
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for TerminalNavigator {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }

    fn redirect(&self, route: &str) {
        info!(%route, "login required");
        eprintln!("Run `cablebill login <username> <password>` to continue.");
    }
}
