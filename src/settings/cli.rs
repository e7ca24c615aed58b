use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cablebill", about = "Billing back office API client")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login { username: String, password: String },
    /// GET a resource and print its JSON body
    Get { path: String },
    /// POST a JSON body to a resource and print the reply
    Post { path: String, body: String },
    /// End the session
    Logout,
}
