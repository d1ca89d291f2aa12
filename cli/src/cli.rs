use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Browse and manage the user directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the directory service (the `/api` prefix is added)
    #[arg(long, global = true, env = "ROSTER_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        /// Email address (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is active
    Status,
    /// Work with the user directory
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List one page of users
    List {
        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Interactive mode (select a user to edit or delete)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Edit a user; prompts for any field not given
    Edit {
        /// User ID
        id: u64,

        /// Page the user is listed on
        #[arg(long, short = 'p', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: u64,

        /// Page the user is listed on
        #[arg(long, short = 'p', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
