//! `roster`: sign in and manage the user directory from the terminal.

mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands, UsersCommand};
use crate::commands::users::FieldOverrides;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    let ctx = AppContext::build(cli.api_url)?;

    match cli.command {
        Commands::Login { email } => commands::run_login(&ctx, email).await,
        Commands::Logout => {
            commands::run_logout(&ctx);
            Ok(())
        }
        Commands::Status => {
            commands::run_status(&ctx);
            Ok(())
        }
        Commands::Users { command } => match command {
            UsersCommand::List { page, interactive } => {
                commands::run_list(&ctx, page, interactive).await
            }
            UsersCommand::Edit {
                id,
                page,
                email,
                first_name,
                last_name,
                avatar,
            } => {
                let overrides = FieldOverrides {
                    email,
                    first_name,
                    last_name,
                    avatar,
                };
                commands::run_edit(&ctx, id, page, &overrides).await
            }
            UsersCommand::Delete { id, page, yes } => {
                commands::run_delete(&ctx, id, page, yes).await
            }
        },
    }
}
