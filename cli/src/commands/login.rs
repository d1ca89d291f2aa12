//! Login command implementation.

use anyhow::{Context as _, Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{error, info, instrument};

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "login")]
pub async fn run_login(ctx: &AppContext, email: Option<String>) -> Result<()> {
    let out = Output::new();

    out.header("Sign in");
    out.newline();

    let email = match email {
        Some(email) => email,
        None => Text::new("Email:")
            .with_help_message("The email address of your account")
            .prompt()
            .context("Failed to read email")?,
    };

    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read password")?;

    info!(email = %email, "Attempting login");

    match ctx.session.login(&email, &password).await {
        Ok(()) => {
            out.newline();
            out.success(format!("Signed in as {email}"));
            out.dim(format!("Session saved to {}", ctx.token_path.display()));
            Ok(())
        }
        Err(e) => {
            error!("Login failed: {e}");
            out.newline();
            out.error(format!("Login failed: {e}"));
            bail!("login failed")
        }
    }
}
