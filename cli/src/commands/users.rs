//! `users` subcommands: list, edit and delete.
//!
//! Each invocation loads the requested page first, so the target record must be on
//! that page.

use std::fmt;

use anyhow::{Context as _, Result};
use inquire::{Confirm, InquireError, Select, Text};
use roster_business::{DirectoryController, PageState, UserId, UserRecord};
use tracing::{info, instrument};

use crate::context::AppContext;
use crate::output::Output;

/// Field values given on the command line for `users edit`.
#[derive(Debug, Default, Clone)]
pub struct FieldOverrides {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl FieldOverrides {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.avatar.is_none()
    }

    /// `record` with every given field replaced. The id never changes.
    pub fn apply(&self, record: &UserRecord) -> UserRecord {
        UserRecord {
            id: record.id,
            email: self.email.clone().unwrap_or_else(|| record.email.clone()),
            first_name: self
                .first_name
                .clone()
                .unwrap_or_else(|| record.first_name.clone()),
            last_name: self
                .last_name
                .clone()
                .unwrap_or_else(|| record.last_name.clone()),
            avatar_url: self
                .avatar
                .clone()
                .unwrap_or_else(|| record.avatar_url.clone()),
        }
    }
}

struct UserChoice(UserRecord);

impl fmt::Display for UserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} <{}>", self.0.id, self.0.full_name(), self.0.email)
    }
}

#[derive(Debug, Clone, Copy)]
enum UserAction {
    Edit,
    Delete,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        })
    }
}

/// Load `page` and print whatever the controller reported.
async fn load(out: &Output, controller: &DirectoryController, page: u32) -> Result<PageState> {
    let loaded = controller.load_page(page).await;
    out.notifications(&controller.drain_notifications());
    loaded?;
    Ok(controller.page())
}

fn find(page: &PageState, id: UserId) -> Result<UserRecord> {
    page.record(id).cloned().with_context(|| {
        format!(
            "User {id} is not on page {}. Use --page to pick another page.",
            page.current_page
        )
    })
}

#[instrument(skip_all, name = "users_list", fields(page))]
pub async fn run_list(ctx: &AppContext, page: u32, interactive: bool) -> Result<()> {
    let out = Output::new();
    let controller = ctx.directory()?;

    let state = load(&out, &controller, page).await?;
    out.page(&state);

    if !interactive || state.records.is_empty() {
        return Ok(());
    }

    out.newline();
    let choices: Vec<UserChoice> = state.records.iter().cloned().map(UserChoice).collect();
    let Some(UserChoice(record)) = Select::new("Select a user:", choices)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
        .prompt_skippable()
        .context("Failed to select user")?
    else {
        return Ok(());
    };

    let action = Select::new(
        &format!("What should happen to {}?", record.full_name()),
        vec![UserAction::Edit, UserAction::Delete],
    )
    .prompt_skippable()
    .context("Failed to select action")?;

    match action {
        Some(UserAction::Edit) => {
            edit_record(&out, &controller, &record, &FieldOverrides::default()).await
        }
        Some(UserAction::Delete) => delete_record(&out, &controller, &record, false).await,
        None => Ok(()),
    }
}

#[instrument(skip_all, name = "users_edit", fields(id, page))]
pub async fn run_edit(
    ctx: &AppContext,
    id: UserId,
    page: u32,
    overrides: &FieldOverrides,
) -> Result<()> {
    let out = Output::new();
    let controller = ctx.directory()?;

    let state = load(&out, &controller, page).await?;
    let record = find(&state, id)?;
    edit_record(&out, &controller, &record, overrides).await
}

#[instrument(skip_all, name = "users_delete", fields(id, page))]
pub async fn run_delete(ctx: &AppContext, id: UserId, page: u32, yes: bool) -> Result<()> {
    let out = Output::new();
    let controller = ctx.directory()?;

    let state = load(&out, &controller, page).await?;
    let record = find(&state, id)?;
    delete_record(&out, &controller, &record, yes).await
}

fn prompt_fields(record: &UserRecord) -> Result<UserRecord> {
    let prompt = |label: &str, current: &str| {
        Text::new(label)
            .with_default(current)
            .prompt()
            .with_context(|| format!("Failed to read {}", label.trim_end_matches(':')))
    };

    Ok(UserRecord {
        id: record.id,
        first_name: prompt("First name:", &record.first_name)?,
        last_name: prompt("Last name:", &record.last_name)?,
        email: prompt("Email:", &record.email)?,
        avatar_url: prompt("Avatar URL:", &record.avatar_url)?,
    })
}

async fn edit_record(
    out: &Output,
    controller: &DirectoryController,
    record: &UserRecord,
    overrides: &FieldOverrides,
) -> Result<()> {
    controller.begin_edit(record)?;

    let updated = if overrides.is_empty() {
        out.header(format!("Editing {}", record.full_name()));
        match prompt_fields(record) {
            Ok(updated) => updated,
            Err(e) => {
                controller.cancel_edit();
                return Err(e);
            }
        }
    } else {
        overrides.apply(record)
    };

    if &updated == record {
        controller.cancel_edit();
        out.dim("Nothing changed.");
        return Ok(());
    }

    info!(id = record.id, "Submitting edit");
    let result = controller.confirm_edit(updated).await;
    out.notifications(&controller.drain_notifications());
    result?;
    Ok(())
}

async fn delete_record(
    out: &Output,
    controller: &DirectoryController,
    record: &UserRecord,
    yes: bool,
) -> Result<()> {
    controller.begin_delete(record)?;

    let confirmed = yes || {
        let answer = Confirm::new(&format!(
            "Delete {} ({})? This cannot be undone.",
            record.full_name(),
            record.email
        ))
        .with_default(false)
        .prompt();
        settle_confirmation(controller, answer)?
    };

    if !confirmed {
        out.dim("Cancelled.");
        return Ok(());
    }

    info!(id = record.id, "Submitting delete");
    let result = controller.confirm_delete(record.id).await;
    out.notifications(&controller.drain_notifications());
    result?;
    Ok(())
}

/// Anything but a clear yes closes the delete dialog. Escape counts as no; a prompt that
/// could not be shown is an error.
fn settle_confirmation(
    controller: &DirectoryController,
    answer: Result<bool, InquireError>,
) -> Result<bool> {
    match answer {
        Ok(true) => Ok(true),
        Ok(false) | Err(InquireError::OperationCanceled) => {
            controller.cancel_delete();
            Ok(false)
        }
        Err(e) => {
            controller.cancel_delete();
            Err(e).context("Failed to read confirmation")
        }
    }
}
