//! Terminal output utilities for styled CLI output.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use console::{Term, style};
use roster_business::{Notification, PageState, UserRecord};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Avatar")]
    initials: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&UserRecord> for UserRow {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            initials: record.initials(),
            name: record.full_name(),
            email: record.email.clone(),
        }
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        drop(self.term.write_line(text));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✓").green().bold()));
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✗").red().bold()));
    }

    pub fn info(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("ℹ").blue().bold()));
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    pub fn labeled(&self, label: impl Display, value: impl Display) {
        self.line(&format!("  {}: {value}", style(label).dim()));
    }

    /// Print a controller notification as a one-line toast.
    pub fn notification(&self, notification: &Notification) {
        let text = format_notification(notification);
        if notification.is_error() {
            self.error(text);
        } else {
            self.success(text);
        }
    }

    pub fn notifications(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.notification(notification);
        }
    }

    /// Print the current page as a table with a pagination footer.
    pub fn page(&self, page: &PageState) {
        if page.records.is_empty() {
            self.dim("No users on this page.");
        } else {
            self.line(&users_table(&page.records));
        }
        self.line(&format!(
            "\n{} {}",
            style("Page").bold(),
            style(page_summary(page)).cyan()
        ));
        if page.total_pages > 1 {
            self.dim(page_strip(page));
        }
        if let Some(at) = page.last_fetch {
            self.dim(format!("Fetched {}", format_fetch_time(at)));
        }
    }
}

fn format_notification(notification: &Notification) -> String {
    format!("{}: {}", notification.title, notification.description)
}

pub fn users_table(records: &[UserRecord]) -> String {
    let rows: Vec<UserRow> = records.iter().map(UserRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// "1 of 2 (12 users)" plus navigation hints.
pub fn page_summary(page: &PageState) -> String {
    let mut summary = format!(
        "{} of {} ({} users)",
        page.current_page, page.total_pages, page.total
    );
    if page.has_previous() {
        summary.push_str(&format!(", previous: --page {}", page.current_page - 1));
    }
    if page.has_next() {
        summary.push_str(&format!(", next: --page {}", page.current_page + 1));
    }
    summary
}

/// Every page number, with the current one bracketed: "1 [2] 3".
pub fn page_strip(page: &PageState) -> String {
    page.page_numbers()
        .map(|n| {
            if n == page.current_page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_fetch_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
