//! Status command implementation.

use roster_business::Route;
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "status")]
pub fn run_status(ctx: &AppContext) {
    let out = Output::new();

    match ctx.route() {
        Route::Directory => out.success("Signed in"),
        Route::Login => out.info("Not signed in. Run `roster login` to start a session."),
    }
    out.labeled("API", ctx.config.api_url());
    out.labeled("Session file", ctx.token_path.display());
}
