//! Logout command implementation.

use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &AppContext) {
    let out = Output::new();
    let was_signed_in = ctx.session.is_authenticated();

    ctx.session.logout();

    if was_signed_in {
        out.success("Signed out");
    } else {
        out.dim("Not signed in.");
    }
}
