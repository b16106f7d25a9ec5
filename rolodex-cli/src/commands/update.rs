//! Update command - edit an existing user record
//!
//! Flags act as the form: fields not provided fall back to the record's
//! current values, fetched once up front to pre-populate. If that fetch
//! fails the command still submits, but then every required field must be
//! given explicitly.

use anyhow::{bail, Result};
use rolodex_core::UserDraft;

use super::get_context;
use crate::output;

pub async fn run(
    id: &str,
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let mut flow = ctx.update_flow(id);

    let current = flow.load().await.map(|u| u.to_draft());

    let draft = if let Some(loaded) = current {
        UserDraft {
            name: name.unwrap_or(loaded.name),
            email: email.unwrap_or(loaded.email),
            role: role.or(loaded.role),
        }
    } else {
        match (name, email) {
            (Some(name), Some(email)) => UserDraft { name, email, role },
            _ => bail!(
                "Could not load user {} to fill in missing fields; \
                 pass both --name and --email to update anyway",
                id
            ),
        }
    };

    match flow.submit(draft).await {
        Some(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                output::success(&format!("Updated user {}", user.id));
                output::print_user(&user);
            }
            Ok(())
        }
        // The flow already reported the failure to the log sink
        None => bail!("User update failed"),
    }
}
