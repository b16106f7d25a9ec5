//! Create command - submit a new user record

use anyhow::{bail, Result};
use rolodex_core::UserDraft;

use super::get_context;
use crate::output;

pub async fn run(name: String, email: String, role: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let flow = ctx.create_flow();

    let mut draft = UserDraft::new(name, email);
    draft.role = role;

    match flow.submit(draft).await {
        Some(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                output::success(&format!("Created user {}", user.id));
                output::print_user(&user);
            }
            Ok(())
        }
        // The flow already reported the failure to the log sink
        None => bail!("User creation failed"),
    }
}
