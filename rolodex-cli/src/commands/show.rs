//! Show command - fetch and display one user record

use anyhow::Result;

use super::get_context;
use crate::output;

pub async fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.service.get_by_id(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        output::print_user(&user);
    }
    Ok(())
}
