//! Setup command - configure the user-record API endpoint

use anyhow::{Context, Result};
use rolodex_core::adapters::HttpUserService;
use rolodex_core::config::Config;

use super::get_rolodex_dir;
use crate::output;

pub fn run(base_url: &str, api_key: Option<String>) -> Result<()> {
    // Reject malformed URLs before persisting anything
    HttpUserService::new_with_base_url(base_url)
        .with_context(|| format!("Invalid base URL: {}", base_url))?;

    let rolodex_dir = get_rolodex_dir();
    std::fs::create_dir_all(&rolodex_dir)
        .with_context(|| format!("Failed to create rolodex directory: {:?}", rolodex_dir))?;

    let mut config = Config::load(&rolodex_dir)?;
    config.base_url = Some(base_url.trim_end_matches('/').to_string());
    if api_key.is_some() {
        config.api_key = api_key;
    }
    config.save(&rolodex_dir)?;

    output::success(&format!("API endpoint set to {}", base_url));
    Ok(())
}
