//! CLI command implementations

pub mod create;
pub mod setup;
pub mod show;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rolodex_core::RolodexContext;

/// Get the rolodex directory from environment or default
pub fn get_rolodex_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ROLODEX_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".rolodex")
    }
}

/// Get or create rolodex context
pub fn get_context() -> Result<RolodexContext> {
    let rolodex_dir = get_rolodex_dir();

    std::fs::create_dir_all(&rolodex_dir)
        .with_context(|| format!("Failed to create rolodex directory: {:?}", rolodex_dir))?;

    RolodexContext::new(&rolodex_dir).context("Failed to initialize rolodex context")
}
