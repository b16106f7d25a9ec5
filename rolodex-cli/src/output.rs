//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rolodex_core::User;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a user record as a vertical key-value table
pub fn print_user(user: &User) {
    let mut table = create_table();
    table.add_row(vec!["ID", &user.id]);
    table.add_row(vec!["Name", &user.name]);
    table.add_row(vec!["Email", &user.email]);
    table.add_row(vec!["Role", user.role.as_deref().unwrap_or("-")]);
    if let Some(created) = &user.created_at {
        table.add_row(vec!["Created", &created.to_rfc3339()]);
    }
    if let Some(updated) = &user.updated_at {
        table.add_row(vec!["Updated", &updated.to_rfc3339()]);
    }
    println!("{}", table);
}
