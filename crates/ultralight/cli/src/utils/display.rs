//! Display utilities for the Ultralight-C CLI

use std::fmt::Display;

use colored::Colorize;
use ultralight_c::constants::memory::AUTH0_BLOCK;

/// A formatted section title
pub struct SectionTitle(pub &'static str);

impl Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub fn section_title(title: &'static str) -> SectionTitle {
    SectionTitle(title)
}

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format one block as `0x20: DE AD BE EF`
pub fn block_line(addr: u8, block: &[u8; 4]) -> String {
    let bytes = block
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");

    // AUTH0 holds the protection threshold
    let label = format!("{addr:#04X}:");
    if addr == AUTH0_BLOCK {
        format!("{} {} {}", label.bold(), bytes, "(AUTH0)".dimmed())
    } else {
        format!("{} {}", label.bold(), bytes)
    }
}
