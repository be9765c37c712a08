//! CLI command handlers.

pub mod action;
pub mod arc;
pub mod batch;
pub mod event;
pub mod world;

/// Shorten text for table cells.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("spiral", 10), "spiral");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
