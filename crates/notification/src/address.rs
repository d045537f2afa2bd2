use std::sync::LazyLock;

use regex::Regex;

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid address pattern"));

/// Loose shape check run before anything is handed to a mailer.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS.is_match(address.trim())
}
