//! Content screening for generated bot files.

use tracing::warn;

use crate::models::BotFiles;

/// Literal markers that reject a bot. Matching is raw, case-sensitive
/// substring containment.
pub const HARMFUL_PATTERNS: [&str; 3] = ["<script>alert", "eval(", "malicious"];

/// True if any file contains any harmful pattern.
pub fn is_harmful(files: &BotFiles) -> bool {
    for (name, contents) in files {
        if let Some(pattern) = HARMFUL_PATTERNS.iter().find(|p| contents.contains(*p)) {
            warn!(file = %name, pattern = %pattern, "Generated file rejected by content screener");
            return true;
        }
    }
    false
}
