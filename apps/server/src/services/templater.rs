//! Generates the `bot.js` script stored with every bot.
//!
//! The description and key are interpolated verbatim. Escaping them would
//! change the text the content screener inspects.

use crate::config::ReplySettings;
use crate::models::{BOT_SCRIPT_FILE, BotFiles};

/// Which script body to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    /// Script carries its own `respond` function and stdin loop.
    Standalone,
    /// Constants only; replies come from a remote provider.
    Minimal,
}

impl ScriptFlavor {
    /// Remote reply strategies get minimal scripts.
    pub fn for_reply(reply: &ReplySettings) -> Self {
        if reply.is_remote() {
            Self::Minimal
        } else {
            Self::Standalone
        }
    }
}

/// Render the file bundle for a new bot.
pub fn render_script(description: &str, api_key: &str, flavor: ScriptFlavor) -> BotFiles {
    let script = match flavor {
        ScriptFlavor::Standalone => format!(
            r#"// Auto-generated bot
const API_KEY = "{api_key}";
const description = "{description}";

function respond(message) {{
  return "You said: '" + message + "'. " + description;
}}

process.stdin.on('data', (data) => {{
  const msg = data.toString().trim();
  console.log("[Bot Reply]: " + respond(msg));
}});

console.log("Bot is ready!");"#
        ),
        ScriptFlavor::Minimal => format!(
            r#"// Auto-generated bot
const API_KEY = "{api_key}";
const description = "{description}";
console.log("Bot is ready!");"#
        ),
    };

    BotFiles::from([(BOT_SCRIPT_FILE.to_string(), script)])
}
