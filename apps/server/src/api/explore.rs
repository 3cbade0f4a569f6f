//! Explore page: server-rendered list of every bot with a local chat widget.
//!
//! The widget computes replies in the browser with the same template as the
//! local reply strategy, whatever strategy the server runs. Bot fields are
//! interpolated raw except the `data-description` attribute, which only
//! escapes double quotes.

use std::fmt::Write;

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use tracing::error;

use crate::models::BotRecord;
use crate::services::BotService;

/// Placeholder shown when a record has no `bot.js`.
const MISSING_SCRIPT: &str = "// No bot file";

const PAGE_STYLE: &str = r#"body { font-family: Arial, sans-serif; padding: 20px; background: #f0f0f0; }
.bot { background: #fff; padding: 10px; margin-bottom: 15px; border-radius: 8px; box-shadow: 0 2px 5px rgba(0,0,0,0.1);}
pre { background: #eee; padding: 10px; border-radius: 5px; overflow-x: auto; }
input { padding: 5px; width: 70%; margin-right: 5px; }
button { padding: 5px 10px; }"#;

const CHAT_SCRIPT: &str = r#"function sendMessage(index) {
  const botDiv = document.getElementById('bot-' + index);
  const input = document.getElementById('input-' + index);
  const chat = document.getElementById('chat-' + index);
  const msg = input.value.trim();
  if(!msg) return;

  const description = botDiv.getAttribute('data-description');
  const reply = "You said: '" + msg + "'. " + description;

  chat.innerHTML += "<div><strong>You:</strong> " + msg + "</div>";
  chat.innerHTML += "<div><strong>Bot:</strong> " + reply + "</div>";
  input.value = "";
}"#;

/// Configure explore routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(explore);
}

/// HTML listing of every bot.
#[utoipa::path(
    get,
    path = "/explore",
    tag = "Explore",
    responses(
        (status = 200, description = "Explore page", content_type = "text/html")
    )
)]
#[get("/explore")]
pub async fn explore(bots: web::Data<BotService>) -> HttpResponse {
    let html = match bots.store().list_all().await {
        Ok(records) => render_explore_page(&records),
        Err(e) => {
            error!("Error fetching bots: {}", e);
            render_error_page(&e.client_message())
        }
    };

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html)
}

/// One card per bot plus the chat script.
pub fn render_explore_page(bots: &[BotRecord]) -> String {
    let mut cards = String::new();
    for (index, bot) in bots.iter().enumerate() {
        let safe_description = bot.description.replace('"', "&quot;");
        let script = bot.script().unwrap_or(MISSING_SCRIPT);
        let _ = write!(
            cards,
            r#"
    <div class="bot" data-description="{safe_description}" id="bot-{index}">
      <h2>{name}</h2>
      <p>{description}</p>
      <pre>{script}</pre>
      <input type="text" id="input-{index}" placeholder="Say something..." />
      <button onclick="sendMessage({index})">Send</button>
      <div id="chat-{index}" style="margin-top:5px; background:#eee; padding:5px; border-radius:5px; min-height:30px;"></div>
    </div>
    "#,
            name = bot.name,
            description = bot.description,
        );
    }

    if cards.is_empty() {
        cards.push_str("<p>No bots found yet.</p>");
    }

    format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Explore Bots</title>
<style>
{PAGE_STYLE}
</style>
</head>
<body>
<h1>Explore Bots</h1>
{cards}

<script>
{CHAT_SCRIPT}
</script>

</body>
</html>
"#
    )
}

/// Page shown when the store cannot be read.
pub fn render_error_page(message: &str) -> String {
    format!(r#"<h1 style="color:red;">Error fetching bots: {message}</h1>"#)
}
