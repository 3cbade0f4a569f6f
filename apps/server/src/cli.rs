//! Line-oriented CLI over stdin, enabled with `CLI_MODE=true`.
//!
//! Commands:
//!   !ping                     -> Pong!
//!   !createbot <description>  -> create a bot, print its hash and key
//!   !listbots                 -> print up to ten bots as JSON

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::services::BotService;

/// Command list shown on startup.
pub const USAGE: &str = "Commands: !ping, !createbot <description>, !listbots";

/// Execute one input line and return what to print.
pub async fn run_command(bots: &BotService, line: &str) -> String {
    let (command, args) = line.split_once(' ').unwrap_or((line, ""));

    match command {
        "!ping" => "Pong!".to_string(),
        "!createbot" => match bots.create_bot(args).await {
            Ok(created) => format!(
                "Bot created successfully!\n- Hash: {}\n- API Key: {}",
                created.hash, created.api_key
            ),
            Err(e) => format!("Error: {}", e),
        },
        "!listbots" => {
            let list = bots.list_bots().await;
            serde_json::to_string_pretty(&list).unwrap_or_else(|e| format!("Error: {}", e))
        }
        _ => "Unknown command.".to_string(),
    }
}

/// Read commands from `reader` until end of input.
pub async fn run<R>(bots: BotService, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    println!("🤖 Overpowered Bot CLI running...");
    println!("{}", USAGE);

    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => println!("{}", run_command(&bots, &line).await),
            Ok(None) => break,
            Err(e) => {
                warn!("CLI input error: {}", e);
                break;
            }
        }
    }

    info!("CLI input closed");
}

/// Run the CLI on the process's stdin.
pub async fn run_stdin(bots: BotService) {
    run(bots, BufReader::new(tokio::io::stdin())).await;
}
