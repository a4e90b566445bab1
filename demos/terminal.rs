//! Terminal shell for the site assistant
//!
//! ```text
//! cargo run --example terminal
//! ```
//!
//! Type a question and press Enter. `/quick <label>` fills the input from a
//! quick action, `/blocking` toggles streaming, `/quit` leaves.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use hub_assistant::config::AssistantConfig;
use hub_assistant::logging;
use hub_assistant::providers::ModelClient;
use hub_assistant::widget::{ChatWidget, DisplayMessage, SendMode, WidgetState, WidgetView, QUICK_ACTIONS};

/// Prints assistant replies as they grow
#[derive(Default)]
struct TerminalView {
    current: Option<Uuid>,
    printed: usize,
}

impl WidgetView for TerminalView {
    fn transcript_changed(&mut self, messages: &[DisplayMessage]) {
        let Some(last) = messages.last() else {
            return;
        };
        if last.is_user() {
            return;
        }

        if self.current != Some(last.id()) {
            self.current = Some(last.id());
            self.printed = 0;
            print!("\nassistant [{}]> ", last.time_label());
        }

        let content = last.content();
        if content.len() > self.printed {
            print!("{}", &content[self.printed..]);
            self.printed = content.len();
            let _ = std::io::stdout().flush();
        }
    }

    fn state_changed(&mut self, state: WidgetState) {
        if state == WidgetState::Idle {
            println!("\n");
        }
    }

    fn error_changed(&mut self, error: Option<&str>) {
        if let Some(error) = error {
            eprintln!("\n[!] {}", error);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AssistantConfig::from_env();
    let greeting = config.prompt.greeting().to_string();
    let client = ModelClient::from_config(&config)?;

    let mut widget = ChatWidget::with_greeting(Arc::new(client), greeting.clone())
        .with_view(TerminalView::default());
    widget.open();

    let status = if widget.check_health().await { "ONLINE" } else { "OFFLINE" };
    println!("AI Assistant [{}]\n\nassistant> {}\n", status, greeting);

    let labels: Vec<_> = QUICK_ACTIONS.iter().map(|a| a.label).collect();
    println!("quick actions: {}\n", labels.join(", "));

    let mut mode = if config.llm.stream {
        SendMode::Streaming
    } else {
        SendMode::Blocking
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "/quit" => break,
            "/blocking" => {
                mode = match mode {
                    SendMode::Streaming => SendMode::Blocking,
                    SendMode::Blocking => SendMode::Streaming,
                };
                println!("mode: {:?}\n", mode);
                continue;
            }
            _ => {}
        }

        if let Some(label) = line.strip_prefix("/quick ") {
            if !widget.apply_quick_action(label.trim()) {
                println!("unknown quick action: {}\n", label.trim());
                continue;
            }
            println!("you> {}", widget.input());
        } else {
            widget.set_input(line);
        }

        widget.send_with(mode).await;
    }

    Ok(())
}
