//! Terminal rendering of panel messages and confirmations.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use panel_core::Dialogs;

/// Drops the inline markup panel messages carry.
pub fn plain(message: &str) -> String {
    message
        .replace("<br/>", "\n")
        .replace("<strong>", "")
        .replace("</strong>", "")
}

pub struct TerminalDialogs;

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        let prompt = format!("{title}\n{}\n[y/N] ", plain(message));
        tokio::task::spawn_blocking(move || ask(&prompt))
            .await
            .unwrap_or(false)
    }
}

fn ask(prompt: &str) -> bool {
    let mut stdout = io::stdout();
    if write!(stdout, "{prompt}").and_then(|_| stdout.flush()).is_err() {
        return false;
    }

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => is_yes(&line),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
