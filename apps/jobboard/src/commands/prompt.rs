use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::warn;

use crate::admin::Confirm;
use crate::errors::AppError;

/// Prints `prompt` and reads one trimmed line from stdin.
pub fn read_line(prompt: &str) -> Result<String, AppError> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}").context("failed to write prompt")?;
    stdout.flush().context("failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Interactive y/N confirmation. Anything but an explicit yes declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match read_line(&format!("{prompt} [y/N] ")) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}
