use log::debug;
use std::io::{self, BufRead, Write};

/// Blocking yes/no prompt. The caller's execution suspends until the
/// user answers.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Run `action` if the user accepts the prompt; do nothing otherwise.
pub fn confirm_action<F: FnOnce()>(prompt: &dyn ConfirmPrompt, message: &str, action: F) {
    if prompt.confirm(message) {
        action();
    } else {
        debug!("Confirmation declined: {}", message);
    }
}

/// Terminal prompt reading a y/n answer from stdin. Anything other than
/// an explicit yes declines.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
