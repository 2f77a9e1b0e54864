//! Terminal stand-ins for the browser's toasts and confirm dialog

use finanzas_app::{UpdatePrompt, UPDATE_QUESTION};
use finanzas_core::Notifier;
use std::io::{BufRead, Write};

/// Toasts printed to stderr
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        eprintln!("✗ {message}");
    }

    fn success(&self, message: &str) {
        eprintln!("✓ {message}");
    }
}

/// `[s/N]` question on stdin
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StdinPrompt;

impl UpdatePrompt for StdinPrompt {
    fn confirm(&self, current: &str, available: &str) -> bool {
        print!("{UPDATE_QUESTION} ({current} → {available}) [s/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Sí "));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}
