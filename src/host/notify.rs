use super::Notifier;
use crate::types::NotifyLevel;
use colored::Colorize;
use tracing::{error, info};

/// Prints notifications to stderr, standing in for host toasts.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotifyLevel, title: &str, message: &str) {
        match level {
            NotifyLevel::Info => {
                info!(title, "{}", message);
                eprintln!("{} {}", format!("[{}]", title).cyan(), message);
            }
            NotifyLevel::Error => {
                error!(title, "{}", message);
                eprintln!("{} {}", format!("[{}]", title).red().bold(), message);
            }
        }
    }
}
