use meetgrid_core::notify::{NotificationSink, Severity};
use owo_colors::OwoColorize;

/// Prints engine notices to stderr.
pub struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => eprintln!("{}", message.dimmed()),
            Severity::Warning => eprintln!("{} {}", "warning:".yellow(), message),
            Severity::Error => eprintln!("{} {}", "error:".red(), message),
        }
    }
}
