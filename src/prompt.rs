//! Terminal implementations of the confirmation and deletion-cue capabilities.

use std::io::Write;

use dialoguer::Confirm as ConfirmPrompt;
use owo_colors::OwoColorize;
use weekgrid_core::EventKey;
use weekgrid_core::drag::{Confirm, Notifier, NotifyResult};

/// Ask on the terminal before deleting. Anything but an explicit yes
/// (including a prompt that cannot be shown) counts as no.
pub struct PromptConfirm {
    pub label: String,
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, key: &EventKey) -> bool {
        let prompt = format!("  Delete \"{}\" ({})?", self.label, key);

        match ConfirmPrompt::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "could not show confirmation prompt");
                false
            }
        }
    }
}

/// Ask a plain yes/no question, defaulting to no.
pub fn ask(question: &str) -> bool {
    ConfirmPrompt::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Rings the terminal bell after a deletion.
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn deleted(&mut self, key: &EventKey) -> NotifyResult {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "\x07{} {}", "Deleted".red(), key)?;
        stdout.flush()?;
        Ok(())
    }
}
