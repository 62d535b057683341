//! Terminal `Interface` port implementation (§6).

#![allow(dead_code)]

use depot_core::Interface;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output;

/// A console-backed `Interface`: plain status lines plus a spinner for
/// `show_status`/`hide_status`, and an interactive yes/no prompt unless
/// `--no-interaction` forces every confirmation to auto-accept.
pub struct ConsoleInterface {
    no_interaction: bool,
    status: Option<ProgressBar>,
}

impl ConsoleInterface {
    /// Builds an interface; `no_interaction` makes `ask_yes_no` always answer yes.
    #[must_use]
    pub fn new(no_interaction: bool) -> Self {
        Self { no_interaction, status: None }
    }
}

impl Interface for ConsoleInterface {
    fn warning(&mut self, msg: &str) {
        output::warning(msg);
    }

    fn error(&mut self, msg: &str) {
        output::error(msg);
    }

    fn info(&mut self, msg: &str) {
        output::info(msg);
    }

    fn show_status(&mut self, label: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
        bar.set_message(label.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        self.status = Some(bar);
    }

    fn hide_status(&mut self) {
        if let Some(bar) = self.status.take() {
            bar.finish_and_clear();
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> bool {
        if self.no_interaction {
            return true;
        }
        dialoguer::Confirm::new().with_prompt(question).default(true).interact().unwrap_or(false)
    }
}
