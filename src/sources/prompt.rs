//! Interactive single-value input.

use std::io;

/// Reads one secret value from the user.
pub trait Prompter {
    fn prompt_secret(&self, label: &str) -> io::Result<String>;
}

/// Hidden-input prompt on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt_secret(&self, label: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Prompter that answers every prompt with a fixed value.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompter(pub String);

impl Prompter for FixedPrompter {
    fn prompt_secret(&self, _label: &str) -> io::Result<String> {
        Ok(self.0.clone())
    }
}
