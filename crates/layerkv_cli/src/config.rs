//! REPL configuration.

/// Configuration for the command loop.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt written before each line is read (`None` = no prompt).
    pub prompt: Option<String>,

    /// Whether to print the usage banner when the loop starts.
    pub show_banner: bool,

    /// Whether to echo each executed command, prefixed with `> `.
    pub echo_commands: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            show_banner: true,
            echo_commands: false,
        }
    }
}

impl ReplConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prompt.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets whether to print the usage banner.
    #[must_use]
    pub const fn show_banner(mut self, value: bool) -> Self {
        self.show_banner = value;
        self
    }

    /// Sets whether to echo executed commands.
    #[must_use]
    pub const fn echo_commands(mut self, value: bool) -> Self {
        self.echo_commands = value;
        self
    }
}
