use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `meshstat completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to stdout.
///
/// # Errors
///
/// Currently infallible; kept fallible to match the other handlers.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "meshstat", &mut out);
    Ok(())
}
