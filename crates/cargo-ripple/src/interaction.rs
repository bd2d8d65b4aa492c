use std::io::IsTerminal;

use dialoguer::Confirm;

use crate::error::Result;

/// Prompts are only shown when both the input and the prompt stream are
/// terminals.
pub(crate) fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Asks whether the planned updates should be written. Escape counts as no.
pub(crate) fn confirm_apply(update_count: usize) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!("Write {update_count} version update(s)?"))
        .default(true)
        .interact_opt()?;

    Ok(confirmed.unwrap_or(false))
}
