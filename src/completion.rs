//! # Shell Completion Module
//!
//! This module provides shell completion functionality for Attune,
//! including:
//! - Generation of completion scripts for various shells
//! - Custom completion for mood names and emotion aliases
//! - Integration with clap's completion system
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! attune completion bash > ~/.local/share/bash-completion/completions/attune
//!
//! # Generate zsh completions
//! attune completion zsh > ~/.config/zsh/completions/_attune
//! ```

use crate::mood;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
pub fn shell_to_completion_shell(shell: &crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Get every name the `mood` command accepts, for completion.
///
/// Returns the built-in mood names plus the emotion aliases, sorted for
/// consistent output.
#[must_use]
pub fn get_mood_completions() -> Vec<String> {
    let mut completions: Vec<String> = mood::MOOD_PROTOTYPES
        .iter()
        .map(|profile| profile.name.to_string())
        .collect();

    for (alias, _) in mood::alias_pairs() {
        completions.push(alias.to_string());
    }

    completions.sort();
    completions
}

/// Print available completions for mood names.
/// This is used by shell completion systems to get dynamic completions.
/// Mood names are single lowercase words, so no shell escaping is needed.
pub fn print_mood_completions() {
    for completion in get_mood_completions() {
        println!("{completion}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Bash),
            CompletionShell::Bash
        );
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Zsh),
            CompletionShell::Zsh
        );
    }

    #[test]
    fn test_mood_completions_cover_moods_and_aliases() {
        let completions = get_mood_completions();

        for profile in mood::MOOD_PROTOTYPES.iter() {
            assert!(
                completions.contains(&profile.name.to_string()),
                "mood '{}' missing from completions",
                profile.name
            );
        }
        assert!(completions.contains(&"joy".to_string()));

        let mut sorted = completions.clone();
        sorted.sort();
        assert_eq!(completions, sorted, "completions should be sorted");
    }

    #[test]
    fn test_mood_completions_are_single_words() {
        for completion in get_mood_completions() {
            assert!(
                !completion.contains(char::is_whitespace),
                "'{completion}' would need shell escaping"
            );
        }
    }
}
