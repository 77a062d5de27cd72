//! Record selection strategies.
//!
//! The pipeline is handed a [`SelectionStrategy`] rather than reading
//! stdin itself: batch callers inject [`FixedSelection`], the CLI
//! injects [`PromptSelection`] for the interactive numbered menu.

use std::io::{BufRead, Write};

use landeval_shared::{LandEvalError, Result};

/// Chooses one identifier from the dataset's identifier list.
pub trait SelectionStrategy {
    /// Pick an identifier. `ids` is never empty when called by the pipeline.
    fn select(&self, ids: &[String]) -> Result<String>;
}

/// Deterministic strategy: always returns the configured identifier.
///
/// The identifier is returned as-is; whether it actually matches a
/// record is the store's concern.
#[derive(Debug, Clone)]
pub struct FixedSelection(pub String);

impl SelectionStrategy for FixedSelection {
    fn select(&self, _ids: &[String]) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Interactive strategy: prints a numbered identifier list and reads the
/// operator's choice from stdin. Accepts either a 1-based index or a
/// literal identifier, reprompting on invalid input.
#[derive(Debug, Default)]
pub struct PromptSelection;

impl SelectionStrategy for PromptSelection {
    fn select(&self, ids: &[String]) -> Result<String> {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        println!("\nAvailable stock numbers:");
        for (i, id) in ids.iter().enumerate() {
            println!("{}. {id}", i + 1);
        }

        loop {
            print!("\nSelect a stock number (index or identifier): ");
            std::io::stdout()
                .flush()
                .map_err(|e| LandEvalError::validation(format!("stdout flush failed: {e}")))?;

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    return Err(LandEvalError::validation(format!("stdin read failed: {e}")));
                }
                None => return Err(LandEvalError::validation("stdin closed during selection")),
            };

            if let Some(choice) = resolve_choice(line.trim(), ids) {
                return Ok(choice);
            }
            println!("Invalid selection, try again.");
        }
    }
}

/// Resolve raw operator input against the identifier list.
fn resolve_choice(input: &str, ids: &[String]) -> Option<String> {
    if let Ok(index) = input.parse::<usize>() {
        if (1..=ids.len()).contains(&index) {
            return Some(ids[index - 1].clone());
        }
    }
    ids.iter().find(|id| id.as_str() == input).cloned()
}
