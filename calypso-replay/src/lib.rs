//! Replays recorded themes actions against persisted state.
//!
//! The action log is JSON lines, one [`ThemesAction`] per line. Blank lines
//! are skipped. The first line that fails to parse or reduce aborts the
//! replay, and the error names its line number.

use anyhow::{Context, Result};
use calypso_state::{ThemesAction, ThemesConfig, ThemesState};
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Loads persisted state from `path`. A missing file gives an empty state.
pub fn load_state(path: &Path, config: ThemesConfig) -> Result<ThemesState> {
    if !path.exists() {
        info!("No persisted state at {:?}, starting empty", path);
        return Ok(ThemesState::new(config));
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("State file {} is not valid JSON", path.display()))?;
    Ok(ThemesState::deserialize(&value, config))
}

/// Applies every action in `log` to `state`.
pub fn replay<R: BufRead>(state: ThemesState, log: R) -> Result<ThemesState> {
    let mut state = state;
    let mut applied = 0usize;

    for (index, line) in log.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let action: ThemesAction = serde_json::from_str(&line)
            .with_context(|| format!("Line {line_no}: not a themes action"))?;
        let next = state
            .reduce(&action)
            .with_context(|| format!("Line {line_no}: {} failed", action.kind()))?;

        if next.ptr_eq(&state) {
            debug!(line = line_no, action = action.kind(), "Action changed nothing");
        }
        state = next;
        applied += 1;
    }

    info!(actions = applied, "Replay finished");
    Ok(state)
}

/// Pretty-printed persistent projection of `state`.
pub fn render(state: &ThemesState) -> Result<String> {
    let value = state.serialize().context("Failed to serialize themes state")?;
    Ok(serde_json::to_string_pretty(&value)?)
}
