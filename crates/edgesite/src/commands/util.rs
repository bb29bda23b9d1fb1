//! Shared helpers for command handlers: declared files, state files,
//! confirmation prompts.

use std::io::IsTerminal;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edgesite_core::SiteConfig;

use crate::error::CliError;

/// Bumped when the state file layout changes incompatibly.
pub const STATE_VERSION: u32 = 1;

/// Observed state persisted between runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub refreshed_at: DateTime<Utc>,
    pub site: SiteConfig,
}

// ── Declared files ──────────────────────────────────────────────────

/// Parse a declared site file; the format follows the extension.
pub fn read_declared(path: &Path) -> Result<SiteConfig, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&contents)?),
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => Err(CliError::Validation {
            field: "file".into(),
            reason: format!(
                "{}: expected a .yaml, .yml or .json extension",
                path.display()
            ),
        }),
    }
}

// ── State files ─────────────────────────────────────────────────────

/// `None` when the file does not exist yet.
pub fn read_state(path: &Path) -> Result<Option<SiteConfig>, CliError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let state: StateFile = serde_json::from_str(&contents)?;
    if state.version != STATE_VERSION {
        return Err(CliError::Validation {
            field: "state".into(),
            reason: format!(
                "{}: unsupported state version {} (expected {STATE_VERSION})",
                path.display(),
                state.version
            ),
        });
    }
    Ok(Some(state.site))
}

/// Write through a sibling temp file so a crash never leaves half a file.
pub fn write_state(path: &Path, site: &SiteConfig) -> Result<(), CliError> {
    let state = StateFile {
        version: STATE_VERSION,
        refreshed_at: Utc::now(),
        site: site.clone(),
    };
    let body = serde_json::to_string_pretty(&state)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub fn remove_state(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DECLARED_YAML: &str = "\
site_id: \"1001\"
connection_type: SOCKET_X1600
native_range:
  interface_index: INT_7
  native_subnet: 10.0.0.0/24
  local_ip: 10.0.0.1
";

    #[test]
    fn yaml_and_json_declarations_parse_alike() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("site.yaml");
        std::fs::write(&yaml, DECLARED_YAML).unwrap();
        let from_yaml = read_declared(&yaml).unwrap();

        let json = dir.path().join("site.json");
        std::fs::write(&json, serde_json::to_string(&from_yaml).unwrap()).unwrap();
        let from_json = read_declared(&json).unwrap();

        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml.site_id, "1001");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.txt");
        std::fs::write(&path, DECLARED_YAML).unwrap();
        assert!(matches!(
            read_declared(&path),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn state_written_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("site.yml");
        std::fs::write(&yaml, DECLARED_YAML).unwrap();
        let site = read_declared(&yaml).unwrap();

        let state = dir.path().join("state").join("site.json");
        assert!(read_state(&state).unwrap().is_none());
        write_state(&state, &site).unwrap();
        assert_eq!(read_state(&state).unwrap(), Some(site));

        remove_state(&state).unwrap();
        remove_state(&state).unwrap();
        assert!(!state.exists());
    }
}
