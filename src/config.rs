use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub catalogs: CatalogsConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Mirror decisions to an audit log file.
    #[serde(default = "default_true")]
    pub audit_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { audit_log: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CatalogsConfig {
    #[serde(default)]
    pub environments: Vec<CatalogEntry>,
    #[serde(default)]
    pub task_types: Vec<CatalogEntry>,
    #[serde(default)]
    pub check_results: Vec<CatalogEntry>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    catalogs: CatalogsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    audit_log: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CatalogsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    environments: Vec<CatalogEntry>,
    #[serde(default)]
    task_types: Vec<CatalogEntry>,
    #[serde(default)]
    check_results: Vec<CatalogEntry>,
    #[serde(default)]
    remove_environments: Vec<String>,
    #[serde(default)]
    remove_task_types: Vec<String>,
    #[serde(default)]
    remove_check_results: Vec<String>,
}

// ── Merge logic ──

/// Merge user catalog entries into a default list.
/// In replace mode: user entries replace defaults entirely.
/// In merge mode: remove codes first, then upsert by code (an entry with a
/// known code updates its label, a new code appends).
fn merge_entries(
    base: &mut Vec<CatalogEntry>,
    add: Vec<CatalogEntry>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
    } else {
        base.retain(|e| !remove.contains(&e.code));
        for entry in add {
            if let Some(existing) = base.iter_mut().find(|e| e.code == entry.code) {
                existing.label = entry.label;
            } else {
                base.push(entry);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/risk-rules/config.toml (if exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/risk-rules/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/risk-rules/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                log::warn!("config parse error, ignoring user overlay: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.settings.audit_log {
            self.settings.audit_log = v;
        }

        let c = overlay.catalogs;
        merge_entries(
            &mut self.catalogs.environments,
            c.environments,
            &c.remove_environments,
            c.replace,
        );
        merge_entries(
            &mut self.catalogs.task_types,
            c.task_types,
            &c.remove_task_types,
            c.replace,
        );
        merge_entries(
            &mut self.catalogs.check_results,
            c.check_results,
            &c.remove_check_results,
            c.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
