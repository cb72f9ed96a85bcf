use crate::handoff::LaunchEntry;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    pub url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub marker_title: String,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandoffConfig {
    /// Installed-application registry: app id -> launch entry.
    #[serde(default)]
    pub apps: HashMap<String, LaunchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub probe: ProbeConfig,
    pub handoff: HandoffConfig,
    pub state: StateConfig,
}

impl AppConfig {
    pub fn load_default() -> anyhow::Result<Self> {
        let default = include_str!("../config/default.toml");
        let cfg: AppConfig = toml::from_str(default)?;
        Ok(cfg)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let p = path.into();
        let s = fs::read_to_string(&p)?;
        let cfg: AppConfig = toml::from_str(&s)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() -> anyhow::Result<()> {
        let cfg = AppConfig::load_default()?;

        assert_eq!(cfg.probe.url, "https://www.instagram.com");
        assert_eq!(cfg.probe.connect_timeout_ms, 5000);
        assert_eq!(cfg.probe.read_timeout_ms, 5000);
        assert_eq!(cfg.probe.marker_title, "Instagram");
        assert_eq!(cfg.probe.retry_delay_ms, 60_000);
        assert!(cfg.handoff.apps.is_empty());

        Ok(())
    }

    #[test]
    fn test_handoff_apps_table_parses() -> anyhow::Result<()> {
        let cfg: AppConfig = toml::from_str(
            r#"
            [probe]
            url = "https://example.com"
            connect_timeout_ms = 1000
            read_timeout_ms = 1000
            marker_title = "Example"
            retry_delay_ms = 5000

            [handoff.apps."com.example.app"]
            command = "example-app"
            args = ["--fullscreen"]

            [state]
            path = "/tmp/gate_state.json"
            "#,
        )?;

        let entry = &cfg.handoff.apps["com.example.app"];
        assert_eq!(entry.command, "example-app");
        assert_eq!(entry.args, vec!["--fullscreen"]);

        Ok(())
    }
}
