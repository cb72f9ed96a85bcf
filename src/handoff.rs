use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::process::{Command, Stdio};

/// A launchable entry point resolved from the installed-application
/// registry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LaunchEntry {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Resolves app ids and brings the target application to the foreground.
pub trait Launcher: Send + Sync + 'static {
    fn resolve(&self, app_id: &str) -> Option<LaunchEntry>;
    fn launch(&self, entry: &LaunchEntry) -> Result<()>;
}

/// Registry of launchable applications, keyed by app id. Populated from
/// the `[handoff.apps]` config table.
pub struct AppRegistry {
    apps: HashMap<String, LaunchEntry>,
}

impl AppRegistry {
    pub fn new(apps: HashMap<String, LaunchEntry>) -> Self {
        AppRegistry { apps }
    }
}

impl Launcher for AppRegistry {
    fn resolve(&self, app_id: &str) -> Option<LaunchEntry> {
        self.apps.get(app_id).cloned()
    }

    /// Fire-and-forget: the child is detached from our stdio and outlives
    /// the gate screen.
    fn launch(&self, entry: &LaunchEntry) -> Result<()> {
        Command::new(&entry.command)
            .args(&entry.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawning {}", entry.command))?;
        Ok(())
    }
}
