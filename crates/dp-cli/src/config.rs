//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Duration;
use dp_core::{Category, CategoryPriorities, Planner};
use dp_store::DayStore;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Priority assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: Category,
    #[serde(default)]
    pub priority: i32,
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `days/` folder.
    pub data_dir: PathBuf,

    /// Category priorities used when resolving overlaps.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,

    /// Minimum gap kept between events pushed by `move --push`.
    #[serde(default)]
    pub push_min_gap_minutes: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("categories", &self.categories.len())
            .field("push_min_gap_minutes", &self.push_min_gap_minutes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
            categories: Vec::new(),
            push_min_gap_minutes: 0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the platform config file, `config_path`,
    /// then `DAYPLAN_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DAYPLAN_"));

        figment.extract()
    }

    /// Category priorities; a category listed twice keeps its last priority.
    pub fn priorities(&self) -> CategoryPriorities {
        self.categories
            .iter()
            .map(|c| (c.name.clone(), c.priority))
            .collect()
    }

    pub fn planner(&self) -> Planner<CategoryPriorities> {
        Planner::new(self.priorities())
    }

    pub fn store(&self) -> DayStore {
        DayStore::new(&self.data_dir)
    }

    /// Gap kept by push-moves; negative values count as zero.
    pub fn push_min_gap(&self) -> anyhow::Result<Duration> {
        Duration::try_minutes(self.push_min_gap_minutes.max(0)).with_context(|| {
            format!(
                "push_min_gap_minutes {} is out of range",
                self.push_min_gap_minutes
            )
        })
    }
}

/// Returns the platform-specific config directory for dayplan.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dayplan"))
}

/// Returns the platform-specific data directory for dayplan.
///
/// On Linux: `~/.local/share/dayplan`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dayplan"))
}
