use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::allocation::ranking::DEFAULT_RANK_LIMIT;
use crate::scoring::model::{ScoreModel, WeightsUpdate};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub weights: WeightsUpdate,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Reject weight overrides that do not sum to 1.0 instead of warning.
    #[serde(default)]
    pub strict_weights: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingConfig {
    #[serde(default = "default_rank_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllocationConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub weights: WeightsUpdate,
    pub default_limit: Option<usize>,
    pub resources: Option<BTreeMap<String, u64>>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/relief-priority/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        self.weights = merge_updates(self.weights, overrides.weights);
        if let Some(limit) = overrides.default_limit {
            self.ranking.default_limit = limit;
        }
        if let Some(resources) = overrides.resources {
            self.allocation.resources = resources;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Builds the score model with any configured weight overrides applied.
    pub fn build_model(&self) -> Result<ScoreModel> {
        let mut model = ScoreModel::default();
        if !self.weights.is_empty() {
            model.update_weights(&self.weights);
        }
        if self.scoring.strict_weights {
            model
                .get_weights()
                .validate()
                .map_err(|err| anyhow!("strict_weights is enabled: {err}"))?;
        }
        Ok(model)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let host = if self.server.host.eq_ignore_ascii_case("localhost") {
            "127.0.0.1"
        } else {
            self.server.host.as_str()
        };
        let bind = format!("{host}:{}", self.server.port);
        bind.parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[scoring]
strict_weights = false

# Partial overrides; omitted factors keep their defaults
# (evacuation 0.35, income 0.25, family 0.15, housing 0.15, terrain 0.10).
[weights]

[ranking]
default_limit = 10

[allocation.resources]
rice = 500
canned_goods = 300
shirts = 200

[server]
host = "127.0.0.1"
port = 3002

[logging]
level = "info"
"#;
        template.to_string()
    }
}

fn merge_updates(base: WeightsUpdate, overrides: WeightsUpdate) -> WeightsUpdate {
    WeightsUpdate {
        evacuation_history: overrides.evacuation_history.or(base.evacuation_history),
        income_level: overrides.income_level.or(base.income_level),
        family_size: overrides.family_size.or(base.family_size),
        housing_condition: overrides.housing_condition.or(base.housing_condition),
        terrain: overrides.terrain.or(base.terrain),
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_rank_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_rank_limit() -> usize {
    DEFAULT_RANK_LIMIT
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_log_level() -> String {
    "info".to_string()
}
