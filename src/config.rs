use std::path::Path;

use anyhow::Context;

/// Configuration of the bot, loaded from an optional TOML file.
/// Missing keys fall back to their defaults.
#[derive(serde::Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    pub size: SizeThresholds,
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Cannot parse config file {}", path.display()))
    }
}

/// Upper bounds (exclusive) of the diff-size buckets.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SizeThresholds {
    pub xs_upper_bound: u64,
    pub s_upper_bound: u64,
    pub m_upper_bound: u64,
    pub l_upper_bound: u64,
    pub xl_upper_bound: u64,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            xs_upper_bound: 10,
            s_upper_bound: 30,
            m_upper_bound: 100,
            l_upper_bound: 500,
            xl_upper_bound: 1000,
        }
    }
}
