use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// What to do when the selected competitor already runs for the target relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameRelayPolicy {
    /// Insert one more run for the competitor on the next free leg.
    #[default]
    AddRun,
    /// Leave the existing run alone and write nothing.
    KeepExisting,
}

impl FromStr for SameRelayPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add-run" => Ok(Self::AddRun),
            "keep-existing" => Ok(Self::KeepExisting),
            other => bail!("unknown same-relay policy '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub stage_count: u32,
    pub same_relay_policy: SameRelayPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let stage_count = match lookup("EVENT_STAGE_COUNT") {
            Some(value) => value
                .parse()
                .context("EVENT_STAGE_COUNT must be a non-negative number")?,
            None => 1,
        };
        let same_relay_policy = match lookup("SAME_RELAY_POLICY") {
            Some(value) => value.parse().context("Cannot parse SAME_RELAY_POLICY")?,
            None => SameRelayPolicy::default(),
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            stage_count,
            same_relay_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.stage_count, 1);
        assert_eq!(config.same_relay_policy, SameRelayPolicy::AddRun);
    }

    #[test]
    fn test_values_from_env() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://event.qbe"),
            ("EVENT_STAGE_COUNT", "3"),
            ("SAME_RELAY_POLICY", "Keep-Existing"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite://event.qbe"));
        assert_eq!(config.stage_count, 3);
        assert_eq!(config.same_relay_policy, SameRelayPolicy::KeepExisting);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(config(&[("EVENT_STAGE_COUNT", "-1")]).is_err());
        assert!(config(&[("SAME_RELAY_POLICY", "replace")]).is_err());
    }
}
