//! Statistics table configuration

use crate::{Result, XdpstatError};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::debug;

/// Upper bound on per-CPU records, matching the kernel's NR_CPUS ceiling on
/// common distributions
pub const MAX_CPUS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    /// Number of per-CPU records (one per execution core)
    pub cpus: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self { cpus }
    }
}

impl StatsConfig {
    pub fn with_cpus(cpus: usize) -> Self {
        Self { cpus }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| XdpstatError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading statistics config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpus == 0 || self.cpus > MAX_CPUS {
            return Err(XdpstatError::InvalidCpuCount {
                requested: self.cpus,
                max: MAX_CPUS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_has_at_least_one_cpu() {
        let config = StatsConfig::default();
        assert!(config.cpus >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_str() {
        let config = StatsConfig::from_yaml_str("cpus: 8\n").expect("valid config");
        assert_eq!(config, StatsConfig::with_cpus(8));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = StatsConfig::from_yaml_str("{}").expect("defaults apply");
        assert_eq!(config, StatsConfig::default());
    }

    #[test]
    fn test_rejects_zero_and_too_many_cpus() {
        assert!(matches!(
            StatsConfig::from_yaml_str("cpus: 0"),
            Err(XdpstatError::InvalidCpuCount { requested: 0, .. })
        ));
        assert!(matches!(
            StatsConfig::with_cpus(MAX_CPUS + 1).validate(),
            Err(XdpstatError::InvalidCpuCount { .. })
        ));
        assert!(StatsConfig::with_cpus(MAX_CPUS).validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = StatsConfig::from_yaml_str("cpus: 2\ninterface: eth0\n").unwrap_err();
        assert!(matches!(err, XdpstatError::ConfigError(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "cpus: 4").expect("write config");

        let config = StatsConfig::from_yaml_file(file.path()).expect("load config");
        assert_eq!(config.cpus, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = StatsConfig::from_yaml_file("/nonexistent/xdpstat.yaml").unwrap_err();
        assert!(matches!(err, XdpstatError::IoError(_)));
    }
}
