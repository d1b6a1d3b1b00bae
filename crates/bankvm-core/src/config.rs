//! BankVM Configuration
//!
//! Per-instance settings for the virtual machine. Values that used to be
//! process-wide (the base interest rate reported by `SENSOR_JUROS`) live
//! here so every VM carries its own copy.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{VmError, VmResult};

/// VM Configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Rate pushed by `SENSOR_JUROS`
    pub base_interest_rate: f64,

    /// Maximum value stack depth; unbounded unless set
    pub max_stack_size: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            base_interest_rate: 0.05,
            max_stack_size: usize::MAX,
        }
    }
}

impl VmConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base interest rate
    pub fn with_interest_rate(mut self, rate: f64) -> Self {
        self.base_interest_rate = rate;
        self
    }

    /// Read a TOML configuration file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> VmResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> VmResult<Self> {
        let config: VmConfig =
            toml::from_str(content).map_err(|e| VmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VmResult<()> {
        if !self.base_interest_rate.is_finite() {
            return Err(VmError::Config(format!(
                "base_interest_rate must be finite, got {}",
                self.base_interest_rate
            )));
        }
        if self.max_stack_size == 0 {
            return Err(VmError::Config("max_stack_size must be at least 1".into()));
        }
        Ok(())
    }
}
