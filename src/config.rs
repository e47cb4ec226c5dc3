//! Configuration primitives for the ADXL375 driver.

use crate::params::OutputDataRate;
use crate::registers::DataFormat;

/// User-facing configuration applied while initializing the ADXL375.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Output data rate selection.
    pub odr: OutputDataRate,
    /// Reduced-power operation selection.
    pub low_power: bool,
    /// `DATA_FORMAT` value written during initialization.
    pub data_format: DataFormat,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    ///
    /// Initialization writes the configured values as provided; call this
    /// beforehand to catch selections the datasheet marks as ineffective.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.low_power && !(12.5..=400.0).contains(&self.odr.hz()) {
            return Err(ConfigError::LowPowerRateUnsupported);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the output data rate.
    pub fn odr(mut self, odr: OutputDataRate) -> Self {
        self.config.odr = odr;
        self
    }

    /// Enables or disables reduced-power operation.
    pub fn low_power(mut self, low_power: bool) -> Self {
        self.config.low_power = low_power;
        self
    }

    /// Overrides the `DATA_FORMAT` value written during initialization.
    pub fn data_format(mut self, data_format: DataFormat) -> Self {
        self.config.data_format = data_format;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odr: OutputDataRate::Od3200Hz,
            low_power: false,
            data_format: DataFormat::recommended(),
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Reduced-power operation is only effective between 12.5 Hz and 400 Hz.
    LowPowerRateUnsupported,
}
