//! Strongly typed parameter enumerations for the ADXL375 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use adxl375::params::{OutputDataRate, PowerMode};
//!
//! let odr = OutputDataRate::Od800Hz;
//! let mode = PowerMode::Measure;
//! let _ = (odr.hz(), mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Available output data rate (ODR) selections (`BW_RATE[3:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum OutputDataRate {
    /// 0.10 Hz output data rate.
    Od0_10Hz = 0b0000,
    /// 0.20 Hz output data rate.
    Od0_20Hz = 0b0001,
    /// 0.39 Hz output data rate.
    Od0_39Hz = 0b0010,
    /// 0.78 Hz output data rate.
    Od0_78Hz = 0b0011,
    /// 1.56 Hz output data rate.
    Od1_56Hz = 0b0100,
    /// 3.13 Hz output data rate.
    Od3_13Hz = 0b0101,
    /// 6.25 Hz output data rate.
    Od6_25Hz = 0b0110,
    /// 12.5 Hz output data rate.
    Od12_5Hz = 0b0111,
    /// 25 Hz output data rate.
    Od25Hz = 0b1000,
    /// 50 Hz output data rate.
    Od50Hz = 0b1001,
    /// 100 Hz output data rate.
    Od100Hz = 0b1010,
    /// 200 Hz output data rate.
    Od200Hz = 0b1011,
    /// 400 Hz output data rate.
    Od400Hz = 0b1100,
    /// 800 Hz output data rate.
    Od800Hz = 0b1101,
    /// 1600 Hz output data rate.
    Od1600Hz = 0b1110,
    /// 3200 Hz output data rate.
    Od3200Hz = 0b1111,
}

impl OutputDataRate {
    /// Returns the nominal ODR in hertz.
    pub const fn hz(self) -> f32 {
        match self {
            Self::Od0_10Hz => 0.10,
            Self::Od0_20Hz => 0.20,
            Self::Od0_39Hz => 0.39,
            Self::Od0_78Hz => 0.78,
            Self::Od1_56Hz => 1.56,
            Self::Od3_13Hz => 3.13,
            Self::Od6_25Hz => 6.25,
            Self::Od12_5Hz => 12.5,
            Self::Od25Hz => 25.0,
            Self::Od50Hz => 50.0,
            Self::Od100Hz => 100.0,
            Self::Od200Hz => 200.0,
            Self::Od400Hz => 400.0,
            Self::Od800Hz => 800.0,
            Self::Od1600Hz => 1_600.0,
            Self::Od3200Hz => 3_200.0,
        }
    }
}

/// Operating power modes encoded in `POWER_CTL.Measure` (bit 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum PowerMode {
    /// Standby mode; measurements stopped, lowest supply current.
    Standby = 0,
    /// Continuous measurement mode.
    Measure = 1,
}
