//! Register map definitions for the ADXL375 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{OutputDataRate, PowerMode};

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `THRESH_SHOCK`.
pub const REG_THRESH_SHOCK: u8 = 0x1D;
/// Register address of `OFSX`.
pub const REG_OFSX: u8 = 0x1E;
/// Register address of `OFSY`.
pub const REG_OFSY: u8 = 0x1F;
/// Register address of `OFSZ`.
pub const REG_OFSZ: u8 = 0x20;
/// Register address of `SHOCK_DUR`.
pub const REG_SHOCK_DUR: u8 = 0x21;
/// Register address of `SHOCK_LATENT`.
pub const REG_SHOCK_LATENT: u8 = 0x22;
/// Register address of `SHOCK_WINDOW`.
pub const REG_SHOCK_WINDOW: u8 = 0x23;
/// Register address of `THRESH_ACT`.
pub const REG_THRESH_ACT: u8 = 0x24;
/// Register address of `THRESH_INACT`.
pub const REG_THRESH_INACT: u8 = 0x25;
/// Register address of `TIME_INACT`.
pub const REG_TIME_INACT: u8 = 0x26;
/// Register address of `ACT_INACT_CTL`.
pub const REG_ACT_INACT_CTL: u8 = 0x27;
/// Register address of `SHOCK_AXES`.
pub const REG_SHOCK_AXES: u8 = 0x2A;
/// Register address of `ACT_SHOCK_STATUS`.
pub const REG_ACT_SHOCK_STATUS: u8 = 0x2B;
/// Register address of `BW_RATE`.
pub const REG_BW_RATE: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x2E;
/// Register address of `INT_MAP`.
pub const REG_INT_MAP: u8 = 0x2F;
/// Register address of `INT_SOURCE`.
pub const REG_INT_SOURCE: u8 = 0x30;
/// Register address of `DATA_FORMAT`.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Register address of `DATAX0` (X-axis low byte).
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAX1` (X-axis high byte).
pub const REG_DATAX1: u8 = 0x33;
/// Register address of `DATAY0` (Y-axis low byte).
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAY1` (Y-axis high byte).
pub const REG_DATAY1: u8 = 0x35;
/// Register address of `DATAZ0` (Z-axis low byte).
pub const REG_DATAZ0: u8 = 0x36;
/// Register address of `DATAZ1` (Z-axis high byte).
pub const REG_DATAZ1: u8 = 0x37;
/// Register address of `FIFO_CTL`.
pub const REG_FIFO_CTL: u8 = 0x38;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x39;

/// Identity byte reported by the `DEVID` register.
pub const EXPECTED_DEVICE_ID: u8 = 0xE5;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `BW_RATE` register (address `0x2C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BwRate {
    // Output data rate selection (bits 3:0).
    pub odr: OutputDataRate,
    // Reduced-power operation flag (bit 4).
    pub low_power: bool,
    #[skip]
    __: B3,
}

impl From<u8> for BwRate {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<BwRate> for u8 {
    fn from(value: BwRate) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Sleep-mode reading frequency (bits 1:0).
    pub wakeup: B2,
    // Sleep-mode enable flag (bit 2).
    pub sleep: bool,
    // Measurement enable selection (bit 3).
    pub mode: PowerMode,
    // Autosleep enable flag (bit 4).
    pub auto_sleep: bool,
    // Activity/inactivity serial linking flag (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `DATA_FORMAT` register (address `0x31`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFormat {
    // Fixed range bits; always set on this device (bits 1:0).
    pub range: B2,
    // Left-justified (MSB) output mode selection (bit 2).
    pub left_justify: bool,
    // Full-resolution mode flag; always set on this device (bit 3).
    pub full_resolution: bool,
    #[skip]
    __: B1,
    // Interrupt active-low selection (bit 5).
    pub interrupt_invert: bool,
    // 3-wire SPI mode selection (bit 6).
    pub three_wire_spi: bool,
    // Self-test force enable (bit 7).
    pub self_test: bool,
}

impl DataFormat {
    /// Returns the datasheet-recommended operating value (`0x0B`): full
    /// resolution with both fixed range bits set.
    pub fn recommended() -> Self {
        Self::new().with_full_resolution(true).with_range(0b11)
    }
}

impl From<u8> for DataFormat {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<DataFormat> for u8 {
    fn from(value: DataFormat) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for BwRate {
    type Raw = u8;
    const ADDRESS: u8 = REG_BW_RATE;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x0A);
}

impl Register for PowerControl {
    type Raw = u8;
    const ADDRESS: u8 = REG_POWER_CTL;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for DataFormat {
    type Raw = u8;
    const ADDRESS: u8 = REG_DATA_FORMAT;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x0B);
}
