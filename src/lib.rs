#![no_std]

#[cfg(test)]
extern crate std;

mod error;

pub mod config;
pub mod device;
pub mod interface;
mod log;
pub mod params;
pub mod registers;
pub mod sample;

pub use crate::device::Adxl375;
pub use crate::error::{Error, Result};
