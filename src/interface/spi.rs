//! 4-wire SPI interface built on `embedded-hal` `SpiBus` with a driver-managed
//! chip-select pin.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::Adxl375Interface;

// Command-byte flags: bit 7 marks a read, bit 6 a multi-byte transfer.
// Write commands carry the register address verbatim.
const READ_FLAG: u8 = 0x80;
const MULTI_BYTE_FLAG: u8 = 0x40;

/// SPI-based interface implementation for the ADXL375 driver.
///
/// The chip-select line is active low and owned by the interface: it rests
/// high, is asserted for the duration of exactly one register transaction,
/// and is released even when the bus fails mid-transaction. Errors reported
/// by the pin itself are ignored.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    CS: OutputPin,
{
    /// Creates a new interface from the SPI bus and chip-select pin.
    ///
    /// The chip-select pin is parked high immediately.
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }

    /// Builds the command byte used to address registers for reading.
    fn read_command_byte(register: u8, multi_byte: bool) -> u8 {
        let mut command = register | READ_FLAG;
        if multi_byte {
            command |= MULTI_BYTE_FLAG;
        }
        command
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned bus and chip-select pin.
    ///
    /// The chip-select pin is parked high before being handed back.
    pub fn release(mut self) -> (SPI, CS) {
        let _ = self.cs.set_high();
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Adxl375Interface for SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let _select = ChipSelectGuard::new(&mut self.cs);
        self.spi.write(&[register])?;
        self.spi.write(&[value])?;
        self.spi.flush()
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::read_command_byte(register, buf.len() > 1)];
        let _select = ChipSelectGuard::new(&mut self.cs);
        self.spi.write(&command)?;
        self.spi.read(buf)?;
        self.spi.flush()
    }
}

/// Asserts the chip-select line for the duration of one register transaction.
///
/// The line is driven low on construction and released high when the guard
/// drops, including on early error returns.
struct ChipSelectGuard<'a, CS>
where
    CS: OutputPin,
{
    cs: &'a mut CS,
}

impl<'a, CS> ChipSelectGuard<'a, CS>
where
    CS: OutputPin,
{
    fn new(cs: &'a mut CS) -> Self {
        let _ = cs.set_low();
        Self { cs }
    }
}

impl<CS> Drop for ChipSelectGuard<'_, CS>
where
    CS: OutputPin,
{
    fn drop(&mut self) {
        let _ = self.cs.set_high();
    }
}
