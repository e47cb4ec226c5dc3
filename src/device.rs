//! High-level ADXL375 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::Adxl375Interface;
use crate::log::{debug, warn};
use crate::params::{OutputDataRate, PowerMode};
use crate::registers::{
    BwRate,
    DataFormat,
    PowerControl,
    EXPECTED_DEVICE_ID,
    REG_BW_RATE,
    REG_DATAX0,
    REG_DATA_FORMAT,
    REG_DEVID,
    REG_OFSX,
    REG_OFSY,
    REG_OFSZ,
    REG_POWER_CTL,
    REG_THRESH_ACT,
    REG_THRESH_INACT,
};
use crate::sample::Acceleration;
use embedded_hal::delay::DelayNs;

// Bounded identity handshake: retry budget and spacing between attempts.
const ID_POLL_ATTEMPTS: usize = 100;
const ID_POLL_INTERVAL_MS: u32 = 10;
// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;

/// High-level synchronous driver for the ADXL375 accelerometer.
///
/// A freshly constructed driver is unbound: it owns no transport handle and
/// never touches the bus. [`initialize`](Self::initialize) binds the handle,
/// performs the identity handshake, and applies the startup configuration.
/// Until then every bus-facing operation fails with
/// [`Error::NotInitialized`].
pub struct Adxl375<IFACE> {
    interface: Option<IFACE>,
    config: Config,
    raw_sample: [u8; RAW_AXIS_BYTES],
    acceleration: Acceleration,
}

impl<IFACE> Adxl375<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new unbound driver carrying the startup configuration.
    pub fn new(config: Config) -> Self {
        Self {
            interface: None,
            config,
            raw_sample: [0; RAW_AXIS_BYTES],
            acceleration: Acceleration::default(),
        }
    }

    /// Consumes the driver and returns the owned interface, if bound.
    pub fn release(self) -> (Option<IFACE>, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface, if bound.
    pub fn interface_mut(&mut self) -> Option<&mut IFACE> {
        self.interface.as_mut()
    }

    /// Returns `true` once [`initialize`](Self::initialize) has bound a
    /// transport handle.
    pub fn is_bound(&self) -> bool {
        self.interface.is_some()
    }

    // ==================================================================
    // == Retained Sample & Configuration Access ========================
    // ==================================================================
    /// Returns the most recently decoded acceleration sample in milli-g.
    ///
    /// Pure accessor; reflects the last successful
    /// [`read_acceleration`](Self::read_acceleration) call, or zero for all
    /// axes before the first one.
    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    /// Returns the raw bytes backing the most recent sample.
    pub fn raw_sample(&self) -> [u8; RAW_AXIS_BYTES] {
        self.raw_sample
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the active configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

impl<IFACE, CommE> Adxl375<IFACE>
where
    IFACE: Adxl375Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Binds the transport handle and brings the device into measurement mode.
    ///
    /// The identity register is polled up to 100 times, 10 ms apart, until it
    /// reports the expected value; failed bus transfers consume attempts like
    /// any other mismatch. Exhausting the budget fails with
    /// [`Error::DeviceNotFound`] while keeping the handle bound so the caller
    /// can retry or probe with [`device_present`](Self::device_present).
    ///
    /// Once identified, the startup values for `BW_RATE`, `POWER_CTL`, and
    /// `DATA_FORMAT` are written in order. A failed write does not abort the
    /// sequence; the number of failed writes is returned, zero meaning a fully
    /// configured device.
    pub fn initialize(
        &mut self,
        interface: Option<IFACE>,
        delay: &mut impl DelayNs,
    ) -> Result<u8, CommE> {
        let Some(interface) = interface else {
            return Err(Error::InvalidHandle);
        };
        self.interface = Some(interface);

        if !self.poll_identity(delay) {
            warn!("identity poll exhausted; device not responding");
            return Err(Error::DeviceNotFound);
        }
        debug!("identity confirmed; applying startup configuration");

        let rate = u8::from(
            BwRate::new()
                .with_odr(self.config.odr)
                .with_low_power(self.config.low_power),
        );
        let power = u8::from(PowerControl::new().with_mode(PowerMode::Measure));
        let format = u8::from(self.config.data_format);

        let mut failed_writes = 0;
        for (register, value) in [
            (REG_BW_RATE, rate),
            (REG_POWER_CTL, power),
            (REG_DATA_FORMAT, format),
        ] {
            if self.write_register(register, value).is_err() {
                warn!("startup write to register {=u8:#x} failed", register);
                failed_writes += 1;
            }
        }

        Ok(failed_writes)
    }

    // ==================================================================
    // == Identification ================================================
    // ==================================================================
    /// Performs a single identity probe.
    ///
    /// Collapses every failure into `false`: an unbound handle, a failed bus
    /// transfer, and a mismatched identity byte all report absence. Never
    /// touches the bus while unbound.
    pub fn device_present(&mut self) -> bool {
        matches!(self.read_register(REG_DEVID), Ok(EXPECTED_DEVICE_ID))
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads one six-byte sample burst and stores the decoded result.
    ///
    /// The retained sample is only replaced after the full burst succeeds; a
    /// failed transfer leaves the previous sample intact. Use
    /// [`acceleration`](Self::acceleration) to fetch the decoded values.
    pub fn read_acceleration(&mut self) -> Result<(), CommE> {
        let interface = self.interface.as_mut().ok_or(Error::NotInitialized)?;

        let mut raw = [0u8; RAW_AXIS_BYTES];
        interface
            .read_many(REG_DATAX0, &mut raw)
            .map_err(Error::from)?;

        self.raw_sample = raw;
        self.acceleration = Acceleration::from_raw(&raw);
        Ok(())
    }

    // ==================================================================
    // == Runtime Configuration =========================================
    // ==================================================================
    /// Selects a new output data rate, preserving the configured power bit.
    pub fn set_odr(&mut self, odr: OutputDataRate) -> Result<(), CommE> {
        let rate = BwRate::new()
            .with_odr(odr)
            .with_low_power(self.config.low_power);
        self.write_register(REG_BW_RATE, u8::from(rate))?;

        self.config.odr = odr;
        Ok(())
    }

    /// Switches between standby and measurement mode.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), CommE> {
        let power = PowerControl::new().with_mode(mode);
        self.write_register(REG_POWER_CTL, u8::from(power))
    }

    /// Writes a new `DATA_FORMAT` value.
    pub fn set_data_format(&mut self, format: DataFormat) -> Result<(), CommE> {
        self.write_register(REG_DATA_FORMAT, u8::from(format))?;

        self.config.data_format = format;
        Ok(())
    }

    /// Programs the per-axis offset registers (196 mg/LSB, two's complement).
    ///
    /// The axes are written in X, Y, Z order and the sequence stops at the
    /// first failing write, leaving later axes untouched.
    pub fn set_offsets(&mut self, x: i8, y: i8, z: i8) -> Result<(), CommE> {
        self.write_register(REG_OFSX, x as u8)?;
        self.write_register(REG_OFSY, y as u8)?;
        self.write_register(REG_OFSZ, z as u8)
    }

    /// Sets the activity detection threshold (780 mg/LSB).
    pub fn set_activity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_register(REG_THRESH_ACT, threshold)
    }

    /// Sets the inactivity detection threshold (780 mg/LSB).
    pub fn set_inactivity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_register(REG_THRESH_INACT, threshold)
    }

    // ==================================================================
    // == Internal Register Helpers =====================================
    // ==================================================================
    fn poll_identity(&mut self, delay: &mut impl DelayNs) -> bool {
        for _ in 0..ID_POLL_ATTEMPTS {
            if matches!(self.read_register(REG_DEVID), Ok(EXPECTED_DEVICE_ID)) {
                return true;
            }
            delay.delay_ms(ID_POLL_INTERVAL_MS);
        }
        false
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        let interface = self.interface.as_mut().ok_or(Error::NotInitialized)?;
        interface
            .write_register(register, value)
            .map_err(Error::from)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        let interface = self.interface.as_mut().ok_or(Error::NotInitialized)?;
        interface.read_register(register).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BusFault;

    /// Scriptable interface stub recording every register operation.
    struct MockInterface {
        id_response: core::result::Result<u8, BusFault>,
        id_misses: usize,
        failing_writes: &'static [u8],
        burst_response: core::result::Result<[u8; RAW_AXIS_BYTES], BusFault>,
        id_reads: usize,
        burst_reads: usize,
        writes: [(u8, u8); 8],
        write_count: usize,
    }

    impl MockInterface {
        fn new() -> Self {
            Self {
                id_response: Ok(EXPECTED_DEVICE_ID),
                id_misses: 0,
                failing_writes: &[],
                burst_response: Ok([0; RAW_AXIS_BYTES]),
                id_reads: 0,
                burst_reads: 0,
                writes: [(0, 0); 8],
                write_count: 0,
            }
        }
    }

    impl Adxl375Interface for MockInterface {
        type Error = BusFault;

        fn write_register(
            &mut self,
            register: u8,
            value: u8,
        ) -> core::result::Result<(), BusFault> {
            assert!(self.write_count < self.writes.len(), "unexpected write volume");
            self.writes[self.write_count] = (register, value);
            self.write_count += 1;

            if self.failing_writes.contains(&register) {
                return Err(BusFault);
            }
            Ok(())
        }

        fn read_register(&mut self, register: u8) -> core::result::Result<u8, BusFault> {
            assert_eq!(register, REG_DEVID, "only identity reads are single-register");
            self.id_reads += 1;

            if self.id_reads <= self.id_misses {
                return Ok(0x00);
            }
            self.id_response
        }

        fn read_many(
            &mut self,
            register: u8,
            buf: &mut [u8],
        ) -> core::result::Result<(), BusFault> {
            assert_eq!(register, REG_DATAX0, "burst reads must start at DATAX0");
            assert_eq!(buf.len(), RAW_AXIS_BYTES);
            self.burst_reads += 1;

            let bytes = self.burst_response?;
            buf.copy_from_slice(&bytes);
            Ok(())
        }
    }

    #[test]
    fn initialize_without_handle_reports_invalid_handle() {
        let mut driver: Adxl375<MockInterface> = Adxl375::new(Config::default());

        let result = driver.initialize(None, &mut NoopDelay::new());

        assert_eq!(result, Err(Error::InvalidHandle));
        assert!(!driver.is_bound());
    }

    #[test]
    fn initialize_applies_startup_configuration() {
        let mut driver = Adxl375::new(Config::default());

        let failed = driver
            .initialize(Some(MockInterface::new()), &mut NoopDelay::new())
            .unwrap();
        assert_eq!(failed, 0);
        assert!(driver.is_bound());

        let (interface, _) = driver.release();
        let interface = interface.unwrap();
        assert_eq!(interface.id_reads, 1);
        assert_eq!(
            &interface.writes[..3],
            &[
                (REG_BW_RATE, 0x0F),
                (REG_POWER_CTL, 0x08),
                (REG_DATA_FORMAT, 0x0B),
            ]
        );
    }

    #[test]
    fn initialize_retries_identity_until_match() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.id_misses = 3;

        let failed = driver
            .initialize(Some(interface), &mut NoopDelay::new())
            .unwrap();
        assert_eq!(failed, 0);

        let (interface, _) = driver.release();
        assert_eq!(interface.unwrap().id_reads, 4);
    }

    #[test]
    fn initialize_gives_up_after_bounded_identity_poll() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.id_response = Ok(0x00);

        let result = driver.initialize(Some(interface), &mut NoopDelay::new());
        assert_eq!(result, Err(Error::DeviceNotFound));
        // The handle stays bound so the caller can probe or retry.
        assert!(driver.is_bound());

        let (interface, _) = driver.release();
        let interface = interface.unwrap();
        assert_eq!(interface.id_reads, ID_POLL_ATTEMPTS);
        assert_eq!(interface.write_count, 0);
    }

    #[test]
    fn bus_errors_consume_identity_attempts() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.id_response = Err(BusFault);

        let result = driver.initialize(Some(interface), &mut NoopDelay::new());
        assert_eq!(result, Err(Error::DeviceNotFound));

        let (interface, _) = driver.release();
        assert_eq!(interface.unwrap().id_reads, ID_POLL_ATTEMPTS);
    }

    #[test]
    fn initialize_tallies_failed_startup_writes() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.failing_writes = &[REG_POWER_CTL];

        let failed = driver
            .initialize(Some(interface), &mut NoopDelay::new())
            .unwrap();
        assert_eq!(failed, 1);

        // Later writes are still issued after a failure.
        let (interface, _) = driver.release();
        assert_eq!(interface.unwrap().write_count, 3);
    }

    #[test]
    fn operations_before_initialize_report_not_initialized() {
        let mut driver: Adxl375<MockInterface> = Adxl375::new(Config::default());

        assert_eq!(driver.read_acceleration(), Err(Error::NotInitialized));
        assert_eq!(
            driver.set_odr(OutputDataRate::Od100Hz),
            Err(Error::NotInitialized)
        );
        assert_eq!(
            driver.set_power_mode(PowerMode::Standby),
            Err(Error::NotInitialized)
        );
        assert_eq!(
            driver.set_data_format(DataFormat::recommended()),
            Err(Error::NotInitialized)
        );
        assert_eq!(driver.set_offsets(1, -2, 3), Err(Error::NotInitialized));
        assert_eq!(driver.set_activity_threshold(0x20), Err(Error::NotInitialized));
        assert_eq!(driver.set_inactivity_threshold(0x10), Err(Error::NotInitialized));
        assert!(!driver.device_present());
    }

    #[test]
    fn read_acceleration_decodes_and_retains_sample() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.burst_response = Ok([0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00]);
        driver
            .initialize(Some(interface), &mut NoopDelay::new())
            .unwrap();

        driver.read_acceleration().unwrap();

        let sample = driver.acceleration();
        assert_eq!(sample.x(), 49.0);
        assert_eq!(sample.y(), -49.0);
        assert_eq!(sample.z(), 0.0);
        assert_eq!(driver.raw_sample(), [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn failed_burst_keeps_previous_sample() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.burst_response = Ok([0x02, 0x00, 0x02, 0x00, 0x02, 0x00]);
        driver
            .initialize(Some(interface), &mut NoopDelay::new())
            .unwrap();
        driver.read_acceleration().unwrap();
        let before = driver.acceleration();

        if let Some(interface) = driver.interface_mut() {
            interface.burst_response = Err(BusFault);
        }

        assert_eq!(driver.read_acceleration(), Err(Error::Bus(BusFault)));
        assert_eq!(driver.acceleration(), before);
        assert_eq!(driver.raw_sample(), [0x02, 0x00, 0x02, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn set_offsets_stops_at_first_failing_axis() {
        let mut driver = Adxl375::new(Config::default());
        let mut interface = MockInterface::new();
        interface.failing_writes = &[REG_OFSY];
        driver
            .initialize(Some(interface), &mut NoopDelay::new())
            .unwrap();

        assert_eq!(driver.set_offsets(5, -5, 7), Err(Error::Bus(BusFault)));

        let (interface, _) = driver.release();
        let interface = interface.unwrap();
        assert_eq!(interface.write_count, 5);
        assert_eq!(interface.writes[3], (REG_OFSX, 0x05));
        assert_eq!(interface.writes[4], (REG_OFSY, 0xFB));
    }

    #[test]
    fn device_present_folds_failures_into_false() {
        let mut driver = Adxl375::new(Config::default());
        driver
            .initialize(Some(MockInterface::new()), &mut NoopDelay::new())
            .unwrap();
        assert!(driver.device_present());

        if let Some(interface) = driver.interface_mut() {
            interface.id_response = Ok(0x3A);
        }
        assert!(!driver.device_present());

        if let Some(interface) = driver.interface_mut() {
            interface.id_response = Err(BusFault);
        }
        assert!(!driver.device_present());
    }

    #[test]
    fn set_odr_updates_active_configuration() {
        let mut driver = Adxl375::new(Config::default());
        driver
            .initialize(Some(MockInterface::new()), &mut NoopDelay::new())
            .unwrap();

        driver.set_odr(OutputDataRate::Od800Hz).unwrap();
        assert_eq!(driver.config().odr, OutputDataRate::Od800Hz);

        let (interface, _) = driver.release();
        assert_eq!(interface.unwrap().writes[3], (REG_BW_RATE, 0x0D));
    }

    #[test]
    fn setters_write_their_target_registers() {
        let mut driver = Adxl375::new(Config::default());
        driver
            .initialize(Some(MockInterface::new()), &mut NoopDelay::new())
            .unwrap();

        let format = DataFormat::recommended().with_left_justify(true);
        driver.set_power_mode(PowerMode::Standby).unwrap();
        driver.set_data_format(format).unwrap();
        driver.set_activity_threshold(0x20).unwrap();
        driver.set_inactivity_threshold(0x10).unwrap();

        let (interface, config) = driver.release();
        let interface = interface.unwrap();
        assert_eq!(
            &interface.writes[3..7],
            &[
                (REG_POWER_CTL, 0x00),
                (REG_DATA_FORMAT, 0x0F),
                (REG_THRESH_ACT, 0x20),
                (REG_THRESH_INACT, 0x10),
            ]
        );
        assert_eq!(config.data_format, format);
    }
}
