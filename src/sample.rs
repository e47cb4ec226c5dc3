//! Acceleration sample decoding for the ADXL375 driver.

/// Nominal scale factor of the ADXL375 in milli-g per LSB.
pub const MILLI_G_PER_LSB: f32 = 49.0;

/// One decoded three-axis acceleration sample, expressed in milli-g.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Acceleration {
    x: f32,
    y: f32,
    z: f32,
}

impl Acceleration {
    /// Builds a sample directly from per-axis values in milli-g.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Decodes a raw six-byte burst read of `DATAX0..DATAZ1`.
    ///
    /// Each axis is a little-endian two's-complement 16-bit count scaled by
    /// [`MILLI_G_PER_LSB`]. Counts pass through unclamped.
    pub fn from_raw(raw: &[u8; 6]) -> Self {
        Self {
            x: Self::decode_axis(raw[0], raw[1]),
            y: Self::decode_axis(raw[2], raw[3]),
            z: Self::decode_axis(raw[4], raw[5]),
        }
    }

    /// X-axis acceleration in milli-g.
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Y-axis acceleration in milli-g.
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Z-axis acceleration in milli-g.
    pub const fn z(&self) -> f32 {
        self.z
    }

    fn decode_axis(low: u8, high: u8) -> f32 {
        f32::from(i16::from_le_bytes([low, high])) * MILLI_G_PER_LSB
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Acceleration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Acceleration {{ x: {=f32} mg, y: {=f32} mg, z: {=f32} mg }}",
            self.x,
            self.y,
            self.z
        );
    }
}
