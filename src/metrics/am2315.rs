//! AM2315 temperature and humidity sensor.
//!
//! The sensor answers a read request over I2C with eight bytes: command,
//! length, humidity (2), temperature (2) and a Modbus CRC (little endian).

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};

/// I2C address of the AM2315.
pub const AM2315_I2C_ADDRESS: u16 = 0x5C;

/// Read-registers command: function code, start address, register count.
pub const READ_REQUEST: [u8; 3] = [0x03, 0x00, 0x04];

/// One temperature/humidity sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_celsius: f32,
    pub humidity_percent: f32,
}

pub fn compute_humidity(msb: u8, lsb: u8) -> f32 {
    f32::from(u16::from_be_bytes([msb, lsb])) / 10.0
}

/// Temperature in tenths of a degree; the top bit of `msb` is the sign.
pub fn compute_temperature(msb: u8, lsb: u8) -> f32 {
    let magnitude = f32::from(u16::from_be_bytes([msb & 0x7F, lsb])) / 10.0;
    if msb & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// CRC-16/MODBUS (polynomial 0xA001 reflected, seed 0xFFFF).
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Validate and decode a raw sensor reply.
pub fn decode_response(response: &[u8; 8]) -> Result<Reading> {
    let expected = u16::from_le_bytes([response[6], response[7]]);
    let actual = crc16(&response[..6]);
    if expected != actual {
        return Err(ChartError::sensor_error(format!(
            "AM2315 checksum mismatch: expected {:#06x}, computed {:#06x}",
            expected, actual
        )));
    }

    Ok(Reading {
        humidity_percent: compute_humidity(response[2], response[3]),
        temperature_celsius: compute_temperature(response[4], response[5]),
    })
}

/// Source of AM2315 samples.
pub trait Am2315Sensor {
    fn read(&mut self) -> Result<Reading>;
}

#[cfg(feature = "gpio")]
mod i2c {
    use super::*;
    use rppal::i2c::I2c;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Samples must be at least this far apart.
    const MIN_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

    /// AM2315 attached to the Raspberry Pi I2C bus.
    pub struct I2cAm2315 {
        bus: I2c,
        last: Option<(Instant, Reading)>,
    }

    impl I2cAm2315 {
        pub fn new() -> Result<Self> {
            let mut bus = I2c::new().map_err(|e| {
                ChartError::sensor_error(format!("Failed to open I2C bus: {}", e))
            })?;
            bus.set_slave_address(AM2315_I2C_ADDRESS).map_err(|e| {
                ChartError::sensor_error(format!("Failed to address AM2315: {}", e))
            })?;

            Ok(Self { bus, last: None })
        }

        fn sample(&mut self) -> Result<Reading> {
            // The sensor sleeps between samples and NAKs the wake-up writes.
            let _ = self.bus.write(&[0]);
            let _ = self.bus.write(&[0]);
            thread::sleep(Duration::from_millis(2));

            self.bus.write(&READ_REQUEST).map_err(|e| {
                ChartError::sensor_error(format!("AM2315 read request failed: {}", e))
            })?;
            thread::sleep(Duration::from_millis(10));

            let mut response = [0u8; 8];
            self.bus.read(&mut response).map_err(|e| {
                ChartError::sensor_error(format!("AM2315 read failed: {}", e))
            })?;

            decode_response(&response)
        }
    }

    impl Am2315Sensor for I2cAm2315 {
        fn read(&mut self) -> Result<Reading> {
            if let Some((taken, reading)) = self.last {
                if taken.elapsed() < MIN_SAMPLE_INTERVAL {
                    return Ok(reading);
                }
            }

            let reading = self.sample()?;
            self.last = Some((Instant::now(), reading));
            Ok(reading)
        }
    }
}

#[cfg(not(feature = "gpio"))]
mod emulator {
    use super::*;

    /// Fixed readings for systems without the sensor.
    pub struct EmulatedAm2315;

    impl EmulatedAm2315 {
        pub fn new() -> Result<Self> {
            Ok(Self)
        }
    }

    impl Am2315Sensor for EmulatedAm2315 {
        fn read(&mut self) -> Result<Reading> {
            Ok(Reading {
                temperature_celsius: 20.0,
                humidity_percent: 10.0,
            })
        }
    }
}

#[cfg(feature = "gpio")]
pub use i2c::I2cAm2315 as DefaultAm2315;

#[cfg(not(feature = "gpio"))]
pub use emulator::EmulatedAm2315 as DefaultAm2315;
