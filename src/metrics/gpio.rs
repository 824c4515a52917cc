//! GPIO (General Purpose Input/Output) access for Raspberry Pi.
//!
//! Pin levels back the `gpio.<n>` template symbols. Real hardware access is
//! feature-gated; without the `gpio` feature an in-memory emulator stands in
//! so the server runs on any development machine.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Logic level of a GPIO pin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    /// The text rendered for this level in templates.
    pub fn as_str(self) -> &'static str {
        match self {
            PinLevel::Low => "LOW",
            PinLevel::High => "HIGH",
        }
    }

    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

/// Trait for GPIO operations.
pub trait GpioProvider {
    /// Check if a specific pin is available.
    fn is_pin_available(&self, pin: u8) -> bool;

    /// Read the current level of a pin.
    fn read_pin(&mut self, pin: u8) -> Result<PinLevel>;

    /// Drive a pin to `level`, returning the level it had before.
    fn write_pin(&mut self, pin: u8, level: PinLevel) -> Result<PinLevel>;
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::ChartError;
    use rppal::gpio::{Gpio, Level};

    /// Raspberry Pi GPIO provider using rppal.
    pub struct RaspberryPiGpio {
        gpio: Gpio,
        available_pins: Vec<u8>,
    }

    impl RaspberryPiGpio {
        /// Create a new Raspberry Pi GPIO provider.
        pub fn new() -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| {
                ChartError::gpio_error(format!("Failed to initialize GPIO: {}", e))
            })?;

            Ok(Self {
                gpio,
                available_pins: (0..=27).collect(),
            })
        }
    }

    impl GpioProvider for RaspberryPiGpio {
        fn is_pin_available(&self, pin: u8) -> bool {
            self.available_pins.contains(&pin)
        }

        fn read_pin(&mut self, pin: u8) -> Result<PinLevel> {
            if !self.is_pin_available(pin) {
                return Err(ChartError::gpio_error(format!(
                    "Pin {} is not available",
                    pin
                )));
            }

            let gpio_pin = self.gpio.get(pin).map_err(|e| {
                ChartError::gpio_error(format!("Failed to access pin {}: {}", pin, e))
            })?;

            Ok(PinLevel::from(gpio_pin.read() == Level::High))
        }

        fn write_pin(&mut self, pin: u8, level: PinLevel) -> Result<PinLevel> {
            if !self.is_pin_available(pin) {
                return Err(ChartError::gpio_error(format!(
                    "Pin {} is not available",
                    pin
                )));
            }

            let mut output = self
                .gpio
                .get(pin)
                .map_err(|e| {
                    ChartError::gpio_error(format!("Failed to access pin {}: {}", pin, e))
                })?
                .into_output();
            output.set_reset_on_drop(false);

            let previous = PinLevel::from(output.is_set_high());
            output.write(if level.is_high() { Level::High } else { Level::Low });
            Ok(previous)
        }
    }
}

#[cfg(not(feature = "gpio"))]
mod emulator {
    use super::*;

    /// Number of pins the emulator models.
    pub const EMULATED_PIN_COUNT: usize = 26;

    /// In-memory GPIO bank for systems without GPIO support.
    ///
    /// All pins start LOW. Pins outside the bank read as LOW and ignore writes.
    pub struct EmulatedGpio {
        pins: [PinLevel; EMULATED_PIN_COUNT],
    }

    impl EmulatedGpio {
        pub fn new() -> Result<Self> {
            tracing::warn!("GPIO running in emulation mode");
            Ok(Self {
                pins: [PinLevel::Low; EMULATED_PIN_COUNT],
            })
        }
    }

    impl GpioProvider for EmulatedGpio {
        fn is_pin_available(&self, pin: u8) -> bool {
            usize::from(pin) < EMULATED_PIN_COUNT
        }

        fn read_pin(&mut self, pin: u8) -> Result<PinLevel> {
            Ok(self
                .pins
                .get(usize::from(pin))
                .copied()
                .unwrap_or(PinLevel::Low))
        }

        fn write_pin(&mut self, pin: u8, level: PinLevel) -> Result<PinLevel> {
            match self.pins.get_mut(usize::from(pin)) {
                Some(slot) => Ok(std::mem::replace(slot, level)),
                None => Ok(PinLevel::Low),
            }
        }
    }
}

// Re-export the appropriate GPIO provider
#[cfg(feature = "gpio")]
pub use raspberry_pi::RaspberryPiGpio as DefaultGpioProvider;

#[cfg(not(feature = "gpio"))]
pub use emulator::{EmulatedGpio as DefaultGpioProvider, EMULATED_PIN_COUNT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_level_text() {
        assert_eq!(PinLevel::High.as_str(), "HIGH");
        assert_eq!(PinLevel::Low.as_str(), "LOW");
        assert_eq!(PinLevel::from(true), PinLevel::High);
    }

    #[test]
    fn test_pin_level_serialization() {
        let level = PinLevel::High;
        let serialized = serde_json::to_string(&level).unwrap();
        let deserialized: PinLevel = serde_json::from_str(&serialized).unwrap();
        assert_eq!(level, deserialized);
    }

    #[cfg(not(feature = "gpio"))]
    #[test]
    fn test_emulated_gpio() {
        let mut gpio = DefaultGpioProvider::new().unwrap();
        assert!(gpio.is_pin_available(4));
        assert!(!gpio.is_pin_available(EMULATED_PIN_COUNT as u8));
        assert_eq!(gpio.read_pin(4).unwrap(), PinLevel::Low);

        assert_eq!(gpio.write_pin(4, PinLevel::High).unwrap(), PinLevel::Low);
        assert_eq!(gpio.read_pin(4).unwrap(), PinLevel::High);

        // out-of-range pins read LOW and ignore writes
        gpio.write_pin(200, PinLevel::High).unwrap();
        assert_eq!(gpio.read_pin(200).unwrap(), PinLevel::Low);
    }
}
