//! Sensor and system data sources for monitoring pages.
//!
//! This module provides the hardware side of the server: GPIO pin levels,
//! the AM2315 temperature/humidity sensor, and system memory and process
//! information, all exposed to templates through [`SensorSymbols`].

pub mod am2315;
pub mod gpio;
pub mod symbols;

// Re-export commonly used items
pub use am2315::{Am2315Sensor, DefaultAm2315, Reading};
pub use gpio::{DefaultGpioProvider, GpioProvider, PinLevel};
pub use symbols::{SensorSymbols, SYMBOL_FAMILIES};
