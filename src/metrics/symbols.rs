//! Sensor-backed symbol provider for monitoring pages.
//!
//! Supported symbols:
//!
//! | Symbol               | Text                         | Condition          |
//! |----------------------|------------------------------|--------------------|
//! | `gpio.<n>`           | `HIGH` or `LOW`              | pin is high        |
//! | `pi.memory`          | total memory in bytes        |                    |
//! | `pi.memory_free`     | available memory in bytes    |                    |
//! | `process.<name>`     | PID of a running process     | process is running |
//! | `am2315.temperature` | degrees Celsius              |                    |
//! | `am2315.humidity`    | relative humidity in percent |                    |
//! | `pi.version`         | service version              |                    |
//! | `pi.time`            | local time, RFC 3339         |                    |

use crate::metrics::am2315::{Am2315Sensor, DefaultAm2315, Reading};
use crate::metrics::gpio::{DefaultGpioProvider, GpioProvider, PinLevel};
use crate::parse::leading_integer;
use crate::template::SymbolProvider;
use std::ffi::OsStr;
use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, warn};

/// Symbol families understood by [`SensorSymbols`].
pub const SYMBOL_FAMILIES: [&str; 8] = [
    "gpio.<n>",
    "pi.memory",
    "pi.memory_free",
    "process.<name>",
    "am2315.temperature",
    "am2315.humidity",
    "pi.version",
    "pi.time",
];

/// Resolves template symbols from GPIO pins, the AM2315 sensor and system
/// information.
pub struct SensorSymbols<G = DefaultGpioProvider, S = DefaultAm2315> {
    gpio: Option<G>,
    sensor: Option<S>,
    system: System,
}

impl SensorSymbols {
    /// Create a provider for the devices available on this system.
    ///
    /// Devices that fail to initialize are left out and their symbols stay
    /// unresolved.
    pub fn new() -> Self {
        let gpio = match DefaultGpioProvider::new() {
            Ok(provider) => Some(provider),
            Err(e) => {
                warn!("Failed to initialize GPIO support, continuing without GPIO: {}", e);
                None
            }
        };

        let sensor = match DefaultAm2315::new() {
            Ok(sensor) => Some(sensor),
            Err(e) => {
                warn!("Failed to initialize AM2315 sensor, continuing without it: {}", e);
                None
            }
        };

        Self {
            gpio,
            sensor,
            system: System::new(),
        }
    }
}

impl Default for SensorSymbols {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GpioProvider, S: Am2315Sensor> SensorSymbols<G, S> {
    /// Create a provider over explicit devices.
    pub fn with_devices(gpio: Option<G>, sensor: Option<S>) -> Self {
        Self {
            gpio,
            sensor,
            system: System::new(),
        }
    }

    pub fn gpio_mut(&mut self) -> Option<&mut G> {
        self.gpio.as_mut()
    }

    fn read_gpio(&mut self, pin_spec: &str) -> Option<PinLevel> {
        // Same narrowing as a C `(unsigned char) atoi(...)`.
        let pin = leading_integer(pin_spec.as_bytes()) as u8;
        let gpio = self.gpio.as_mut()?;

        match gpio.read_pin(pin) {
            Ok(level) => Some(level),
            Err(e) => {
                debug!("Failed to read GPIO pin {}: {}", pin, e);
                None
            }
        }
    }

    fn read_sensor(&mut self) -> Option<Reading> {
        let sensor = self.sensor.as_mut()?;

        match sensor.read() {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("Failed to read AM2315 sensor: {}", e);
                None
            }
        }
    }

    fn find_process(&mut self, name: &str) -> Option<String> {
        self.system.refresh_processes(ProcessesToUpdate::All);
        self.system
            .processes_by_exact_name(OsStr::new(name))
            .next()
            .map(|process| process.pid().to_string())
    }
}

impl<G: GpioProvider, S: Am2315Sensor> SymbolProvider for SensorSymbols<G, S> {
    fn resolve_string(&mut self, symbol: &str) -> Option<String> {
        if let Some(pin) = symbol.strip_prefix("gpio.") {
            return self.read_gpio(pin).map(|level| level.as_str().to_string());
        }

        if let Some(name) = symbol.strip_prefix("process.") {
            return self.find_process(name);
        }

        match symbol {
            "pi.memory" => {
                self.system.refresh_memory();
                Some(self.system.total_memory().to_string())
            }
            "pi.memory_free" => {
                self.system.refresh_memory();
                Some(self.system.available_memory().to_string())
            }
            "am2315.temperature" => self
                .read_sensor()
                .map(|reading| format!("{:.1}", reading.temperature_celsius)),
            "am2315.humidity" => self
                .read_sensor()
                .map(|reading| format!("{:.1}", reading.humidity_percent)),
            "pi.version" => Some(crate::VERSION.to_string()),
            "pi.time" => Some(chrono::Local::now().to_rfc3339()),
            _ => None,
        }
    }

    fn resolve_boolean(&mut self, symbol: &str) -> Option<bool> {
        if let Some(pin) = symbol.strip_prefix("gpio.") {
            return self.read_gpio(pin).map(PinLevel::is_high);
        }

        if let Some(name) = symbol.strip_prefix("process.") {
            return Some(self.find_process(name).is_some());
        }

        None
    }
}

#[cfg(all(test, not(feature = "gpio")))]
mod tests {
    use super::*;
    use crate::template::render;

    #[test]
    fn test_gpio_symbols() {
        let mut symbols = SensorSymbols::new();
        assert_eq!(symbols.resolve_string("gpio.4").as_deref(), Some("LOW"));
        assert_eq!(symbols.resolve_boolean("gpio.4"), Some(false));

        symbols
            .gpio_mut()
            .unwrap()
            .write_pin(4, PinLevel::High)
            .unwrap();
        assert_eq!(symbols.resolve_string("gpio.4").as_deref(), Some("HIGH"));
        assert_eq!(symbols.resolve_boolean("gpio.4"), Some(true));

        // a pin number that does not parse reads pin 0
        assert_eq!(symbols.resolve_string("gpio.x").as_deref(), Some("LOW"));
    }

    #[test]
    fn test_memory_symbols() {
        let mut symbols = SensorSymbols::new();
        let total: u64 = symbols.resolve_string("pi.memory").unwrap().parse().unwrap();
        let free: u64 = symbols
            .resolve_string("pi.memory_free")
            .unwrap()
            .parse()
            .unwrap();
        assert!(total > 0);
        assert!(free <= total);
        assert_eq!(symbols.resolve_boolean("pi.memory"), None);
    }

    #[test]
    fn test_sensor_and_version_symbols() {
        let mut symbols = SensorSymbols::new();
        assert_eq!(
            symbols.resolve_string("am2315.temperature").as_deref(),
            Some("20.0")
        );
        assert_eq!(
            symbols.resolve_string("am2315.humidity").as_deref(),
            Some("10.0")
        );
        assert_eq!(
            symbols.resolve_string("pi.version").as_deref(),
            Some(crate::VERSION)
        );
        assert!(symbols.resolve_string("pi.time").is_some());
    }

    #[test]
    fn test_own_process_is_found() {
        let mut symbols = SensorSymbols::new();
        symbols.system.refresh_processes(ProcessesToUpdate::All);
        let pid = sysinfo::get_current_pid().unwrap();
        let name = symbols
            .system
            .process(pid)
            .unwrap()
            .name()
            .to_string_lossy()
            .into_owned();

        let symbol = format!("process.{}", name);
        assert!(symbols.resolve_string(&symbol).is_some());
        assert_eq!(symbols.resolve_boolean(&symbol), Some(true));
    }

    #[test]
    fn test_missing_process() {
        let mut symbols = SensorSymbols::new();
        let name = "process.no-such-process-pi-chart";
        assert_eq!(symbols.resolve_string(name), None);
        assert_eq!(symbols.resolve_boolean(name), Some(false));
    }

    #[test]
    fn test_unknown_symbols_are_unresolved() {
        let mut symbols = SensorSymbols::new();
        assert_eq!(symbols.resolve_string("cpu.load"), None);
        assert_eq!(symbols.resolve_boolean("cpu.load"), None);
    }

    #[test]
    fn test_without_devices() {
        let mut symbols: SensorSymbols = SensorSymbols::with_devices(None, None);
        assert_eq!(symbols.resolve_string("gpio.4"), None);
        assert_eq!(symbols.resolve_string("am2315.humidity"), None);
    }

    #[test]
    fn test_renders_gpio_page() {
        let mut symbols = SensorSymbols::new();
        let page = render(
            b"<% If gpio.1 %>ON<% Else %>OFF<% EndIf %> <%= gpio.1 %>",
            &mut symbols,
        )
        .unwrap();
        assert_eq!(page, b"OFF LOW");
    }
}
