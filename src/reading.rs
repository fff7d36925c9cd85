use core::fmt;

use log::debug;

/// A classified measurement carried by a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Ambient temperature in °C.
    Temperature(f32),
    /// CO2 concentration in ppm.
    Co2(u16),
}

/// Values observed so far during a collection session.
///
/// Each field stays `None` until a frame of that kind arrives; later frames
/// of the same kind overwrite it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Ambient temperature in °C.
    pub temperature: Option<f32>,
    /// CO2 concentration in ppm.
    pub co2: Option<u16>,
}

/// A complete reading from the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2MonData {
    /// Ambient temperature in °C.
    pub temperature: f32,
    /// CO2 concentration in ppm.
    pub co2: u16,
}

/// Formats the reading as `temp: <°C, 2 decimals>` and `co2: <ppm>` lines.
impl fmt::Display for Co2MonData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "temp: {:.2}\nco2: {}", self.temperature, self.co2)
    }
}

impl Reading {
    /// Creates a new `Reading` with neither quantity observed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `sample`, replacing any earlier value of the same kind.
    pub fn apply(&mut self, sample: Sample) {
        match sample {
            Sample::Temperature(t) => self.temperature = Some(t),
            Sample::Co2(ppm) => self.co2 = Some(ppm),
        }
        debug!("Reading updated: {:?}", self);
    }

    /// Whether both quantities have been observed.
    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    /// Returns the reading once both quantities have been observed.
    pub fn complete(&self) -> Option<Co2MonData> {
        Some(Co2MonData {
            temperature: self.temperature?,
            co2: self.co2?,
        })
    }
}
