//! Environmental signals consumed by the simulation
//!
//! Weather and day/night state are owned by external providers. The core only
//! reads three values per tick through [`EnvironmentSignals`]:
//!
//! - ambient temperature (simulation degrees, compared against fixed thresholds)
//! - current weather pattern (optional: a provider may not model weather)
//! - day/night phase
//!
//! Two providers ship with the crate: [`Environment`], a fixed snapshot that
//! tests and scripted scenarios use, and [`DiurnalCycle`], which advances a
//! clock every tick and derives temperature from the time of day.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather pattern reported by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherPattern {
    #[default]
    Clear,
    Cloudy,
    LightRain,
    HeavyRain,
    Storm,
    /// Hot, clear and dry
    Heatwave,
}

impl WeatherPattern {
    /// Whether water is falling from the sky
    #[inline]
    #[must_use]
    pub const fn is_raining(self) -> bool {
        matches!(self, Self::LightRain | Self::HeavyRain | Self::Storm)
    }

    /// Raindrops spawned along the top row per tick
    #[must_use]
    pub const fn drops_per_tick(self) -> u32 {
        match self {
            Self::LightRain => 1,
            Self::HeavyRain => 3,
            Self::Storm => 5,
            Self::Clear | Self::Cloudy | Self::Heatwave => 0,
        }
    }
}

impl fmt::Display for WeatherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::LightRain => "light rain",
            Self::HeavyRain => "heavy rain",
            Self::Storm => "storm",
            Self::Heatwave => "heatwave",
        };
        f.write_str(name)
    }
}

/// Read-only environmental signals sampled once per tick
pub trait EnvironmentSignals {
    /// Ambient air temperature
    fn ambient_temperature(&self) -> f32;

    /// Current weather, or `None` when no weather provider is attached
    fn weather(&self) -> Option<WeatherPattern>;

    /// Day/night phase
    fn is_daytime(&self) -> bool;
}

/// Fixed environmental snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temperature: f32,
    pub weather: Option<WeatherPattern>,
    pub daytime: bool,
}

impl Environment {
    /// Mild clear day
    pub const TEMPERATE: Self = Self {
        temperature: 25.0,
        weather: Some(WeatherPattern::Clear),
        daytime: true,
    };

    #[must_use]
    pub const fn new(temperature: f32, weather: WeatherPattern) -> Self {
        Self {
            temperature,
            weather: Some(weather),
            daytime: true,
        }
    }

    #[must_use]
    pub const fn at_night(mut self) -> Self {
        self.daytime = false;
        self
    }

    /// Snapshot without a weather signal
    #[must_use]
    pub const fn without_weather(mut self) -> Self {
        self.weather = None;
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::TEMPERATE
    }
}

impl EnvironmentSignals for Environment {
    fn ambient_temperature(&self) -> f32 {
        self.temperature
    }

    fn weather(&self) -> Option<WeatherPattern> {
        self.weather
    }

    fn is_daytime(&self) -> bool {
        self.daytime
    }
}

/// Clock-driven provider with a day/night temperature cycle
///
/// Coldest at 6am, hottest at 2pm. Weather is set externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiurnalCycle {
    /// Hours, 0-24
    time_of_day: f32,
    /// Simulated hours per tick
    hours_per_tick: f32,
    min_temperature: f32,
    max_temperature: f32,
    weather: WeatherPattern,
}

impl DiurnalCycle {
    #[must_use]
    pub fn new(min_temperature: f32, max_temperature: f32, hours_per_tick: f32) -> Self {
        Self {
            time_of_day: 12.0,
            hours_per_tick,
            min_temperature,
            max_temperature,
            weather: WeatherPattern::Clear,
        }
    }

    pub fn set_weather(&mut self, weather: WeatherPattern) {
        self.weather = weather;
    }

    pub fn set_time_of_day(&mut self, hours: f32) {
        self.time_of_day = hours.rem_euclid(24.0);
    }

    #[must_use]
    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    /// Advance the clock by one tick
    pub fn advance(&mut self) {
        self.time_of_day = (self.time_of_day + self.hours_per_tick).rem_euclid(24.0);
    }
}

impl EnvironmentSignals for DiurnalCycle {
    fn ambient_temperature(&self) -> f32 {
        // sin reaches 1.0 at 14:00 and is clamped to 0 overnight
        let hour_factor = ((self.time_of_day - 6.0) * std::f32::consts::PI / 16.0)
            .sin()
            .max(0.0);
        let base = self.min_temperature + (self.max_temperature - self.min_temperature) * hour_factor;
        match self.weather {
            WeatherPattern::Heatwave => base + 15.0,
            WeatherPattern::HeavyRain | WeatherPattern::Storm => base - 5.0,
            _ => base,
        }
    }

    fn weather(&self) -> Option<WeatherPattern> {
        Some(self.weather)
    }

    fn is_daytime(&self) -> bool {
        (6.0..18.0).contains(&self.time_of_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diurnal_extremes() {
        let mut cycle = DiurnalCycle::new(10.0, 30.0, 1.0);
        cycle.set_time_of_day(14.0);
        assert_relative_eq!(cycle.ambient_temperature(), 30.0, epsilon = 1e-3);
        cycle.set_time_of_day(3.0);
        assert_relative_eq!(cycle.ambient_temperature(), 10.0, epsilon = 1e-3);
        assert!(!cycle.is_daytime());
    }

    #[test]
    fn test_clock_wraps() {
        let mut cycle = DiurnalCycle::new(10.0, 30.0, 5.0);
        cycle.set_time_of_day(22.0);
        cycle.advance();
        assert_relative_eq!(cycle.time_of_day(), 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rain_patterns() {
        assert!(WeatherPattern::Storm.is_raining());
        assert!(!WeatherPattern::Heatwave.is_raining());
        assert!(WeatherPattern::Storm.drops_per_tick() > WeatherPattern::LightRain.drops_per_tick());
    }
}
