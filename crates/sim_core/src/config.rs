//! Simulation configuration and fail-fast validation.

use thiserror::Error;

/// Simulation day boundaries in minutes-of-day.
pub const DAY_START_MINUTE: u64 = 480; // 8 AM
pub const DAY_END_MINUTE: u64 = 1200; // 8 PM

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("end_minute {end} must be after start_minute {start}")]
    HorizonInverted { start: u64, end: u64 },
    #[error("tick_interval_min must be positive")]
    ZeroTickInterval,
    #[error("bundle_size_limit must be at least 1")]
    ZeroBundleSize,
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Scenario knobs. `Default` is the baseline scenario; experiments override
/// individual fields from there.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub num_orders: usize,
    pub metro_drivers: usize,
    pub yango_drivers: usize,
    pub shahzore_trucks: usize,
    pub fleet_vehicles: usize,
    /// Maximum detour a driver tolerates to reach a pickup, in km.
    pub max_detour_km: f64,
    /// Scales every generated order price. 1.0 is list price.
    pub base_price_multiplier: f64,
    /// When false the matcher assigns each order independently and never
    /// forms bundles.
    pub bundling_enabled: bool,
    /// Most orders a single matching pass will bundle onto one driver.
    pub bundle_size_limit: usize,
    /// Orders further apart than this are never bundled together.
    pub bundle_proximity_km: f64,
    pub tick_interval_min: u64,
    pub start_minute: u64,
    pub end_minute: u64,
    /// How close to its deadline an unmatched order gets before the backup
    /// fleet takes it, in minutes.
    pub overflow_margin_min: u64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_orders: 200,
            metro_drivers: 13,
            yango_drivers: 50,
            shahzore_trucks: 5,
            fleet_vehicles: 10,
            max_detour_km: 5.0,
            base_price_multiplier: 1.0,
            bundling_enabled: true,
            bundle_size_limit: 3,
            bundle_proximity_km: 3.0,
            tick_interval_min: 15,
            start_minute: DAY_START_MINUTE,
            end_minute: DAY_END_MINUTE,
            overflow_margin_min: 30,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_minute <= self.start_minute {
            return Err(ConfigError::HorizonInverted {
                start: self.start_minute,
                end: self.end_minute,
            });
        }
        if self.tick_interval_min == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.bundle_size_limit == 0 {
            return Err(ConfigError::ZeroBundleSize);
        }
        for (name, value) in [
            ("max_detour_km", self.max_detour_km),
            ("base_price_multiplier", self.base_price_multiplier),
            ("bundle_proximity_km", self.bundle_proximity_km),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Length of the simulated horizon in minutes.
    pub fn horizon_minutes(&self) -> u64 {
        self.end_minute - self.start_minute
    }
}
