//! Pricing, driver wages, and platform economics.

use crate::entities::{ParcelSize, ServiceLevel};

/// Base rate per kilometer in rupees.
pub const PER_KM_RATE: f64 = 3.0;

/// Order prices are clamped into this band regardless of distance.
pub const MIN_ORDER_PRICE: f64 = 50.0;
pub const MAX_ORDER_PRICE: f64 = 200.0;

/// Driver wage components: per-km, per-minute, and a rating bonus.
pub const WAGE_PER_KM: f64 = 0.3;
pub const WAGE_PER_MIN: f64 = 0.02;
pub const MIN_WAGE: f64 = 1.0;

fn size_multiplier(size: ParcelSize) -> f64 {
    match size {
        ParcelSize::Xs => 0.8,
        ParcelSize::S => 0.9,
        ParcelSize::M => 1.0,
        ParcelSize::L => 1.2,
        ParcelSize::Xl => 1.5,
    }
}

fn service_multiplier(service: ServiceLevel) -> f64 {
    match service {
        ServiceLevel::SameDay => 1.3,
        ServiceLevel::NextDay => 1.0,
        ServiceLevel::Flex => 0.8,
    }
}

/// List price for an order: distance rate scaled by parcel size and service
/// level, clamped to the allowed band.
pub fn order_base_price(
    distance_km: f64,
    size: ParcelSize,
    service: ServiceLevel,
) -> f64 {
    let raw = distance_km * PER_KM_RATE * size_multiplier(size) * service_multiplier(service);
    raw.clamp(MIN_ORDER_PRICE, MAX_ORDER_PRICE)
}

/// Wage paid to a driver for one completed delivery. Drivers rated above
/// 4.0 earn a small bonus; everyone gets at least the minimum.
pub fn driver_wage(distance_km: f64, time_minutes: f64, rating: f64) -> f64 {
    let base = distance_km * WAGE_PER_KM + time_minutes * WAGE_PER_MIN;
    let bonus = ((rating - 4.0).max(0.0)) * 0.1 * base;
    (base + bonus).max(MIN_WAGE)
}
