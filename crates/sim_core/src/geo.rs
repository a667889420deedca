//! Geographic utility: great-circle distances and travel time estimates.
//!
//! The engine never computes geography inline; everything routes through
//! these two functions so a different road model can be swapped in later.

/// Earth radius in kilometers (haversine).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS_KM
}

/// Travel time in fractional minutes at a constant speed.
pub fn travel_time_minutes(distance_km: f64, speed_kmph: f64) -> f64 {
    if speed_kmph <= 0.0 {
        return f64::INFINITY;
    }
    distance_km / speed_kmph * 60.0
}

/// Travel time rounded up to whole minutes, for event scheduling.
pub fn travel_time_minutes_ceil(distance_km: f64, speed_kmph: f64) -> u64 {
    travel_time_minutes(distance_km, speed_kmph).ceil() as u64
}
