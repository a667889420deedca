//! Feasibility filters applied before a driver is considered for an order.

use crate::entities::{Driver, Order};
use crate::geo;

/// A driver's working load during one matching pass. Starts from the
/// driver's committed load and grows as the pass bundles orders on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverLoad {
    pub volume_l: f64,
    pub weight_kg: f64,
    pub held_count: usize,
}

impl DriverLoad {
    pub fn add(&mut self, order: &Order) {
        self.volume_l += order.volume_l;
        self.weight_kg += order.weight_kg;
        self.held_count += 1;
    }
}

/// Whether `driver` can take `order` given its working `load`, current
/// `position`, and detour budget already spent this pass.
///
/// Checks, in order: slot count, parcel size class, volume, weight, detour
/// budget (the approach leg counts against `max_detour_km`), and that the
/// delivery can finish inside the order's window at the driver's speed.
pub fn is_feasible(
    order: &Order,
    driver: &Driver,
    load: DriverLoad,
    position: crate::geo::Point,
    detour_used_km: f64,
    now: u64,
) -> bool {
    if load.held_count >= driver.max_orders {
        return false;
    }
    if order.size_class > driver.vehicle_type.max_parcel_size() {
        return false;
    }
    if load.volume_l + order.volume_l > driver.capacity_volume_l {
        return false;
    }
    if load.weight_kg + order.weight_kg > driver.max_weight_kg {
        return false;
    }

    let approach_km = geo::distance_km(position, order.pickup);
    if detour_used_km + approach_km > driver.max_detour_km {
        return false;
    }

    let total_minutes = geo::travel_time_minutes(
        approach_km + order.direct_distance_km(),
        driver.speed_kmph,
    );
    now as f64 + total_minutes <= order.window_end as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ParcelSize;
    use crate::test_helpers::{test_driver, test_order, test_point_offset_km, TEST_POINT};

    #[test]
    fn accepts_a_plain_feasible_pairing() {
        let order = test_order(1, 720);
        let driver = test_driver(1);
        assert!(is_feasible(
            &order,
            &driver,
            DriverLoad::default(),
            TEST_POINT,
            0.0,
            480
        ));
    }

    #[test]
    fn rejects_when_slots_are_full() {
        let order = test_order(1, 720);
        let mut driver = test_driver(1);
        driver.max_orders = 2;
        let load = DriverLoad {
            held_count: 2,
            ..Default::default()
        };
        assert!(!is_feasible(&order, &driver, load, TEST_POINT, 0.0, 480));
    }

    #[test]
    fn rejects_oversized_parcel_for_vehicle() {
        let mut order = test_order(1, 720);
        order.size_class = ParcelSize::Xl;
        let driver = test_driver(1); // car, max L
        assert!(!is_feasible(
            &order,
            &driver,
            DriverLoad::default(),
            TEST_POINT,
            0.0,
            480
        ));
    }

    #[test]
    fn rejects_when_cumulative_volume_exceeds_capacity() {
        let order = test_order(1, 720);
        let driver = test_driver(1);
        let load = DriverLoad {
            volume_l: driver.capacity_volume_l - order.volume_l + 1.0,
            ..Default::default()
        };
        assert!(!is_feasible(&order, &driver, load, TEST_POINT, 0.0, 480));
    }

    #[test]
    fn detour_budget_is_cumulative() {
        let mut order = test_order(1, 720);
        order.pickup = test_point_offset_km(4.0);
        let driver = test_driver(1); // max_detour_km = 10.0

        assert!(is_feasible(
            &order,
            &driver,
            DriverLoad::default(),
            TEST_POINT,
            0.0,
            480
        ));
        // With 7 km of detour already spent this pass, 4 more breaks the budget.
        assert!(!is_feasible(
            &order,
            &driver,
            DriverLoad::default(),
            TEST_POINT,
            7.0,
            480
        ));
    }

    #[test]
    fn rejects_when_window_cannot_be_met() {
        // 5 km delivery at 30 km/h needs 10 minutes; window closes in 5.
        let order = test_order(1, 485);
        let driver = test_driver(1);
        assert!(!is_feasible(
            &order,
            &driver,
            DriverLoad::default(),
            TEST_POINT,
            0.0,
            480
        ));
    }
}
