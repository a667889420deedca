use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::entities::Courier;
use crate::geo;
use crate::state::SimulationState;

/// A driver reaches the pickup point and takes the parcel on board, then
/// the delivery leg is scheduled.
///
/// The approach distance is measured from wherever the driver actually is
/// when the event fires, so chained pickups in a bundle cost the real
/// leg between consecutive pickup points.
pub fn order_pickup_system(
    event: Res<CurrentEvent>,
    mut state: ResMut<SimulationState>,
    mut clock: ResMut<SimulationClock>,
) {
    let EventKind::OrderPickup { order, driver } = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;

    // The order may have been cancelled between acceptance and pickup;
    // the event is then stale and the driver skips the stop.
    let order_record = &state.orders[&order];
    if order_record.status.is_terminal() {
        log::debug!("t={now} pickup of {order} skipped, order is {:?}", order_record.status);
        return;
    }
    match order_record.assigned_to {
        Some(Courier::Driver(assigned)) if assigned == driver => {}
        other => panic!("pickup of {order} by {driver} but order is assigned to {other:?}"),
    }

    let (pickup, delivery_km) = {
        let order_record = &state.orders[&order];
        (order_record.pickup, order_record.direct_distance_km())
    };

    let driver_record = state.driver_mut(driver);
    let approach_km = geo::distance_km(driver_record.location, pickup);
    driver_record.location = pickup;
    let speed = driver_record.speed_kmph;

    state.order_mut(order).pick_up(now);
    log::debug!("t={now} driver {driver} picks up {order}");

    let distance_km = approach_km + delivery_km;
    let time_minutes = geo::travel_time_minutes(distance_km, speed);
    let drop_leg_minutes = geo::travel_time_minutes_ceil(delivery_km, speed);
    clock.schedule(
        now + drop_leg_minutes,
        EventKind::DeliveryComplete {
            order,
            courier: Courier::Driver(driver),
            distance_km,
            time_minutes,
        },
    );
}
