use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::scenario::PendingDrivers;
use crate::state::SimulationState;

/// Brings a driver on shift. Like orders, drivers are generated up front
/// and spawned just-in-time when their arrival event fires.
pub fn driver_arrival_system(
    event: Res<CurrentEvent>,
    mut pending: ResMut<PendingDrivers>,
    mut state: ResMut<SimulationState>,
) {
    let EventKind::DriverArrival(driver_id) = event.0.kind else {
        return;
    };

    let driver = match pending.0.pop_front() {
        Some(driver) => driver,
        None => panic!("driver arrival {driver_id} with empty pending queue"),
    };
    debug_assert_eq!(driver.id, driver_id);

    log::debug!(
        "t={} driver {} ({:?}, {:?}) comes on shift",
        event.0.timestamp,
        driver.id,
        driver.class,
        driver.vehicle_type
    );
    state.add_driver(driver);
}
