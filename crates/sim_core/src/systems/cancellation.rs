use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CancelTarget, CurrentEvent, EventKind};
use crate::entities::{Courier, DriverId, OrderStatus};
use crate::state::SimulationState;

/// Handles customer order cancellations and drivers quitting mid-day.
///
/// An order can be cancelled while Published or Accepted; once picked up
/// it is on board and completes. A quitting driver finishes deliveries
/// already on board; accepted-but-not-picked-up orders are cancelled,
/// since status transitions are monotonic and cannot return to Published.
pub fn cancellation_system(event: Res<CurrentEvent>, mut state: ResMut<SimulationState>) {
    let EventKind::Cancellation(target) = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;

    match target {
        CancelTarget::Order(order_id) => {
            let order = &state.orders[&order_id];
            match order.status {
                OrderStatus::Published => {
                    state.order_mut(order_id).cancel();
                    state.unassigned_orders.remove(&order_id);
                    log::debug!("t={now} order {order_id} cancelled before matching");
                }
                OrderStatus::Accepted => {
                    let courier = order.assigned_to;
                    state.order_mut(order_id).cancel();
                    state.assigned_orders.remove(&order_id);
                    match courier {
                        Some(Courier::Driver(driver_id)) => {
                            release_from_driver(&mut state, driver_id, order_id);
                        }
                        Some(Courier::Fleet(fleet_id)) => {
                            // Recall without counting a delivery.
                            state.fleet_mut(fleet_id).dispatched = false;
                        }
                        None => panic!("accepted order {order_id} has no courier"),
                    }
                    log::debug!("t={now} order {order_id} cancelled after acceptance");
                }
                // Too late to cancel, or already terminal.
                _ => log::debug!(
                    "t={now} cancellation of {order_id} ignored, order is {:?}",
                    order.status
                ),
            }
        }
        CancelTarget::Driver(driver_id) => {
            state.available_drivers.remove(&driver_id);
            state.retired_drivers.insert(driver_id);

            let held: Vec<_> = state.drivers[&driver_id].held_orders.clone();
            for order_id in held {
                if state.orders[&order_id].status == OrderStatus::Accepted {
                    state.order_mut(order_id).cancel();
                    state.assigned_orders.remove(&order_id);
                    state.driver_mut(driver_id).release_order(order_id, 0.0);
                }
                // PickedUp orders stay on board and will be delivered.
            }
            log::debug!("t={now} driver {driver_id} quits for the day");
        }
    }
}

fn release_from_driver(state: &mut SimulationState, driver_id: DriverId, order_id: crate::entities::OrderId) {
    let retired = state.retired_drivers.contains(&driver_id);
    let driver = state.driver_mut(driver_id);
    driver.release_order(order_id, 0.0);
    if !retired && driver.has_capacity_slot() {
        state.available_drivers.insert(driver_id);
    }
}
