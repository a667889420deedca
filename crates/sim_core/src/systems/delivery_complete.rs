use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::entities::Courier;
use crate::pricing;
use crate::state::SimulationState;

/// Finishes a delivery: the order goes terminal, the courier is paid or
/// the fleet vehicle returns to base, and distance/time/emission
/// aggregates are credited.
pub fn delivery_complete_system(
    event: Res<CurrentEvent>,
    mut state: ResMut<SimulationState>,
) {
    let EventKind::DeliveryComplete {
        order,
        courier,
        distance_km,
        time_minutes,
    } = event.0.kind
    else {
        return;
    };
    let now = event.0.timestamp;

    let order_record = &state.orders[&order];
    if order_record.status.is_terminal() {
        // Cancelled while the courier was en route.
        log::debug!(
            "t={now} delivery of {order} skipped, order is {:?}",
            order_record.status
        );
        return;
    }
    let drop = order_record.drop;

    state.order_mut(order).deliver(now);
    state.assigned_orders.remove(&order);
    state.completed_deliveries += 1;
    state.total_distance_km += distance_km;
    state.total_delivery_time_min += time_minutes;

    match courier {
        Courier::Driver(driver_id) => {
            let retired = state.retired_drivers.contains(&driver_id);
            let driver = state.driver_mut(driver_id);
            let wage = pricing::driver_wage(distance_km, time_minutes, driver.rating);
            driver.release_order(order, wage);
            driver.location = drop;
            let emissions = distance_km * driver.vehicle_type.emissions_kg_per_km();
            let rejoin = !retired && driver.has_capacity_slot();
            log::debug!("t={now} driver {driver_id} delivers {order}, wage {wage:.2}");
            state.total_emissions_kg += emissions;
            if rejoin {
                state.available_drivers.insert(driver_id);
            }
        }
        Courier::Fleet(fleet_id) => {
            let vehicle = state.fleet_mut(fleet_id);
            vehicle.return_to_base();
            log::debug!("t={now} fleet vehicle {fleet_id} delivers {order}");
            // Dedicated vans, costed at truck-class emissions.
            state.total_emissions_kg +=
                distance_km * crate::entities::VehicleType::Truck.emissions_kg_per_km();
        }
    }
}
