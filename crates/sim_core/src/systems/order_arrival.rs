use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::scenario::PendingOrders;
use crate::state::SimulationState;

/// Registers a pre-generated order into the live state when its arrival
/// time comes. Orders arrive in the same sequence they were generated, so
/// the queue front always corresponds to the event's id.
pub fn order_arrival_system(
    event: Res<CurrentEvent>,
    mut pending: ResMut<PendingOrders>,
    mut state: ResMut<SimulationState>,
) {
    let EventKind::OrderArrival(order_id) = event.0.kind else {
        return;
    };

    let order = match pending.0.pop_front() {
        Some(order) => order,
        None => panic!("order arrival {order_id} with empty pending queue"),
    };
    debug_assert_eq!(order.id, order_id);

    log::debug!(
        "t={} order {} arrives, window [{}, {}]",
        event.0.timestamp,
        order.id,
        order.window_start,
        order.window_end
    );
    state.add_order(order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::{Event, SimulationClock};
    use crate::entities::{OrderId, OrderStatus};
    use crate::test_helpers::{create_test_world, test_order};

    fn run_with_event(world: &mut World, kind: EventKind) {
        world.insert_resource(CurrentEvent(Event {
            timestamp: 480,
            seq: 0,
            kind,
        }));
        let mut schedule = Schedule::default();
        schedule.add_systems(order_arrival_system);
        schedule.run(world);
    }

    #[test]
    fn arrival_moves_order_from_pending_to_state() {
        let mut world = create_test_world();
        let mut pending = PendingOrders::default();
        pending.0.push_back(test_order(1, 720));
        world.insert_resource(pending);

        run_with_event(&mut world, EventKind::OrderArrival(OrderId(1)));

        let state = world.resource::<SimulationState>();
        assert_eq!(state.orders[&OrderId(1)].status, OrderStatus::Published);
        assert!(state.unassigned_orders.contains(&OrderId(1)));
        assert!(world.resource::<PendingOrders>().0.is_empty());
    }

    #[test]
    fn ignores_unrelated_events() {
        let mut world = create_test_world();
        let mut pending = PendingOrders::default();
        pending.0.push_back(test_order(1, 720));
        world.insert_resource(pending);
        world.insert_resource(SimulationClock::default());

        run_with_event(&mut world, EventKind::Tick(0));

        assert!(world.resource::<SimulationState>().orders.is_empty());
        assert_eq!(world.resource::<PendingOrders>().0.len(), 1);
    }
}
