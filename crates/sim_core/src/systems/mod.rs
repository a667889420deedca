pub mod cancellation;
pub mod delivery_complete;
pub mod driver_arrival;
pub mod order_arrival;
pub mod order_pickup;
pub mod tick;

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::clock::{CancelTarget, EventKind, SimulationClock};
    use crate::entities::{Courier, DriverId, OrderId, OrderStatus};
    use crate::runner::{run_until_empty, simulation_schedule};
    use crate::scenario::{PendingDrivers, PendingOrders};
    use crate::state::SimulationState;
    use crate::test_helpers::{
        create_test_world, test_driver, test_order, test_point_offset_km,
    };

    fn world_with_queues() -> World {
        let mut world = create_test_world();
        world.insert_resource(PendingOrders::default());
        world.insert_resource(PendingDrivers::default());
        world
    }

    #[test]
    fn simulates_one_delivery_end_to_end() {
        let mut world = world_with_queues();
        world
            .resource_mut::<PendingOrders>()
            .0
            .push_back(test_order(1, 720));
        world
            .resource_mut::<PendingDrivers>()
            .0
            .push_back(test_driver(1));
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule(485, EventKind::OrderArrival(OrderId(1)));
            clock.schedule(487, EventKind::DriverArrival(DriverId(1)));
            clock.schedule(495, EventKind::Tick(1));
        }

        let mut schedule = simulation_schedule();
        let steps = run_until_empty(&mut world, &mut schedule, 1000);
        assert!(steps < 1000, "runner did not converge");

        let state = world.resource::<SimulationState>();
        let order = &state.orders[&OrderId(1)];
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.assigned_to, Some(Courier::Driver(DriverId(1))));
        assert_eq!(order.accepted_at, Some(495));
        assert_eq!(order.picked_up_at, Some(495));
        // 5 km at 30 km/h takes 10 minutes.
        assert_eq!(order.delivered_at, Some(505));

        let driver = &state.drivers[&DriverId(1)];
        assert!(driver.held_orders.is_empty());
        assert!(driver.total_earnings > 0.0);
        assert_eq!(driver.location, order.drop);
        assert_eq!(state.completed_deliveries, 1);
    }

    #[test]
    fn bundled_orders_deliver_in_pickup_sequence() {
        let mut world = world_with_queues();
        let mut second = test_order(2, 730);
        second.pickup = test_point_offset_km(1.0);
        second.drop = test_point_offset_km(6.0);
        world
            .resource_mut::<PendingOrders>()
            .0
            .extend([test_order(1, 720), second]);
        world
            .resource_mut::<PendingDrivers>()
            .0
            .push_back(test_driver(1));
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule(485, EventKind::OrderArrival(OrderId(1)));
            clock.schedule(486, EventKind::OrderArrival(OrderId(2)));
            clock.schedule(487, EventKind::DriverArrival(DriverId(1)));
            clock.schedule(495, EventKind::Tick(1));
        }

        let mut schedule = simulation_schedule();
        run_until_empty(&mut world, &mut schedule, 1000);

        let state = world.resource::<SimulationState>();
        let first = &state.orders[&OrderId(1)];
        let second = &state.orders[&OrderId(2)];
        assert_eq!(first.status, OrderStatus::Delivered);
        assert_eq!(second.status, OrderStatus::Delivered);
        assert_eq!(first.assigned_to, Some(Courier::Driver(DriverId(1))));
        assert_eq!(second.assigned_to, Some(Courier::Driver(DriverId(1))));
        assert!(first.picked_up_at <= second.picked_up_at);
        assert_eq!(state.completed_deliveries, 2);
    }

    #[test]
    fn cancellation_between_match_and_pickup_leaves_driver_clean() {
        let mut world = world_with_queues();
        // Put the pickup far away so there is time to cancel in between.
        let mut order = test_order(1, 720);
        order.pickup = test_point_offset_km(8.0);
        order.drop = test_point_offset_km(3.0);
        world.resource_mut::<PendingOrders>().0.push_back(order);
        world
            .resource_mut::<PendingDrivers>()
            .0
            .push_back(test_driver(1));
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule(485, EventKind::OrderArrival(OrderId(1)));
            clock.schedule(487, EventKind::DriverArrival(DriverId(1)));
            clock.schedule(495, EventKind::Tick(1));
            // Pickup needs 16 minutes of travel; cancel well before that.
            clock.schedule(
                500,
                EventKind::Cancellation(CancelTarget::Order(OrderId(1))),
            );
        }

        let mut schedule = simulation_schedule();
        run_until_empty(&mut world, &mut schedule, 1000);

        let state = world.resource::<SimulationState>();
        assert_eq!(state.orders[&OrderId(1)].status, OrderStatus::Cancelled);
        let driver = &state.drivers[&DriverId(1)];
        assert!(driver.held_orders.is_empty());
        assert_eq!(driver.total_earnings, 0.0);
        assert!(state.available_drivers.contains(&DriverId(1)));
        assert_eq!(state.completed_deliveries, 0);
    }

    #[test]
    fn unmatchable_order_expires_on_a_later_tick() {
        let mut world = world_with_queues();
        world
            .resource_mut::<PendingOrders>()
            .0
            .push_back(test_order(1, 500));
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule(485, EventKind::OrderArrival(OrderId(1)));
            clock.schedule(495, EventKind::Tick(1));
            clock.schedule(510, EventKind::Tick(2));
        }

        let mut schedule = simulation_schedule();
        run_until_empty(&mut world, &mut schedule, 1000);

        let state = world.resource::<SimulationState>();
        assert_eq!(state.orders[&OrderId(1)].status, OrderStatus::Expired);
        assert!(state.unassigned_orders.is_empty());
    }
}
