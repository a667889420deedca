//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each
//! step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. Handlers are gated by event-kind
//! conditions so only the matching one does work.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::systems::{
    cancellation::cancellation_system, delivery_complete::delivery_complete_system,
    driver_arrival::driver_arrival_system, order_arrival::order_arrival_system,
    order_pickup::order_pickup_system, tick::tick_system,
};

// Condition functions for each event kind
fn is_order_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::OrderArrival(_)))
        .unwrap_or(false)
}

fn is_driver_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DriverArrival(_)))
        .unwrap_or(false)
}

fn is_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Tick(_)))
        .unwrap_or(false)
}

fn is_cancellation(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Cancellation(_)))
        .unwrap_or(false)
}

fn is_order_pickup(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::OrderPickup { .. }))
        .unwrap_or(false)
}

fn is_delivery_complete(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::DeliveryComplete { .. }))
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `false` once the queue
/// is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(event) => event,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs steps until the event queue drains or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the simulation schedule: one handler per event kind, gated by
/// event-type conditions so a step only pays for its own handler.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        order_arrival_system.run_if(is_order_arrival),
        driver_arrival_system.run_if(is_driver_arrival),
        tick_system.run_if(is_tick),
        cancellation_system.run_if(is_cancellation),
        order_pickup_system.run_if(is_order_pickup),
        delivery_complete_system.run_if(is_delivery_complete),
    ));
    schedule
}
