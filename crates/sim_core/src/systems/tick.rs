use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::kpi::KpiTracker;
use crate::state::SimulationState;

/// The periodic heartbeat: expire overdue orders, run matching, hand
/// deadline-critical leftovers to the backup fleet, then refresh KPIs.
///
/// Matching runs twice per tick. The first pass can free up nothing but
/// still leave feasible pairs on the table when a bundle hit its size
/// limit; the second pass sweeps those up with the updated driver loads.
pub fn tick_system(
    event: Res<CurrentEvent>,
    mut state: ResMut<SimulationState>,
    mut clock: ResMut<SimulationClock>,
    mut kpis: ResMut<KpiTracker>,
) {
    let EventKind::Tick(tick_number) = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;

    let expired = state.expire_overdue_orders(now);
    let matched = state.trigger_matching(now, &mut clock);
    let matched_second = state.trigger_matching(now, &mut clock);
    let dispatched = state.dispatch_overflow_fleet(now, &mut clock);

    state.tick_number = tick_number;
    state.debug_check_invariants();
    kpis.recompute(&state);

    if expired > 0 || matched + matched_second > 0 || dispatched > 0 {
        log::debug!(
            "t={now} tick {tick_number}: expired={expired} matched={} fleet={dispatched}",
            matched + matched_second
        );
    }
    state.log_tick(now);
}
