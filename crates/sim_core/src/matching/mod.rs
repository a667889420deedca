//! Greedy order-to-driver matching.
//!
//! The matcher works on immutable snapshots of orders and drivers and
//! returns proposed assignments; committing them (status transitions,
//! event scheduling) is the caller's job.

pub mod filters;
pub mod greedy;

pub use filters::{is_feasible, DriverLoad};
pub use greedy::{greedy_matching, Assignment, CostModel, DistanceTimeCost, MatchParams};
