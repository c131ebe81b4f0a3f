//! Slot resolution and KPI evaluation.
//!
//! Provides the greedy assignment resolver and resolution quality metrics.
//!
//! # Algorithm
//!
//! `Resolver` is a constraint-filtering greedy resolver, not an optimizer.
//! Each unassigned slot is filtered by skill, time-off, and same-mass
//! bookings, then decided by a deterministic rule engine.
//!
//! # KPI
//!
//! `ResolveKpi` computes fill rate and per-volunteer load balance.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod kpi;
mod resolver;

pub use kpi::ResolveKpi;
pub use resolver::{ResolveRequest, Resolver};
