//! Write-side use cases: payload checks, referential pre-checks, then one write plan.

pub mod games;
pub mod scouting;
