//! Database queries, grouped by table
//!
//! All functions use the generic Executor pattern, so they run against a
//! `&PgPool` or inside a run's transaction (`&mut *tx`).

pub mod samples;
pub mod versions;
