// ── Domain model ──
//
// Canonical, typed representation of an autoscale policy and of the
// resources the scenario provisions. Wire shapes live in `armscale-api`;
// `crate::convert` maps between the two.

pub mod autoscale;
pub mod resource;
pub mod schedule;

// ── Re-exports ──────────────────────────────────────────────────────

pub use autoscale::{
    AutoscaleProfile, AutoscaleRule, AutoscaleSetting, ComparisonOperator, MetricStatistic,
    MetricTrigger, ScaleAction, ScaleCapacity, ScaleDirection, ScaleType, TimeAggregation,
};
pub use resource::{Resource, ResourceRef, WebSite};
pub use schedule::{DayOfWeek, Recurrence, RecurrenceFrequency, RecurrentSchedule};
