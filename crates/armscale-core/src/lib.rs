// armscale-core: Autoscale policy model and builder, plus the provisioning
// scenario that drives the management plane (CLI consumes this).

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod naming;
pub mod plane;
pub mod policy;
pub mod scenario;

// ── Primary re-exports ──────────────────────────────────────────────
pub use armscale_api::{DEFAULT_AUTHORITY, DEFAULT_RESOURCE_MANAGER};
pub use config::{ManagementConfig, PollingSettings, ServicePrincipal};
pub use error::CoreError;
pub use naming::random_name;
pub use plane::{ArmSession, ManagementPlane, PlanSpec, SiteSpec, connect};
pub use policy::{
    CapacityConfig, PolicyConfig, RuleConfig, TimeOfDay, build_autoscale_setting,
    default_autoscale_setting,
};
pub use scenario::{Cleanup, ScenarioOptions, ScenarioReport, Scoped, run, with_resource_group};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Policy
    AutoscaleProfile, AutoscaleRule, AutoscaleSetting, ComparisonOperator, MetricStatistic,
    MetricTrigger, ScaleAction, ScaleCapacity, ScaleDirection, ScaleType, TimeAggregation,
    // Schedules
    DayOfWeek, Recurrence, RecurrenceFrequency, RecurrentSchedule,
    // Resources
    Resource, ResourceRef, WebSite,
};
