// ── Autoscale policy domain types ──
//
// Value objects describing an autoscale setting: profiles, their capacity
// bounds, metric rules, and optional recurrence. Built once by the policy
// builder and converted to the wire format by `convert`.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::resource::ResourceRef;
use super::schedule::Recurrence;
use crate::error::CoreError;

// ── Enumerations ────────────────────────────────────────────────────

/// How metric samples inside one time grain are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum MetricStatistic {
    Average,
    Min,
    Max,
    Sum,
    Count,
}

/// How the per-grain values across the time window are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TimeAggregation {
    Average,
    Minimum,
    Maximum,
    Total,
    Count,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ScaleDirection {
    None,
    Increase,
    Decrease,
}

/// How a scale action's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ScaleType {
    /// Add/remove this many instances.
    ChangeCount,
    /// Add/remove this percentage of the current count.
    PercentChangeCount,
    /// Set the count to exactly this value.
    ExactCount,
}

// ── Rules ───────────────────────────────────────────────────────────

/// When a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTrigger {
    pub metric_name: String,
    pub metric_namespace: Option<String>,
    /// The resource whose metric is observed.
    pub metric_resource: ResourceRef,
    /// Sampling granularity.
    pub time_grain: Duration,
    pub statistic: MetricStatistic,
    /// Lookback window the threshold is evaluated over.
    pub time_window: Duration,
    pub time_aggregation: TimeAggregation,
    pub operator: ComparisonOperator,
    pub threshold: f64,
}

/// What happens when a rule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleAction {
    pub direction: ScaleDirection,
    pub scale_type: ScaleType,
    pub value: u32,
    /// Minimum time before another scale action is considered.
    pub cooldown: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleRule {
    pub metric_trigger: MetricTrigger,
    pub scale_action: ScaleAction,
}

// ── Capacity ────────────────────────────────────────────────────────

/// Instance count bounds. Invariant: `minimum <= default <= maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleCapacity {
    pub minimum: u32,
    pub maximum: u32,
    pub default: u32,
}

impl ScaleCapacity {
    pub fn new(minimum: u32, maximum: u32, default: u32) -> Result<Self, CoreError> {
        let capacity = Self {
            minimum,
            maximum,
            default,
        };
        capacity.check("capacity")?;
        Ok(capacity)
    }

    pub(crate) fn check(&self, field: &str) -> Result<(), CoreError> {
        if self.minimum > self.default || self.default > self.maximum {
            return Err(CoreError::invalid(
                field,
                format!(
                    "expected minimum <= default <= maximum, got {} / {} / {}",
                    self.minimum, self.default, self.maximum
                ),
            ));
        }
        Ok(())
    }
}

// ── Profiles & setting ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleProfile {
    pub name: String,
    pub capacity: ScaleCapacity,
    pub rules: Vec<AutoscaleRule>,
    pub recurrence: Option<Recurrence>,
}

impl AutoscaleProfile {
    /// Profiles without a recurrence are the always-on fallback.
    pub fn is_fallback(&self) -> bool {
        self.recurrence.is_none()
    }
}

/// The top-level document submitted to the management plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleSetting {
    pub name: Option<String>,
    /// The resource being scaled.
    pub target_resource: ResourceRef,
    pub enabled: bool,
    pub profiles: Vec<AutoscaleProfile>,
}

impl AutoscaleSetting {
    /// Check the structural invariants of the whole setting.
    ///
    /// - at least one profile, names unique
    /// - every capacity satisfies `minimum <= default <= maximum`
    /// - at most one fallback profile
    /// - no two recurring profiles start at the same instant
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.profiles.is_empty() {
            return Err(CoreError::invalid("profiles", "at least one profile is required"));
        }

        let mut names = HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(CoreError::invalid("profiles", "profile name must not be empty"));
            }
            if !names.insert(profile.name.as_str()) {
                return Err(CoreError::invalid(
                    "profiles",
                    format!("duplicate profile name '{}'", profile.name),
                ));
            }
            profile
                .capacity
                .check(&format!("profiles.{}.capacity", profile.name))?;
        }

        let fallbacks = self.profiles.iter().filter(|p| p.is_fallback()).count();
        if fallbacks > 1 {
            return Err(CoreError::invalid(
                "profiles",
                format!("{fallbacks} profiles have no recurrence; at most one fallback is allowed"),
            ));
        }

        let recurring: Vec<&AutoscaleProfile> =
            self.profiles.iter().filter(|p| !p.is_fallback()).collect();
        for (i, first) in recurring.iter().enumerate() {
            for second in &recurring[i + 1..] {
                if let (Some(left), Some(right)) = (&first.recurrence, &second.recurrence) {
                    if left.schedule.collides_with(&right.schedule) {
                        return Err(CoreError::invalid(
                            "profiles",
                            format!(
                                "profiles '{}' and '{}' start at the same time",
                                first.name, second.name
                            ),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
