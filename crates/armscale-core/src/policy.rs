// ── Autoscale policy builder ──
//
// Assembles the request-driven autoscale setting: one scale-out and one
// scale-in rule shared by three profiles (an always-on default, a business
// hours profile, and the profile that restores defaults after hours).
// Pure: no I/O, no clock, no randomness.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{
    AutoscaleProfile, AutoscaleRule, AutoscaleSetting, ComparisonOperator, DayOfWeek,
    MetricStatistic, MetricTrigger, Recurrence, RecurrentSchedule, ResourceRef, ScaleAction,
    ScaleCapacity, ScaleDirection, ScaleType, TimeAggregation,
};

/// Name of the always-on fallback profile.
pub const DEFAULT_PROFILE_NAME: &str = "Default profile";

/// Name of the business-hours profile.
pub const BUSINESS_HOURS_PROFILE_NAME: &str = "Monday to Friday";

/// Name the portal gives the profile that reverts to defaults once the
/// scheduled profile called `scheduled` ends.
pub fn off_hours_profile_name(scheduled: &str) -> String {
    format!(r#"{{"name":"Default","for":"{scheduled}"}}"#)
}

// ── Configuration ───────────────────────────────────────────────────

/// Wall-clock time at which a recurring profile starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    fn check(self, field: &str) -> Result<(), CoreError> {
        if self.hour > 23 || self.minute > 59 {
            return Err(CoreError::invalid(
                field,
                format!("{:02}:{:02} is not a valid time of day", self.hour, self.minute),
            ));
        }
        Ok(())
    }
}

/// Instance counts for one profile, as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityConfig {
    pub minimum: u32,
    pub maximum: u32,
    pub default: u32,
}

impl CapacityConfig {
    pub const fn new(minimum: u32, maximum: u32, default: u32) -> Self {
        Self {
            minimum,
            maximum,
            default,
        }
    }

    fn build(self, field: &str) -> Result<ScaleCapacity, CoreError> {
        let capacity = ScaleCapacity {
            minimum: self.minimum,
            maximum: self.maximum,
            default: self.default,
        };
        capacity.check(field)?;
        Ok(capacity)
    }
}

/// One metric rule. Durations are whole minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub statistic: MetricStatistic,
    pub time_grain_minutes: u64,
    pub time_window_minutes: u64,
    pub time_aggregation: TimeAggregation,
    pub operator: ComparisonOperator,
    pub threshold: f64,
    pub direction: ScaleDirection,
    pub scale_type: ScaleType,
    pub change: u32,
    pub cooldown_minutes: u64,
}

impl RuleConfig {
    /// Sum of requests over 5 minutes above 10 adds one instance.
    pub fn scale_out() -> Self {
        Self {
            statistic: MetricStatistic::Sum,
            time_grain_minutes: 5,
            time_window_minutes: 5,
            time_aggregation: TimeAggregation::Total,
            operator: ComparisonOperator::GreaterThan,
            threshold: 10.0,
            direction: ScaleDirection::Increase,
            scale_type: ScaleType::ChangeCount,
            change: 1,
            cooldown_minutes: 5,
        }
    }

    /// Average of requests over 10 minutes below 5 removes one instance.
    pub fn scale_in() -> Self {
        Self {
            statistic: MetricStatistic::Average,
            time_grain_minutes: 10,
            time_window_minutes: 10,
            time_aggregation: TimeAggregation::Total,
            operator: ComparisonOperator::LessThan,
            threshold: 5.0,
            direction: ScaleDirection::Decrease,
            scale_type: ScaleType::ChangeCount,
            change: 1,
            cooldown_minutes: 5,
        }
    }

    fn build(
        &self,
        field: &str,
        config: &PolicyConfig,
        metric_source: &ResourceRef,
    ) -> Result<AutoscaleRule, CoreError> {
        if self.time_grain_minutes == 0 || self.time_window_minutes == 0 {
            return Err(CoreError::invalid(field, "time grain and window must be non-zero"));
        }
        let time_grain = minutes(field, "time_grain_minutes", self.time_grain_minutes)?;
        let time_window = minutes(field, "time_window_minutes", self.time_window_minutes)?;
        let cooldown = minutes(field, "cooldown_minutes", self.cooldown_minutes)?;
        if !self.threshold.is_finite() {
            return Err(CoreError::invalid(field, "threshold must be a finite number"));
        }

        Ok(AutoscaleRule {
            metric_trigger: MetricTrigger {
                metric_name: config.metric_name.clone(),
                metric_namespace: config.metric_namespace.clone(),
                metric_resource: metric_source.clone(),
                time_grain,
                statistic: self.statistic,
                time_window,
                time_aggregation: self.time_aggregation,
                operator: self.operator,
                threshold: self.threshold,
            },
            scale_action: ScaleAction {
                direction: self.direction,
                scale_type: self.scale_type,
                value: self.change,
                cooldown,
            },
        })
    }
}

/// Every tunable of the policy, with the sample's values as defaults.
///
/// Missing keys fall back to the defaults when deserialised, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub metric_name: String,
    pub metric_namespace: Option<String>,
    /// Windows time zone name used by both schedules.
    pub time_zone: String,
    pub days: Vec<DayOfWeek>,
    pub scale_out: RuleConfig,
    pub scale_in: RuleConfig,
    pub default_capacity: CapacityConfig,
    pub business_hours_capacity: CapacityConfig,
    pub off_hours_capacity: CapacityConfig,
    pub business_hours_start: TimeOfDay,
    pub business_hours_end: TimeOfDay,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            metric_name: "Requests".into(),
            metric_namespace: Some("Microsoft.Web/sites".into()),
            time_zone: "Pacific Standard Time".into(),
            days: DayOfWeek::weekdays(),
            scale_out: RuleConfig::scale_out(),
            scale_in: RuleConfig::scale_in(),
            default_capacity: CapacityConfig::new(1, 1, 1),
            business_hours_capacity: CapacityConfig::new(1, 2, 1),
            off_hours_capacity: CapacityConfig::new(1, 1, 1),
            business_hours_start: TimeOfDay::new(9, 0),
            business_hours_end: TimeOfDay::new(18, 30),
        }
    }
}

// ── Builder ─────────────────────────────────────────────────────────

/// Build the autoscale setting for `target`, driven by metrics read from
/// `metric_source`.
///
/// Errors with [`CoreError::InvalidArgument`] when either reference is empty
/// or malformed, or when `config` is inconsistent. Nothing is returned
/// unless the whole setting passes [`AutoscaleSetting::validate`].
pub fn build_autoscale_setting(
    target: &str,
    metric_source: &str,
    config: &PolicyConfig,
) -> Result<AutoscaleSetting, CoreError> {
    let target = ResourceRef::parse("target", target)?;
    let metric_source = ResourceRef::parse("metric_source", metric_source)?;

    if config.metric_name.trim().is_empty() {
        return Err(CoreError::invalid("policy.metric_name", "must not be empty"));
    }
    if config.days.is_empty() {
        return Err(CoreError::invalid("policy.days", "at least one day is required"));
    }
    config.business_hours_start.check("policy.business_hours_start")?;
    config.business_hours_end.check("policy.business_hours_end")?;

    let rules = vec![
        config.scale_out.build("policy.scale_out", config, &metric_source)?,
        config.scale_in.build("policy.scale_in", config, &metric_source)?,
    ];

    let weekly_at = |at: TimeOfDay| {
        Recurrence::weekly(RecurrentSchedule::daily_at(
            &config.time_zone,
            &config.days,
            at.hour,
            at.minute,
        ))
    };

    let profiles = vec![
        AutoscaleProfile {
            name: DEFAULT_PROFILE_NAME.into(),
            capacity: config.default_capacity.build("policy.default_capacity")?,
            rules: rules.clone(),
            recurrence: None,
        },
        AutoscaleProfile {
            name: BUSINESS_HOURS_PROFILE_NAME.into(),
            capacity: config
                .business_hours_capacity
                .build("policy.business_hours_capacity")?,
            rules: rules.clone(),
            recurrence: Some(weekly_at(config.business_hours_start)),
        },
        AutoscaleProfile {
            name: off_hours_profile_name(BUSINESS_HOURS_PROFILE_NAME),
            capacity: config.off_hours_capacity.build("policy.off_hours_capacity")?,
            rules,
            recurrence: Some(weekly_at(config.business_hours_end)),
        },
    ];

    let setting = AutoscaleSetting {
        name: None,
        target_resource: target,
        enabled: true,
        profiles,
    };
    setting.validate()?;
    Ok(setting)
}

/// [`build_autoscale_setting`] with [`PolicyConfig::default`].
pub fn default_autoscale_setting(
    target: &str,
    metric_source: &str,
) -> Result<AutoscaleSetting, CoreError> {
    build_autoscale_setting(target, metric_source, &PolicyConfig::default())
}

/// Longest time grain, window or cooldown the service accepts (one week).
pub const MAX_RULE_MINUTES: u64 = 7 * 24 * 60;

fn minutes(field: &str, key: &str, n: u64) -> Result<Duration, CoreError> {
    if n > MAX_RULE_MINUTES {
        return Err(CoreError::invalid(
            field,
            format!("{key} must be at most {MAX_RULE_MINUTES} (one week), got {n}"),
        ));
    }
    Ok(Duration::from_secs(n * 60))
}
