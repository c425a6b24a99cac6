//! `policy` handler: render the autoscale setting offline.

use tabled::Tabled;

use armscale_api::types::AutoscaleSettingProperties;
use armscale_core::convert::iso8601_duration;
use armscale_core::{
    AutoscaleProfile, AutoscaleRule, ComparisonOperator, ScaleType, build_autoscale_setting,
};

use crate::cli::{GlobalOpts, PolicyArgs};
use crate::error::CliError;
use crate::output;

use super::load_config;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Profile")]
    profile: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Trigger")]
    trigger: String,
    #[tabled(rename = "Action")]
    action: String,
}

fn operator_symbol(op: ComparisonOperator) -> &'static str {
    match op {
        ComparisonOperator::Equals => "==",
        ComparisonOperator::NotEquals => "!=",
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::GreaterThanOrEqual => ">=",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessThanOrEqual => "<=",
    }
}

fn starts(profile: &AutoscaleProfile) -> String {
    let Some(recurrence) = &profile.recurrence else {
        return "always (fallback)".into();
    };
    let schedule = &recurrence.schedule;
    let days: Vec<String> = schedule
        .days
        .iter()
        .map(|d| d.to_string().chars().take(3).collect())
        .collect();
    let times: Vec<String> = schedule
        .start_times()
        .iter()
        .map(|(h, m)| format!("{h:02}:{m:02}"))
        .collect();
    format!(
        "{} {} ({})",
        days.join(","),
        times.join(","),
        schedule.time_zone
    )
}

fn rule_row(profile: &AutoscaleProfile, rule: &AutoscaleRule) -> RuleRow {
    let t = &rule.metric_trigger;
    let a = &rule.scale_action;
    let unit = match a.scale_type {
        ScaleType::PercentChangeCount => "%",
        ScaleType::ChangeCount | ScaleType::ExactCount => "",
    };
    RuleRow {
        profile: profile.name.clone(),
        capacity: format!(
            "{}..{} (default {})",
            profile.capacity.minimum, profile.capacity.maximum, profile.capacity.default
        ),
        starts: starts(profile),
        trigger: format!(
            "{} {} {} {} over {}",
            t.statistic,
            t.metric_name,
            operator_symbol(t.operator),
            t.threshold,
            iso8601_duration(t.time_window)
        ),
        action: format!(
            "{} {}{unit} ({}), cooldown {}",
            a.direction,
            a.value,
            a.scale_type,
            iso8601_duration(a.cooldown)
        ),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &PolicyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = load_config(global)?;
    let setting = build_autoscale_setting(&args.target, &args.metric_source, &config.policy)?;
    let document = AutoscaleSettingProperties::from(&setting);

    let out = output::render(args.output, &document, |_| {
        setting
            .profiles
            .iter()
            .flat_map(|p| p.rules.iter().map(move |r| rule_row(p, r)))
            .collect()
    })?;
    output::print_output(&out);
    Ok(())
}
