// ── Domain/wire conversions ──
//
// Domain autoscale types flow outward into `armscale_api::types` request
// bodies; ARM resources flow inward as `Resource` / `WebSite` handles.
// Wire enums are PascalCase strings, capacities and scale values are
// decimal strings, durations are ISO-8601.

use std::time::Duration;

use armscale_api::types as wire;

use crate::error::CoreError;
use crate::model::{
    AutoscaleProfile, AutoscaleRule, AutoscaleSetting, Recurrence, Resource, ResourceRef,
    ScaleCapacity, WebSite,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Format a duration as an ISO-8601 time span (`PT5M`, `PT1H30M`).
/// Sub-second precision is dropped.
pub fn iso8601_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 || total == 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

// ── Autoscale (domain → wire) ──────────────────────────────────────

impl From<&ScaleCapacity> for wire::ScaleCapacity {
    fn from(c: &ScaleCapacity) -> Self {
        Self {
            minimum: c.minimum.to_string(),
            maximum: c.maximum.to_string(),
            default: c.default.to_string(),
        }
    }
}

impl From<&AutoscaleRule> for wire::ScaleRule {
    fn from(rule: &AutoscaleRule) -> Self {
        let trigger = &rule.metric_trigger;
        let action = &rule.scale_action;
        Self {
            metric_trigger: wire::MetricTrigger {
                metric_name: trigger.metric_name.clone(),
                metric_namespace: trigger.metric_namespace.clone(),
                metric_resource_uri: trigger.metric_resource.to_string(),
                time_grain: iso8601_duration(trigger.time_grain),
                statistic: trigger.statistic.to_string(),
                time_window: iso8601_duration(trigger.time_window),
                time_aggregation: trigger.time_aggregation.to_string(),
                operator: trigger.operator.to_string(),
                threshold: trigger.threshold,
            },
            scale_action: wire::ScaleAction {
                direction: action.direction.to_string(),
                scale_type: action.scale_type.to_string(),
                value: Some(action.value.to_string()),
                cooldown: iso8601_duration(action.cooldown),
            },
        }
    }
}

impl From<&Recurrence> for wire::Recurrence {
    fn from(r: &Recurrence) -> Self {
        Self {
            frequency: r.frequency.to_string(),
            schedule: wire::RecurrentSchedule {
                time_zone: r.schedule.time_zone.clone(),
                days: r.schedule.days.iter().map(ToString::to_string).collect(),
                hours: r.schedule.hours.iter().map(|h| u32::from(*h)).collect(),
                minutes: r.schedule.minutes.iter().map(|m| u32::from(*m)).collect(),
            },
        }
    }
}

impl From<&AutoscaleProfile> for wire::AutoscaleProfile {
    fn from(p: &AutoscaleProfile) -> Self {
        Self {
            name: p.name.clone(),
            capacity: (&p.capacity).into(),
            rules: p.rules.iter().map(Into::into).collect(),
            recurrence: p.recurrence.as_ref().map(Into::into),
        }
    }
}

impl From<&AutoscaleSetting> for wire::AutoscaleSettingProperties {
    fn from(s: &AutoscaleSetting) -> Self {
        Self {
            profiles: s.profiles.iter().map(Into::into).collect(),
            enabled: s.enabled,
            name: s.name.clone(),
            target_resource_uri: s.target_resource.to_string(),
            target_resource_location: None,
        }
    }
}

// ── Resources (wire → domain) ──────────────────────────────────────

fn resource(id: &str, name: String, location: String) -> Result<Resource, CoreError> {
    Ok(Resource {
        id: ResourceRef::parse("id", id)?,
        name,
        location,
    })
}

impl TryFrom<wire::ResourceGroup> for Resource {
    type Error = CoreError;

    fn try_from(rg: wire::ResourceGroup) -> Result<Self, Self::Error> {
        resource(&rg.id, rg.name, rg.location)
    }
}

impl TryFrom<wire::AppServicePlan> for Resource {
    type Error = CoreError;

    fn try_from(plan: wire::AppServicePlan) -> Result<Self, Self::Error> {
        resource(&plan.id, plan.name, plan.location)
    }
}

impl TryFrom<wire::AutoscaleSettingResource> for Resource {
    type Error = CoreError;

    fn try_from(setting: wire::AutoscaleSettingResource) -> Result<Self, Self::Error> {
        resource(&setting.id, setting.name, setting.location)
    }
}

impl TryFrom<wire::Site> for WebSite {
    type Error = CoreError;

    /// Host names come from `hostNames`, falling back to `defaultHostName`.
    fn try_from(site: wire::Site) -> Result<Self, Self::Error> {
        let mut host_names = site.properties.host_names;
        if host_names.is_empty() {
            host_names.extend(site.properties.default_host_name);
        }
        Ok(Self {
            resource: resource(&site.id, site.name, site.location)?,
            host_names,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::policy::default_autoscale_setting;

    #[test]
    fn durations_are_iso8601() {
        assert_eq!(iso8601_duration(Duration::from_secs(300)), "PT5M");
        assert_eq!(iso8601_duration(Duration::from_secs(600)), "PT10M");
        assert_eq!(iso8601_duration(Duration::from_secs(5400)), "PT1H30M");
        assert_eq!(iso8601_duration(Duration::from_secs(45)), "PT45S");
        assert_eq!(iso8601_duration(Duration::ZERO), "PT0S");
    }

    #[test]
    fn setting_serializes_to_arm_shape() {
        let setting = default_autoscale_setting("plan-A", "site-B").unwrap();
        let props = wire::AutoscaleSettingProperties::from(&setting);
        let value = serde_json::to_value(&props).unwrap();

        assert_eq!(value["targetResourceUri"], "plan-A");
        assert_eq!(value["enabled"], true);
        assert_eq!(value["profiles"].as_array().unwrap().len(), 3);

        let default = &value["profiles"][0];
        assert_eq!(default["name"], "Default profile");
        assert_eq!(
            default["capacity"],
            json!({"minimum": "1", "maximum": "1", "default": "1"})
        );
        assert!(default.get("recurrence").is_none());

        assert_eq!(
            default["rules"][0],
            json!({
                "metricTrigger": {
                    "metricName": "Requests",
                    "metricNamespace": "Microsoft.Web/sites",
                    "metricResourceUri": "site-B",
                    "timeGrain": "PT5M",
                    "statistic": "Sum",
                    "timeWindow": "PT5M",
                    "timeAggregation": "Total",
                    "operator": "GreaterThan",
                    "threshold": 10.0
                },
                "scaleAction": {
                    "direction": "Increase",
                    "type": "ChangeCount",
                    "value": "1",
                    "cooldown": "PT5M"
                }
            })
        );

        assert_eq!(
            value["profiles"][2]["recurrence"],
            json!({
                "frequency": "Week",
                "schedule": {
                    "timeZone": "Pacific Standard Time",
                    "days": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
                    "hours": [18],
                    "minutes": [30]
                }
            })
        );
    }

    #[test]
    fn site_host_names_fall_back_to_default_host() {
        let site: wire::Site = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app1",
            "name": "app1",
            "location": "South Central US",
            "properties": { "defaultHostName": "app1.azurewebsites.net" }
        }))
        .unwrap();

        let site = WebSite::try_from(site).unwrap();
        assert_eq!(site.resource.id.name(), "app1");
        assert_eq!(site.url().as_deref(), Some("https://app1.azurewebsites.net/"));
    }

    #[test]
    fn resource_with_empty_id_is_rejected() {
        let rg = wire::ResourceGroup {
            id: String::new(),
            name: "rg".into(),
            location: "eastus2".into(),
            properties: None,
            tags: std::collections::HashMap::new(),
        };
        assert!(Resource::try_from(rg).is_err());
    }
}
