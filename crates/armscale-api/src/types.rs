//! Resource Manager request and response types.
//!
//! All types match the JSON bodies of the ARM endpoints armscale calls.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Enumerations the service treats as open sets are kept as strings;
//! `armscale-core` owns the typed domain model and converts into these.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Paging ───────────────────────────────────────────────────────────

/// ARM list envelope (`{ "value": [...], "nextLink": ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

// ── Subscriptions ────────────────────────────────────────────────────

/// Subscription, as listed by `GET /subscriptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub subscription_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// One of: `Enabled`, `Warned`, `PastDue`, `Disabled`, `Deleted`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

// ── Resource groups ──────────────────────────────────────────────────

/// Body for `PUT /subscriptions/{sub}/resourcegroups/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupCreate {
    pub location: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

/// Resource group as returned by ARM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: Option<ProvisioningProperties>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// The `provisioningState` block most ARM resources carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

// ── Web sites ────────────────────────────────────────────────────────

/// Body for `PUT .../providers/Microsoft.Web/sites/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCreate {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub properties: SiteCreateProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCreateProperties {
    /// ARM id of the server farm to host the site on. When absent the
    /// service places the site on a default plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_farm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_only: Option<bool>,
}

/// Web site as returned by ARM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: SiteProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProperties {
    /// `Running`, `Stopped`, ...
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub host_names: Vec<String>,
    #[serde(default)]
    pub default_host_name: Option<String>,
    #[serde(default)]
    pub server_farm_id: Option<String>,
}

// ── App service plans (server farms) ─────────────────────────────────

/// Pricing tier of an app service plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDescription {
    /// e.g. `P1`.
    pub name: String,
    /// e.g. `Premium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Current instance count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// Body for `PUT .../providers/Microsoft.Web/serverfarms/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppServicePlanCreate {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub sku: SkuDescription,
}

/// App service plan as returned by ARM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppServicePlan {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub sku: Option<SkuDescription>,
    #[serde(default)]
    pub properties: Option<AppServicePlanProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppServicePlanProperties {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub number_of_sites: Option<u32>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

// ── Autoscale settings ───────────────────────────────────────────────

/// Body for `PUT .../providers/Microsoft.Insights/autoscalesettings/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleSettingCreate {
    pub location: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    pub properties: AutoscaleSettingProperties,
}

/// Autoscale setting as returned by ARM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleSettingResource {
    pub id: String,
    pub name: String,
    pub location: String,
    pub properties: AutoscaleSettingProperties,
}

/// The autoscale policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleSettingProperties {
    pub profiles: Vec<AutoscaleProfile>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ARM id of the resource being scaled.
    pub target_resource_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_resource_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleProfile {
    pub name: String,
    pub capacity: ScaleCapacity,
    pub rules: Vec<ScaleRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Instance counts. ARM models these as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleCapacity {
    pub minimum: String,
    pub maximum: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRule {
    pub metric_trigger: MetricTrigger,
    pub scale_action: ScaleAction,
}

/// Durations are ISO-8601 (`PT5M`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrigger {
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_namespace: Option<String>,
    pub metric_resource_uri: String,
    pub time_grain: String,
    /// `Average`, `Min`, `Max`, `Sum`, `Count`.
    pub statistic: String,
    pub time_window: String,
    /// `Average`, `Minimum`, `Maximum`, `Total`, `Count`, `Last`.
    pub time_aggregation: String,
    /// `Equals`, `NotEquals`, `GreaterThan`, `GreaterThanOrEqual`, `LessThan`, `LessThanOrEqual`.
    pub operator: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleAction {
    /// `None`, `Increase`, `Decrease`.
    pub direction: String,
    /// `ChangeCount`, `PercentChangeCount`, `ExactCount`.
    #[serde(rename = "type")]
    pub scale_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub cooldown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    /// `None`, `Second`, `Minute`, `Hour`, `Day`, `Week`, `Month`, `Year`.
    pub frequency: String,
    pub schedule: RecurrentSchedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrentSchedule {
    /// Windows time zone name, e.g. `Pacific Standard Time`.
    pub time_zone: String,
    pub days: Vec<String>,
    pub hours: Vec<u32>,
    pub minutes: Vec<u32>,
}
