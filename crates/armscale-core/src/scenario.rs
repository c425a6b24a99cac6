// ── Provisioning scenario ──
//
// Resource group → web site → app service plan → autoscale setting, all
// inside a resource-group scope that deletes the group on every exit path.
// Steps run strictly in sequence; each awaits its remote operation to
// completion before the next one starts.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::model::{AutoscaleSetting, Resource, ResourceRef, WebSite};
use crate::naming::random_name;
use crate::plane::{ManagementPlane, PlanSpec, SiteSpec};
use crate::policy::{PolicyConfig, build_autoscale_setting};

// ── Options ─────────────────────────────────────────────────────────

/// Locations, name prefixes, and plan sizing for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOptions {
    pub resource_group_prefix: String,
    pub resource_group_location: String,
    pub web_app_prefix: String,
    pub plan_prefix: String,
    pub autoscale_prefix: String,
    /// Location of the site, the plan, and the autoscale setting.
    pub location: String,
    pub plan_sku_name: String,
    pub plan_sku_tier: String,
    pub plan_capacity: u32,
    pub plan_kind: String,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            resource_group_prefix: "rgMonitor".into(),
            resource_group_location: "eastus2".into(),
            web_app_prefix: "MyTestScaleWebApp".into(),
            plan_prefix: "MyTestAppServicePlan".into(),
            autoscale_prefix: "autoscalename1".into(),
            location: "southcentralus".into(),
            plan_sku_name: "P1".into(),
            plan_sku_tier: "Premium".into(),
            plan_capacity: 1,
            plan_kind: "app".into(),
        }
    }
}

impl ScenarioOptions {
    fn plan_spec(&self) -> PlanSpec {
        PlanSpec {
            location: self.location.clone(),
            sku_name: self.plan_sku_name.clone(),
            sku_tier: self.plan_sku_tier.clone(),
            capacity: self.plan_capacity,
            kind: self.plan_kind.clone(),
        }
    }
}

// ── Scoped resource group ───────────────────────────────────────────

/// What happened to the resource group when its scope ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Cleanup {
    /// The group was never created.
    NotNeeded,
    Deleted { id: ResourceRef },
    /// Deletion was attempted and failed; the error was logged.
    Failed { id: ResourceRef, error: String },
}

impl fmt::Display for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNeeded => f.write_str("nothing to clean up"),
            Self::Deleted { id } => write!(f, "deleted {id}"),
            Self::Failed { id, error } => write!(f, "failed to delete {id}: {error}"),
        }
    }
}

/// The body's outcome together with how cleanup went.
#[derive(Debug)]
pub struct Scoped<T> {
    pub outcome: Result<T, CoreError>,
    pub cleanup: Cleanup,
}

/// Create resource group `name`, run `body` with it, then delete it.
///
/// Deletion is attempted whether `body` succeeds or fails, and deletion
/// errors are logged rather than returned. If the group cannot be created
/// `body` never runs and there is nothing to delete.
pub async fn with_resource_group<P, F, Fut, T>(
    plane: &P,
    name: &str,
    location: &str,
    body: F,
) -> Scoped<T>
where
    P: ManagementPlane,
    F: FnOnce(Resource) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    info!(name, location, "creating resource group");
    let group = match plane.create_resource_group(name, location).await {
        Ok(group) => group,
        Err(e) => {
            info!("did not create any resources, no clean up is necessary");
            return Scoped {
                outcome: Err(e),
                cleanup: Cleanup::NotNeeded,
            };
        }
    };
    info!(name = %group.name, "created resource group");

    let id = group.id.clone();
    let outcome = body(group).await;
    if let Err(ref e) = outcome {
        warn!(error = %e, "scenario step failed, cleaning up");
    }

    info!(%id, "deleting resource group");
    let cleanup = match plane.delete_resource_group(&id).await {
        Ok(()) => {
            info!(%id, "deleted resource group");
            Cleanup::Deleted { id }
        }
        Err(e) => {
            error!(%id, error = %e, "failed to delete resource group");
            Cleanup::Failed {
                id,
                error: e.to_string(),
            }
        }
    };

    Scoped { outcome, cleanup }
}

// ── Scenario ────────────────────────────────────────────────────────

/// Everything a successful run created, and how cleanup went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub resource_group: Resource,
    pub web_site: WebSite,
    pub plan: Resource,
    pub autoscale_setting: Resource,
    /// The policy that was submitted.
    pub policy: AutoscaleSetting,
    pub web_app_url: Option<String>,
    pub cleanup: Cleanup,
}

struct Provisioned {
    resource_group: Resource,
    web_site: WebSite,
    plan: Resource,
    autoscale_setting: Resource,
    policy: AutoscaleSetting,
}

/// Run the full provisioning scenario against `plane`.
///
/// The resource group is always deleted before this returns; a failure in
/// any step is returned after cleanup.
pub async fn run<P: ManagementPlane>(
    plane: &P,
    options: &ScenarioOptions,
    policy: &PolicyConfig,
) -> Result<ScenarioReport, CoreError> {
    let rg_name = random_name(&options.resource_group_prefix);

    let scoped = with_resource_group(
        plane,
        &rg_name,
        &options.resource_group_location,
        |group| provision(plane, options, policy, group),
    )
    .await;

    let done = scoped.outcome?;
    let web_app_url = done.web_site.url();
    Ok(ScenarioReport {
        resource_group: done.resource_group,
        web_site: done.web_site,
        plan: done.plan,
        autoscale_setting: done.autoscale_setting,
        policy: done.policy,
        web_app_url,
        cleanup: scoped.cleanup,
    })
}

async fn provision<P: ManagementPlane>(
    plane: &P,
    options: &ScenarioOptions,
    policy: &PolicyConfig,
    group: Resource,
) -> Result<Provisioned, CoreError> {
    let rg = group.name.as_str();

    info!("creating web app");
    let site_name = random_name(&options.web_app_prefix);
    let site_spec = SiteSpec {
        location: options.location.clone(),
        server_farm: None,
    };
    let web_site = plane.create_web_site(rg, &site_name, &site_spec).await?;
    info!(name = %web_site.resource.name, "created web app");

    info!("creating app service plan");
    let plan_name = random_name(&options.plan_prefix);
    let plan = plane
        .create_app_service_plan(rg, &plan_name, &options.plan_spec())
        .await?;
    info!(name = %plan.name, "created app service plan");

    info!("creating autoscale setting");
    let setting_name = random_name(&options.autoscale_prefix);
    let setting = build_autoscale_setting(
        plan.id.as_str(),
        web_site.resource.id.as_str(),
        policy,
    )?;
    let autoscale_setting = plane
        .create_autoscale_setting(rg, &setting_name, &options.location, &setting)
        .await?;
    info!(name = %autoscale_setting.name, "created autoscale setting");

    if let Some(url) = web_site.url() {
        info!(%url, "web app deployed");
    } else {
        warn!(name = %web_site.resource.name, "web app reported no host names");
    }

    Ok(Provisioned {
        resource_group: group,
        web_site,
        plan,
        autoscale_setting,
        policy: setting,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// In-memory plane recording every call; optionally fails one step.
    #[derive(Default)]
    struct RecordingPlane {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
        fail_delete: bool,
        submitted: Mutex<Option<AutoscaleSetting>>,
    }

    impl RecordingPlane {
        fn failing(step: &'static str) -> Self {
            Self {
                fail_on: Some(step),
                ..Self::default()
            }
        }

        fn record(&self, step: &str, name: &str) -> Result<(), CoreError> {
            self.calls.lock().unwrap().push(format!("{step}:{name}"));
            if self.fail_on == Some(step) {
                return Err(CoreError::Api {
                    message: format!("{step} refused"),
                    code: Some("Conflict".into()),
                    status: Some(400),
                });
            }
            Ok(())
        }

        fn steps(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.split(':').next().unwrap().to_owned())
                .collect()
        }

        fn resource(kind: &str, rg: &str, name: &str) -> Resource {
            let id = format!("/subscriptions/s/resourceGroups/{rg}/providers/{kind}/{name}");
            Resource {
                id: ResourceRef::parse("id", &id).unwrap(),
                name: name.into(),
                location: "southcentralus".into(),
            }
        }
    }

    impl ManagementPlane for RecordingPlane {
        async fn create_resource_group(
            &self,
            name: &str,
            location: &str,
        ) -> Result<Resource, CoreError> {
            self.record("rg", name)?;
            Ok(Resource {
                id: ResourceRef::parse("id", &format!("/subscriptions/s/resourceGroups/{name}"))
                    .unwrap(),
                name: name.into(),
                location: location.into(),
            })
        }

        async fn create_web_site(
            &self,
            resource_group: &str,
            name: &str,
            _spec: &SiteSpec,
        ) -> Result<WebSite, CoreError> {
            self.record("site", name)?;
            Ok(WebSite {
                resource: Self::resource("Microsoft.Web/sites", resource_group, name),
                host_names: vec![format!("{}.azurewebsites.net", name.to_lowercase())],
            })
        }

        async fn create_app_service_plan(
            &self,
            resource_group: &str,
            name: &str,
            spec: &PlanSpec,
        ) -> Result<Resource, CoreError> {
            assert_eq!(spec.sku_name, "P1");
            self.record("plan", name)?;
            Ok(Self::resource("Microsoft.Web/serverfarms", resource_group, name))
        }

        async fn create_autoscale_setting(
            &self,
            resource_group: &str,
            name: &str,
            _location: &str,
            setting: &AutoscaleSetting,
        ) -> Result<Resource, CoreError> {
            self.record("autoscale", name)?;
            *self.submitted.lock().unwrap() = Some(setting.clone());
            Ok(Self::resource(
                "Microsoft.Insights/autoscalesettings",
                resource_group,
                name,
            ))
        }

        async fn delete_resource_group(&self, id: &ResourceRef) -> Result<(), CoreError> {
            self.calls.lock().unwrap().push(format!("delete:{id}"));
            if self.fail_delete {
                return Err(CoreError::Timeout);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn full_run_provisions_in_order_and_cleans_up() {
        let plane = RecordingPlane::default();
        let report = run(&plane, &ScenarioOptions::default(), &PolicyConfig::default())
            .await
            .unwrap();

        assert_eq!(plane.steps(), vec!["rg", "site", "plan", "autoscale", "delete"]);
        assert!(report.resource_group.name.starts_with("rgMonitor"));
        assert!(report.web_site.resource.name.starts_with("MyTestScaleWebApp"));
        assert!(report.plan.name.starts_with("MyTestAppServicePlan"));
        assert!(report.autoscale_setting.name.starts_with("autoscalename1"));
        assert_eq!(
            report.cleanup,
            Cleanup::Deleted {
                id: report.resource_group.id.clone()
            }
        );
        assert!(
            report
                .web_app_url
                .as_deref()
                .unwrap()
                .starts_with("https://mytestscalewebapp")
        );

        let submitted = plane.submitted.lock().unwrap().clone().unwrap();
        assert_eq!(submitted.target_resource, report.plan.id);
        let trigger = &submitted.profiles[0].rules[0].metric_trigger;
        assert_eq!(trigger.metric_resource, report.web_site.resource.id);
    }

    #[tokio::test]
    async fn failed_step_still_deletes_the_group() {
        let plane = RecordingPlane::failing("plan");
        let err = run(&plane, &ScenarioOptions::default(), &PolicyConfig::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("plan refused"));
        assert_eq!(plane.steps(), vec!["rg", "site", "plan", "delete"]);
    }

    #[tokio::test]
    async fn invalid_policy_still_deletes_the_group() {
        let plane = RecordingPlane::default();
        let policy = PolicyConfig {
            days: Vec::new(),
            ..PolicyConfig::default()
        };
        let err = run(&plane, &ScenarioOptions::default(), &policy)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert_eq!(plane.steps(), vec!["rg", "site", "plan", "delete"]);
    }

    #[tokio::test]
    async fn nothing_to_delete_when_group_creation_fails() {
        let plane = RecordingPlane::failing("rg");
        let scoped = with_resource_group(&plane, "rg1", "eastus2", |_| async {
            Ok::<_, CoreError>(())
        })
        .await;

        assert!(scoped.outcome.is_err());
        assert_eq!(scoped.cleanup, Cleanup::NotNeeded);
        assert_eq!(plane.steps(), vec!["rg"]);
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let plane = RecordingPlane {
            fail_delete: true,
            ..RecordingPlane::default()
        };
        let scoped = with_resource_group(&plane, "rg1", "eastus2", |group| async move {
            Ok::<_, CoreError>(group.name)
        })
        .await;

        assert_eq!(scoped.outcome.unwrap(), "rg1");
        assert!(matches!(scoped.cleanup, Cleanup::Failed { .. }));
        assert_eq!(plane.steps(), vec!["rg", "delete"]);
    }
}
