// ── Management plane seam ──
//
// The handful of create/delete operations the scenario consumes, each a
// single future that resolves once the remote operation has finished.
// `ArmSession` is the real implementation over `armscale_api::ArmClient`;
// tests substitute an in-memory recorder.

use std::collections::HashMap;
use std::future::Future;

use armscale_api::types::{
    AppServicePlanCreate, AutoscaleSettingCreate, ResourceGroupCreate, SiteCreate,
    SiteCreateProperties, SkuDescription,
};
use armscale_api::{ArmClient, ClientSecretCredential, TransportConfig};
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::config::ManagementConfig;
use crate::error::CoreError;
use crate::model::{AutoscaleSetting, Resource, ResourceRef, WebSite};

/// What to create for a web site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSpec {
    pub location: String,
    /// Plan to host the site on; the service picks one when absent.
    pub server_farm: Option<ResourceRef>,
}

/// What to create for an app service plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSpec {
    pub location: String,
    pub sku_name: String,
    pub sku_tier: String,
    pub capacity: u32,
    pub kind: String,
}

/// Operations the provisioning scenario needs from the management plane.
///
/// Every method resolves only after the remote long-running operation has
/// reached a terminal state.
pub trait ManagementPlane: Send + Sync {
    fn create_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> impl Future<Output = Result<Resource, CoreError>> + Send;

    fn create_web_site(
        &self,
        resource_group: &str,
        name: &str,
        spec: &SiteSpec,
    ) -> impl Future<Output = Result<WebSite, CoreError>> + Send;

    fn create_app_service_plan(
        &self,
        resource_group: &str,
        name: &str,
        spec: &PlanSpec,
    ) -> impl Future<Output = Result<Resource, CoreError>> + Send;

    fn create_autoscale_setting(
        &self,
        resource_group: &str,
        name: &str,
        location: &str,
        setting: &AutoscaleSetting,
    ) -> impl Future<Output = Result<Resource, CoreError>> + Send;

    /// Delete a resource group and everything in it.
    fn delete_resource_group(
        &self,
        id: &ResourceRef,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── ARM-backed implementation ───────────────────────────────────────

/// An authenticated client bound to one subscription.
pub struct ArmSession {
    client: ArmClient,
    subscription_id: String,
}

impl ArmSession {
    pub fn new(client: ArmClient, subscription_id: impl Into<String>) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }
}

/// Build an authenticated session from `config`.
///
/// Uses the configured subscription, or asks the management plane for the
/// principal's default one. Authentication happens lazily, so a bad
/// secret surfaces on the first request.
pub async fn connect(config: &ManagementConfig) -> Result<ArmSession, CoreError> {
    let transport = TransportConfig::default().with_timeout(config.timeout);
    let http = transport.build_client()?;

    let creds = &config.credentials;
    let credential = ClientSecretCredential::new(
        creds.tenant_id.clone(),
        creds.client_id.clone(),
        creds.client_secret.expose_secret().into(),
        config.authority_url.as_str(),
        http.clone(),
    )?;

    let client = ArmClient::with_client(
        config.resource_manager_url.as_str(),
        http,
        credential,
        config.polling.into(),
    )?;

    let configured = config
        .subscription_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let subscription_id = if let Some(id) = configured {
        id.to_owned()
    } else {
        debug!("no subscription configured, resolving the default");
        client.default_subscription().await?.subscription_id
    };

    info!(subscription = %subscription_id, url = %client.base_url(), "connected to resource manager");
    Ok(ArmSession::new(client, subscription_id))
}

impl ManagementPlane for ArmSession {
    async fn create_resource_group(&self, name: &str, location: &str) -> Result<Resource, CoreError> {
        let body = ResourceGroupCreate {
            location: location.to_owned(),
            tags: HashMap::new(),
        };
        let rg = self
            .client
            .create_or_update_resource_group(&self.subscription_id, name, &body)
            .await?;
        Resource::try_from(rg)
    }

    async fn create_web_site(
        &self,
        resource_group: &str,
        name: &str,
        spec: &SiteSpec,
    ) -> Result<WebSite, CoreError> {
        let body = SiteCreate {
            location: spec.location.clone(),
            kind: None,
            properties: SiteCreateProperties {
                server_farm_id: spec.server_farm.as_ref().map(ToString::to_string),
                https_only: None,
            },
        };
        let site = self
            .client
            .create_or_update_web_site(&self.subscription_id, resource_group, name, &body)
            .await?;
        WebSite::try_from(site)
    }

    async fn create_app_service_plan(
        &self,
        resource_group: &str,
        name: &str,
        spec: &PlanSpec,
    ) -> Result<Resource, CoreError> {
        let body = AppServicePlanCreate {
            location: spec.location.clone(),
            kind: Some(spec.kind.clone()),
            sku: SkuDescription {
                name: spec.sku_name.clone(),
                tier: Some(spec.sku_tier.clone()),
                capacity: Some(spec.capacity),
            },
        };
        let plan = self
            .client
            .create_or_update_app_service_plan(&self.subscription_id, resource_group, name, &body)
            .await?;
        Resource::try_from(plan)
    }

    async fn create_autoscale_setting(
        &self,
        resource_group: &str,
        name: &str,
        location: &str,
        setting: &AutoscaleSetting,
    ) -> Result<Resource, CoreError> {
        let body = AutoscaleSettingCreate {
            location: location.to_owned(),
            tags: HashMap::new(),
            properties: setting.into(),
        };
        let created = self
            .client
            .create_or_update_autoscale_setting(&self.subscription_id, resource_group, name, &body)
            .await?;
        Resource::try_from(created)
    }

    async fn delete_resource_group(&self, id: &ResourceRef) -> Result<(), CoreError> {
        self.client.delete_resource_group(id.as_str()).await?;
        Ok(())
    }
}
