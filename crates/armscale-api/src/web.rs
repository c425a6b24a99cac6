// App Service endpoints: web sites and server farms (app service plans).
//
// Both are scoped to a resource group:
// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Web/{type}/{name}`.

use crate::client::ArmClient;
use crate::error::Error;
use crate::types::{AppServicePlan, AppServicePlanCreate, Site, SiteCreate};

const WEB_API_VERSION: &str = "2022-03-01";

fn web_path(subscription_id: &str, resource_group: &str, kind: &str, name: &str) -> String {
    format!(
        "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Web/{kind}/{name}"
    )
}

impl ArmClient {
    /// Create or update a web site.
    ///
    /// `PUT .../providers/Microsoft.Web/sites/{name}`
    pub async fn create_or_update_web_site(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
        body: &SiteCreate,
    ) -> Result<Site, Error> {
        let path = web_path(subscription_id, resource_group, "sites", name);
        self.put_resource(&path, WEB_API_VERSION, body).await
    }

    /// Create or update an app service plan.
    ///
    /// `PUT .../providers/Microsoft.Web/serverfarms/{name}`
    pub async fn create_or_update_app_service_plan(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
        body: &AppServicePlanCreate,
    ) -> Result<AppServicePlan, Error> {
        let path = web_path(subscription_id, resource_group, "serverfarms", name);
        self.put_resource(&path, WEB_API_VERSION, body).await
    }
}
