// Azure Monitor autoscale setting endpoints.
//
// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Insights/autoscalesettings/{name}`

use tracing::debug;

use crate::client::ArmClient;
use crate::error::Error;
use crate::types::{AutoscaleSettingCreate, AutoscaleSettingResource};

const AUTOSCALE_API_VERSION: &str = "2022-10-01";

fn autoscale_path(subscription_id: &str, resource_group: &str, name: &str) -> String {
    format!(
        "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Insights/autoscalesettings/{name}"
    )
}

impl ArmClient {
    /// Create or update an autoscale setting.
    ///
    /// `PUT .../providers/Microsoft.Insights/autoscalesettings/{name}`
    pub async fn create_or_update_autoscale_setting(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
        body: &AutoscaleSettingCreate,
    ) -> Result<AutoscaleSettingResource, Error> {
        debug!(
            profiles = body.properties.profiles.len(),
            target = %body.properties.target_resource_uri,
            "submitting autoscale setting"
        );
        let path = autoscale_path(subscription_id, resource_group, name);
        self.put_resource(&path, AUTOSCALE_API_VERSION, body).await
    }
}
