// Subscription and resource group endpoints.
//
// Resource groups live directly under a subscription:
// `/subscriptions/{sub}/resourcegroups/{name}`.

use tracing::debug;

use crate::client::ArmClient;
use crate::error::Error;
use crate::types::{Page, ResourceGroup, ResourceGroupCreate, Subscription};

const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";
const RESOURCES_API_VERSION: &str = "2022-09-01";

impl ArmClient {
    /// List every subscription visible to the principal, following `nextLink`.
    ///
    /// `GET /subscriptions`
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, Error> {
        let mut page: Page<Subscription> =
            self.get("/subscriptions", SUBSCRIPTIONS_API_VERSION).await?;
        let mut all = std::mem::take(&mut page.value);

        while let Some(next) = page.next_link.take() {
            page = self.get_url(url::Url::parse(&next)?).await?;
            all.append(&mut page.value);
        }

        debug!(count = all.len(), "listed subscriptions");
        Ok(all)
    }

    /// The subscription the principal lands in by default: the first
    /// enabled one, else the first one listed.
    pub async fn default_subscription(&self) -> Result<Subscription, Error> {
        let subs = self.list_subscriptions().await?;
        let chosen = subs
            .iter()
            .position(|s| s.state.as_deref() == Some("Enabled"))
            .unwrap_or(0);
        subs.into_iter()
            .nth(chosen)
            .ok_or_else(|| Error::Authentication {
                message: "no subscriptions are visible to this principal".into(),
            })
    }

    /// Create or update a resource group.
    ///
    /// `PUT /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn create_or_update_resource_group(
        &self,
        subscription_id: &str,
        name: &str,
        body: &ResourceGroupCreate,
    ) -> Result<ResourceGroup, Error> {
        let path = format!("/subscriptions/{subscription_id}/resourcegroups/{name}");
        self.put_resource(&path, RESOURCES_API_VERSION, body).await
    }

    /// Fetch a resource group.
    ///
    /// `GET /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn get_resource_group(
        &self,
        subscription_id: &str,
        name: &str,
    ) -> Result<ResourceGroup, Error> {
        let path = format!("/subscriptions/{subscription_id}/resourcegroups/{name}");
        self.get(&path, RESOURCES_API_VERSION).await
    }

    /// Delete a resource group and everything in it, given its full ARM id.
    ///
    /// `DELETE {id}`. ARM answers 202 and the deletion is polled to completion.
    pub async fn delete_resource_group(&self, resource_group_id: &str) -> Result<(), Error> {
        self.delete_resource(resource_group_id, RESOURCES_API_VERSION)
            .await
    }
}
