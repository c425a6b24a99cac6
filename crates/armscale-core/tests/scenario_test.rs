#![allow(clippy::unwrap_used)]
// End-to-end scenario runs against a mocked Resource Manager.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use armscale_core::{
    Cleanup, CoreError, ManagementConfig, PolicyConfig, PollingSettings, ScenarioOptions,
    ServicePrincipal, connect, run,
};

const TENANT: &str = "tenant-1";
const SUB: &str = "00000000-0000-0000-0000-000000000001";

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer, subscription_id: Option<&str>) -> ManagementConfig {
    let root = Url::parse(&server.uri()).unwrap();
    ManagementConfig {
        resource_manager_url: root.clone(),
        authority_url: root,
        credentials: ServicePrincipal {
            tenant_id: TENANT.into(),
            client_id: "client-1".into(),
            client_secret: SecretString::from("s3cret".to_string()),
        },
        subscription_id: subscription_id.map(Into::into),
        timeout: Duration::from_secs(5),
        polling: PollingSettings {
            interval: Duration::from_millis(5),
            max_interval: Duration::from_millis(20),
            max_attempts: 5,
        },
    }
}

/// Answer a PUT with the resource the path names.
fn echo_resource(req: &Request) -> ResponseTemplate {
    let id = req.url.path().to_owned();
    let name = id.rsplit('/').next().unwrap().to_owned();
    let mut body = json!({ "id": id, "name": name, "location": "southcentralus" });

    if id.contains("/Microsoft.Web/sites/") {
        body["properties"] = json!({ "hostNames": [format!("{}.azurewebsites.net", name.to_lowercase())] });
    } else if id.contains("/autoscalesettings/") {
        let sent: Value = req.body_json().unwrap();
        body["properties"] = sent["properties"].clone();
    }
    ResponseTemplate::new(201).set_body_json(body)
}

async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "test-token"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": format!("/subscriptions/{SUB}"),
                "subscriptionId": SUB,
                "state": "Enabled"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(format!(r"^/subscriptions/{SUB}/resourcegroups/rgMonitor[0-9a-f]{{8}}$")))
        .respond_with(echo_resource)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"/providers/Microsoft\.Web/sites/MyTestScaleWebApp[0-9a-f]{8}$"))
        .respond_with(echo_resource)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"/providers/Microsoft\.Web/serverfarms/MyTestAppServicePlan[0-9a-f]{8}$"))
        .respond_with(echo_resource)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(
            r"/providers/Microsoft\.Insights/autoscalesettings/autoscalename1[0-9a-f]{8}$",
        ))
        .respond_with(echo_resource)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/subscriptions/.+/resourcegroups/rgMonitor[0-9a-f]{8}$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

// ── Scenario ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scenario_runs_against_resource_manager() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let session = connect(&config_for(&server, None)).await.unwrap();
    assert_eq!(session.subscription_id(), SUB);

    let report = run(&session, &ScenarioOptions::default(), &PolicyConfig::default())
        .await
        .unwrap();

    assert!(matches!(report.cleanup, Cleanup::Deleted { .. }));
    assert!(report.plan.id.as_str().contains("/serverfarms/MyTestAppServicePlan"));
    assert!(
        report
            .web_app_url
            .unwrap()
            .starts_with("https://mytestscalewebapp")
    );

    let requests = server.received_requests().await.unwrap();
    let autoscale = requests
        .iter()
        .find(|r| r.url.path().contains("/autoscalesettings/"))
        .unwrap();
    let body: Value = autoscale.body_json().unwrap();
    assert_eq!(body["location"], "southcentralus");
    assert_eq!(body["properties"]["targetResourceUri"], report.plan.id.as_str());
    assert_eq!(body["properties"]["profiles"].as_array().unwrap().len(), 3);
    assert_eq!(
        body["properties"]["profiles"][0]["rules"][0]["metricTrigger"]["metricResourceUri"],
        report.web_site.resource.id.as_str()
    );

    let plan = requests
        .iter()
        .find(|r| r.url.path().contains("/serverfarms/"))
        .unwrap();
    let body: Value = plan.body_json().unwrap();
    assert_eq!(
        body["sku"],
        json!({ "name": "P1", "tier": "Premium", "capacity": 1 })
    );
    assert_eq!(body["kind"], "app");
}

#[tokio::test]
async fn test_failed_step_deletes_resource_group() {
    let server = MockServer::start().await;

    // Mounted first so it wins over the happy-path site mock.
    Mock::given(method("PUT"))
        .and(path_regex(r"/providers/Microsoft\.Web/sites/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "code": "Conflict", "message": "Website with given name already exists." }
        })))
        .mount(&server)
        .await;
    mount_happy_path(&server).await;

    let session = connect(&config_for(&server, Some(SUB))).await.unwrap();
    let err = run(&session, &ScenarioOptions::default(), &PolicyConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Conflict { .. }));
    // The DELETE mock's `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn test_bad_secret_fails_before_anything_is_created() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = connect(&config_for(&server, Some(SUB))).await.unwrap();
    let err = run(&session, &ScenarioOptions::default(), &PolicyConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
}
