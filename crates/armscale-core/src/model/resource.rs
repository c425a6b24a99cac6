// ── Resource references and provisioned resource handles ──

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated reference to a remote resource (normally a full ARM id).
///
/// Non-empty, with no whitespace or control characters. Any such string is
/// accepted, so tests and offline rendering can use short names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Validate `raw`, naming `field` in the error.
    pub fn parse(field: &str, raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::invalid(field, "must not be empty"));
        }
        if let Some(bad) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::invalid(
                field,
                format!("contains disallowed character {bad:?}"),
            ));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment: the resource name for an ARM id.
    pub fn name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ResourceRef {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse("resource", &value)
    }
}

impl From<ResourceRef> for String {
    fn from(value: ResourceRef) -> Self {
        value.0
    }
}

/// Something the management plane created for us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceRef,
    pub name: String,
    pub location: String,
}

/// A web site plus the host names it answers on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSite {
    pub resource: Resource,
    pub host_names: Vec<String>,
}

impl WebSite {
    /// `https://{first host name}/`, if the site reported any.
    pub fn url(&self) -> Option<String> {
        self.host_names.first().map(|host| format!("https://{host}/"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(matches!(
            ResourceRef::parse("target", ""),
            Err(CoreError::InvalidArgument { ref field, .. }) if field == "target"
        ));
        assert!(ResourceRef::parse("target", "   ").is_err());
        assert!(ResourceRef::parse("target", "plan A").is_err());
        assert!(ResourceRef::parse("target", "plan\u{0}").is_err());
    }

    #[test]
    fn name_is_last_segment() {
        let id = ResourceRef::parse(
            "target",
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/serverfarms/plan1",
        )
        .unwrap();
        assert_eq!(id.name(), "plan1");

        let short = ResourceRef::parse("target", "plan-A").unwrap();
        assert_eq!(short.name(), "plan-A");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<ResourceRef, _> = serde_json::from_str("\"site-B\"");
        assert!(ok.is_ok());
        let bad: Result<ResourceRef, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn site_url_uses_first_host() {
        let site = WebSite {
            resource: Resource {
                id: ResourceRef::parse("id", "site-B").unwrap(),
                name: "site-B".into(),
                location: "southcentralus".into(),
            },
            host_names: vec!["a.azurewebsites.net".into(), "b.example.com".into()],
        };
        assert_eq!(site.url().as_deref(), Some("https://a.azurewebsites.net/"));
    }
}
