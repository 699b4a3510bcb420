use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Secret, Service};

use crate::crd::KeycloakBackup;

/// Ordered actions produced by diffing desired against observed state.
/// Position encodes execution dependency.
pub type DesiredClusterState = Vec<ResourceAction>;

/// Body of a resource the operator manages.
#[derive(Clone, Debug, PartialEq)]
pub enum ManagedResource {
    StatefulSet(StatefulSet),
    Deployment(Deployment),
    Service(Service),
    Secret(Secret),
    KeycloakBackup(KeycloakBackup),
    Other {
        api_version: String,
        kind: String,
        manifest: serde_json::Value,
    },
}

impl ManagedResource {
    pub fn kind(&self) -> &str {
        match self {
            ManagedResource::StatefulSet(_) => "StatefulSet",
            ManagedResource::Deployment(_) => "Deployment",
            ManagedResource::Service(_) => "Service",
            ManagedResource::Secret(_) => "Secret",
            ManagedResource::KeycloakBackup(_) => "KeycloakBackup",
            ManagedResource::Other { kind, .. } => kind.as_str(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ManagedResource::StatefulSet(o) => o.metadata.name.as_deref(),
            ManagedResource::Deployment(o) => o.metadata.name.as_deref(),
            ManagedResource::Service(o) => o.metadata.name.as_deref(),
            ManagedResource::Secret(o) => o.metadata.name.as_deref(),
            ManagedResource::KeycloakBackup(o) => o.metadata.name.as_deref(),
            ManagedResource::Other { manifest, .. } => manifest
                .get("metadata")
                .and_then(|m| m.get("name"))
                .and_then(|n| n.as_str()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            ManagedResource::StatefulSet(o) => o.metadata.namespace.as_deref(),
            ManagedResource::Deployment(o) => o.metadata.namespace.as_deref(),
            ManagedResource::Service(o) => o.metadata.namespace.as_deref(),
            ManagedResource::Secret(o) => o.metadata.namespace.as_deref(),
            ManagedResource::KeycloakBackup(o) => {
                o.metadata.namespace.as_deref()
            }
            ManagedResource::Other { manifest, .. } => manifest
                .get("metadata")
                .and_then(|m| m.get("namespace"))
                .and_then(|n| n.as_str()),
        }
    }

    pub fn as_stateful_set(&self) -> Option<&StatefulSet> {
        match self {
            ManagedResource::StatefulSet(sts) => Some(sts),
            _ => None,
        }
    }

    pub fn as_stateful_set_mut(&mut self) -> Option<&mut StatefulSet> {
        match self {
            ManagedResource::StatefulSet(sts) => Some(sts),
            _ => None,
        }
    }

    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: self.kind().to_string(),
            name: self.name().unwrap_or_default().to_string(),
            namespace: self.namespace().map(str::to_string),
        }
    }
}

/// Identity of a resource scheduled for deletion.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionVerb::Create => write!(f, "create"),
            ActionVerb::Update => write!(f, "update"),
            ActionVerb::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResourceAction {
    Create(ManagedResource),
    Update(ManagedResource),
    Delete(ResourceRef),
}

impl ResourceAction {
    pub fn verb(&self) -> ActionVerb {
        match self {
            ResourceAction::Create(_) => ActionVerb::Create,
            ResourceAction::Update(_) => ActionVerb::Update,
            ResourceAction::Delete(_) => ActionVerb::Delete,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            ResourceAction::Create(r) | ResourceAction::Update(r) => r.kind(),
            ResourceAction::Delete(r) => r.kind.as_str(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ResourceAction::Create(r) | ResourceAction::Update(r) => r.name(),
            ResourceAction::Delete(r) => Some(r.name.as_str()),
        }
    }

    pub fn resource(&self) -> Option<&ManagedResource> {
        match self {
            ResourceAction::Create(r) | ResourceAction::Update(r) => Some(r),
            ResourceAction::Delete(_) => None,
        }
    }

    /// `verb kind/name`, used in log lines.
    pub fn describe(&self) -> String {
        format!(
            "{} {}/{}",
            self.verb(),
            self.kind(),
            self.name().unwrap_or("<unnamed>")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn svc(name: &str) -> ManagedResource {
        ManagedResource::Service(Service {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some("ns".into()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn describe_names_verb_kind_and_name() {
        assert_eq!(
            ResourceAction::Update(svc("keycloak")).describe(),
            "update Service/keycloak"
        );
        let other = ManagedResource::Other {
            api_version: "route.openshift.io/v1".into(),
            kind: "Route".into(),
            manifest: serde_json::json!({"metadata": {"name": "kc-route"}}),
        };
        assert_eq!(
            ResourceAction::Create(other).describe(),
            "create Route/kc-route"
        );
        let del = ResourceAction::Delete(svc("old").to_ref());
        assert_eq!(del.describe(), "delete Service/old");
        assert_eq!(del.verb(), ActionVerb::Delete);
        assert!(del.resource().is_none());
    }

    #[test]
    fn to_ref_keeps_namespace() {
        let r = svc("keycloak").to_ref();
        assert_eq!(
            r,
            ResourceRef {
                kind: "Service".into(),
                name: "keycloak".into(),
                namespace: Some("ns".into()),
            }
        );
    }
}
