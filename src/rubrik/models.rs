use serde::{Deserialize, Serialize};

/// Envelope shared by every paginated list endpoint.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// A list entry as returned by the lookup endpoints. Physical hosts are
/// named by `hostname`, everything else by `name`.
#[derive(Deserialize, Debug, Clone)]
pub struct ObjectEntry {
    pub id: String,
    pub name: Option<String>,
    pub hostname: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutWindowStatus {
    pub is_snappable_blackout_active: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VmSummary {
    pub id: String,
    pub name: String,
    pub configured_sla_domain_id: String,
    pub effective_sla_domain_id: String,
    pub blackout_window_status: BlackoutWindowStatus,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManagedVolumeSummary {
    pub id: String,
    pub name: String,
    pub is_writable: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FilesetSummary {
    pub id: String,
    pub effective_sla_domain_id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
}

/// Returned by every call that queues a job on the cluster.
#[derive(Deserialize, Debug, Clone)]
pub struct AsyncRequestStatus {
    pub id: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl AsyncRequestStatus {
    pub fn first_href(&self) -> Option<&str> {
        self.links.first().map(|l| l.href.as_str())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ClusterInfo {
    pub id: Option<String>,
    pub version: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: Option<String>,
    pub ip_address: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NodeList {
    pub data: Vec<NodeInfo>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignSlaRequest<'a> {
    pub managed_ids: Vec<&'a str>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RetentionConfig<'a> {
    pub sla_id: &'a str,
}

#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EndSnapshotRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_config: Option<RetentionConfig<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotRequest<'a> {
    pub sla_id: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VmPauseUpdate {
    pub is_vm_paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vm_summary_requires_blackout_status() {
        let incomplete = json!({
            "id": "vm-1",
            "name": "vm1",
            "configuredSlaDomainId": "INHERIT",
            "effectiveSlaDomainId": "sla-1"
        });
        assert!(serde_json::from_value::<VmSummary>(incomplete).is_err());
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let body = serde_json::to_value(EndSnapshotRequest {
            retention_config: Some(RetentionConfig { sla_id: "sla-1" }),
        })
        .unwrap();
        assert_eq!(body, json!({ "retentionConfig": { "slaId": "sla-1" } }));

        let empty = serde_json::to_value(EndSnapshotRequest::default()).unwrap();
        assert_eq!(empty, json!({}));

        let pause = serde_json::to_value(VmPauseUpdate { is_vm_paused: true }).unwrap();
        assert_eq!(pause, json!({ "isVmPaused": true }));
    }
}
