use super::client::{ApiVersion, RubrikClient};
use super::error::Result;
use super::models::{ClusterInfo, NodeList};

impl RubrikClient {
    /// CDM software version running on the cluster.
    pub async fn cluster_version(&self) -> Result<String> {
        let info: ClusterInfo = self
            .get(ApiVersion::V1, "cluster/me", &[], self.default_timeout())
            .await?;
        Ok(info.version)
    }

    pub async fn cluster_node_ip(&self) -> Result<Vec<String>> {
        let nodes: NodeList = self
            .get(
                ApiVersion::Internal,
                "cluster/me/node",
                &[],
                self.default_timeout(),
            )
            .await?;
        Ok(nodes.data.into_iter().map(|n| n.ip_address).collect())
    }
}
