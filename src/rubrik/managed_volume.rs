use super::client::{ApiVersion, RubrikClient};
use super::error::{Result, RubrikError};
use super::models::{EndSnapshotRequest, ManagedVolumeSummary, RetentionConfig};
use super::object::ObjectType;
use super::outcome::Transition;
use super::sla::SlaSelector;
use log::info;
use serde_json::{json, Value};
use std::time::Duration;

impl RubrikClient {
    async fn managed_volume_summary(
        &self,
        name: &str,
        timeout: Duration,
    ) -> Result<ManagedVolumeSummary> {
        let id = self.object_id(name, ObjectType::ManagedVolume, None).await?;
        self.get(
            ApiVersion::Internal,
            &format!("managed_volume/{}", id),
            &[],
            timeout,
        )
        .await
    }

    /// Opens a managed volume for writes. Everything written until the
    /// snapshot is ended becomes part of that snapshot.
    pub async fn begin_managed_volume_snapshot(
        &self,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        let timeout = self.resolve_timeout(timeout, None);
        let summary = self.managed_volume_summary(name, timeout).await?;

        if summary.is_writable {
            let msg = format!(
                "No change required. The Managed Volume '{}' is already in a writeable state.",
                name
            );
            info!("{}", msg);
            return Ok(Transition::NoChangeRequired(msg));
        }

        info!("Beginning snapshot of Managed Volume '{}'", name);
        let resp: Value = self
            .post(
                ApiVersion::Internal,
                &format!("managed_volume/{}/begin_snapshot", summary.id),
                &json!({}),
                timeout,
            )
            .await?;
        Ok(Transition::Applied(resp))
    }

    /// Closes a managed volume for writes, producing a snapshot of
    /// everything written since the matching begin. `Current` keeps the
    /// volume's existing retention.
    pub async fn end_managed_volume_snapshot(
        &self,
        name: &str,
        sla: &SlaSelector,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        let timeout = self.resolve_timeout(timeout, None);
        if matches!(sla, SlaSelector::DoNotProtect | SlaSelector::Clear) {
            return Err(RubrikError::usage(
                "The 'slaName' must be an SLA Domain name or 'current'",
            ));
        }

        let summary = self.managed_volume_summary(name, timeout).await?;

        if !summary.is_writable {
            let msg = format!(
                "No change required. The Managed Volume '{}' is already in a read-only state.",
                name
            );
            info!("{}", msg);
            return Ok(Transition::NoChangeRequired(msg));
        }

        let sla_id = match sla {
            SlaSelector::Current => None,
            other => Some(self.resolve_sla(other).await?),
        };
        let body = EndSnapshotRequest {
            retention_config: sla_id
                .as_deref()
                .map(|sla_id| RetentionConfig { sla_id }),
        };

        info!("Ending snapshot of Managed Volume '{}'", name);
        let resp: Value = self
            .post(
                ApiVersion::Internal,
                &format!("managed_volume/{}/end_snapshot", summary.id),
                &body,
                timeout,
            )
            .await?;
        Ok(Transition::Applied(resp))
    }
}
