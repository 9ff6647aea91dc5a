use super::client::{ApiVersion, RubrikClient, LONG_RUNNING_TIMEOUT};
use super::error::{Result, RubrikError};
use super::models::{
    AsyncRequestStatus, FilesetSummary, ListResponse, SnapshotRequest, VmPauseUpdate,
};
use super::object::{HostOs, ObjectType};
use super::outcome::Transition;
use super::sla::SlaSelector;
use log::info;
use serde_json::Value;
use std::time::Duration;

fn require_named_or_current(sla: &SlaSelector) -> Result<()> {
    if matches!(sla, SlaSelector::DoNotProtect | SlaSelector::Clear) {
        return Err(RubrikError::usage(
            "The 'slaName' must be an SLA Domain name or 'current'",
        ));
    }
    Ok(())
}

fn job_status_url(source: &str, status: AsyncRequestStatus) -> Result<String> {
    status
        .first_href()
        .map(str::to_string)
        .ok_or_else(|| RubrikError::MissingField(source.to_string(), "links[0].href"))
}

impl RubrikClient {
    async fn set_vm_paused(
        &self,
        object_name: &str,
        object_type: ObjectType,
        paused: bool,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        let timeout = self.resolve_timeout(timeout, Some(LONG_RUNNING_TIMEOUT));
        object_type.require_vmware()?;

        let vm_id = self.object_id(object_name, ObjectType::Vmware, None).await?;
        let summary = self.vm_summary(&vm_id, timeout).await?;

        if summary.blackout_window_status.is_snappable_blackout_active == paused {
            let state = if paused {
                "is already paused"
            } else {
                "is currently not paused"
            };
            let msg = format!(
                "No change required. The '{}' '{}' {}.",
                object_name, object_type, state
            );
            info!("{}", msg);
            return Ok(Transition::NoChangeRequired(msg));
        }

        info!(
            "{} snapshots for {} '{}'",
            if paused { "Pausing" } else { "Resuming" },
            object_type,
            object_name
        );
        let resp: Value = self
            .patch(
                ApiVersion::V1,
                &format!("vmware/vm/{}", vm_id),
                &VmPauseUpdate {
                    is_vm_paused: paused,
                },
                timeout,
            )
            .await?;
        Ok(Transition::Applied(resp))
    }

    /// Suspends all snapshot activity for the object.
    pub async fn pause_snapshot(
        &self,
        object_name: &str,
        object_type: ObjectType,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        self.set_vm_paused(object_name, object_type, true, timeout)
            .await
    }

    /// Resumes snapshot activity suspended by
    /// [`pause_snapshot`](Self::pause_snapshot).
    pub async fn resume_snapshot(
        &self,
        object_name: &str,
        object_type: ObjectType,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        self.set_vm_paused(object_name, object_type, false, timeout)
            .await
    }

    /// Takes an on-demand snapshot of a vSphere VM and returns the job status URL.
    pub async fn on_demand_snapshot_vm(
        &self,
        object_name: &str,
        object_type: ObjectType,
        sla: &SlaSelector,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let timeout = self.resolve_timeout(timeout, Some(LONG_RUNNING_TIMEOUT));
        object_type.require_vmware()?;
        require_named_or_current(sla)?;

        let vm_id = self.object_id(object_name, ObjectType::Vmware, None).await?;
        let sla_id = match sla {
            SlaSelector::Current => {
                self.vm_summary(&vm_id, self.default_timeout())
                    .await?
                    .effective_sla_domain_id
            }
            other => self.resolve_sla(other).await?,
        };

        info!(
            "Taking on-demand snapshot of vSphere VM '{}' with SLA {}",
            object_name, sla_id
        );
        let path = format!("vmware/vm/{}/snapshot", vm_id);
        let status: AsyncRequestStatus = self
            .post(
                ApiVersion::V1,
                &path,
                &SnapshotRequest { sla_id: &sla_id },
                timeout,
            )
            .await?;
        job_status_url(&path, status)
    }

    /// Takes an on-demand snapshot of the fileset bound to `host_name` and
    /// `fileset` and returns the job status URL.
    pub async fn on_demand_snapshot_physical(
        &self,
        host_name: &str,
        sla: &SlaSelector,
        fileset: &str,
        host_os: HostOs,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let timeout = self.resolve_timeout(timeout, Some(LONG_RUNNING_TIMEOUT));
        require_named_or_current(sla)?;

        let host_id = self
            .object_id(host_name, ObjectType::PhysicalHost, None)
            .await?;
        let template_id = self
            .object_id(fileset, ObjectType::FilesetTemplate, Some(host_os))
            .await?;

        let filesets: ListResponse<FilesetSummary> = self
            .get(
                ApiVersion::V1,
                "fileset",
                &[
                    ("primary_cluster_id", "local"),
                    ("host_id", host_id.as_str()),
                    ("is_relic", "false"),
                    ("template_id", template_id.as_str()),
                ],
                self.default_timeout(),
            )
            .await?;

        let fileset_summary = match filesets.data.into_iter().next() {
            Some(f) if filesets.total > 0 => f,
            _ => {
                return Err(RubrikError::FilesetNotAssigned {
                    host: host_name.to_string(),
                    fileset: fileset.to_string(),
                })
            }
        };

        let sla_id = match sla {
            SlaSelector::Current => fileset_summary.effective_sla_domain_id,
            other => self.resolve_sla(other).await?,
        };

        info!(
            "Taking on-demand snapshot of fileset '{}' on '{}' with SLA {}",
            fileset, host_name, sla_id
        );
        let path = format!("fileset/{}/snapshot", fileset_summary.id);
        let status: AsyncRequestStatus = self
            .post(
                ApiVersion::V1,
                &path,
                &SnapshotRequest { sla_id: &sla_id },
                timeout,
            )
            .await?;
        job_status_url(&path, status)
    }
}
