use super::client::{ApiVersion, RubrikClient};
use super::error::{Result, RubrikError};
use super::models::{AssignSlaRequest, ListResponse, ObjectEntry, VmSummary};
use super::object::ObjectType;
use super::outcome::Transition;
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub const UNPROTECTED_SLA_ID: &str = "UNPROTECTED";
pub const INHERIT_SLA_ID: &str = "INHERIT";

/// How a caller names the SLA Domain an operation should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlaSelector {
    Named(String),
    /// Exclude the object from every SLA Domain.
    DoNotProtect,
    /// Inherit the SLA Domain of the parent object.
    Clear,
    /// Keep whatever SLA Domain the object already uses.
    Current,
}

impl SlaSelector {
    pub fn parse(s: &str) -> Self {
        match s {
            "do not protect" => SlaSelector::DoNotProtect,
            "clear" => SlaSelector::Clear,
            "current" => SlaSelector::Current,
            name => SlaSelector::Named(name.to_string()),
        }
    }
}

impl From<&str> for SlaSelector {
    fn from(s: &str) -> Self {
        SlaSelector::parse(s)
    }
}

impl fmt::Display for SlaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaSelector::Named(name) => f.write_str(name),
            SlaSelector::DoNotProtect => f.write_str("do not protect"),
            SlaSelector::Clear => f.write_str("clear"),
            SlaSelector::Current => f.write_str("current"),
        }
    }
}

impl RubrikClient {
    /// Maps a selector to the id the API expects. `Current` depends on the
    /// object being operated on and is handled by each caller.
    pub async fn resolve_sla(&self, sla: &SlaSelector) -> Result<String> {
        match sla {
            SlaSelector::DoNotProtect => Ok(UNPROTECTED_SLA_ID.to_string()),
            SlaSelector::Clear => Ok(INHERIT_SLA_ID.to_string()),
            SlaSelector::Named(name) => self.object_id(name, ObjectType::Sla, None).await,
            SlaSelector::Current => Err(RubrikError::usage(
                "'current' cannot be resolved without an object",
            )),
        }
    }

    pub(crate) async fn vm_summary(&self, vm_id: &str, timeout: Duration) -> Result<VmSummary> {
        self.get(ApiVersion::V1, &format!("vmware/vm/{}", vm_id), &[], timeout)
            .await
    }

    /// Assigns `object_name` to an SLA Domain. `DoNotProtect` and `Clear`
    /// are accepted alongside a named SLA.
    pub async fn assign_sla(
        &self,
        object_name: &str,
        object_type: ObjectType,
        sla: &SlaSelector,
        timeout: Option<Duration>,
    ) -> Result<Transition> {
        let timeout = self.resolve_timeout(timeout, None);
        object_type.require_vmware()?;
        if *sla == SlaSelector::Current {
            return Err(RubrikError::usage(
                "The 'slaName' must be an SLA Domain name, 'do not protect', or 'clear'",
            ));
        }

        let sla_id = self.resolve_sla(sla).await?;
        let vm_id = self.object_id(object_name, ObjectType::Vmware, None).await?;
        let summary = self.vm_summary(&vm_id, timeout).await?;

        let current_sla_id = if sla_id == INHERIT_SLA_ID {
            &summary.configured_sla_domain_id
        } else {
            &summary.effective_sla_domain_id
        };

        if *current_sla_id == sla_id {
            let msg = format!(
                "No change required. The vSphere VM '{}' is already assigned to the '{}' SLA Domain.",
                object_name, sla
            );
            info!("{}", msg);
            return Ok(Transition::NoChangeRequired(msg));
        }

        info!("Assigning vSphere VM '{}' to SLA Domain '{}'", object_name, sla);
        let body = AssignSlaRequest {
            managed_ids: vec![vm_id.as_str()],
        };
        let resp: Value = self
            .post(
                ApiVersion::Internal,
                &format!("sla_domain/{}/assign", sla_id),
                &body,
                timeout,
            )
            .await?;
        Ok(Transition::Applied(resp))
    }

    /// Name -> ids of every object of `object_type` protected by `sla_name`.
    /// Names are not unique, so each maps to every matching id. An empty map
    /// means the SLA Domain protects nothing of that type.
    pub async fn get_sla_objects(
        &self,
        sla_name: &str,
        object_type: ObjectType,
        timeout: Option<Duration>,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let timeout = self.resolve_timeout(timeout, None);
        object_type.require_vmware()?;

        let sla_id = self.object_id(sla_name, ObjectType::Sla, None).await?;
        let vms: ListResponse<ObjectEntry> = self
            .get(
                ApiVersion::V1,
                "vmware/vm",
                &[
                    ("effective_sla_domain_id", sla_id.as_str()),
                    ("is_relic", "false"),
                ],
                timeout,
            )
            .await?;

        if vms.total == 0 {
            info!(
                "The SLA '{}' is currently not protecting any {} objects.",
                sla_name, object_type
            );
        }

        let mut objects: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for vm in vms.data {
            if let Some(name) = vm.name {
                objects.entry(name).or_default().push(vm.id);
            }
        }
        for (name, ids) in objects.iter().filter(|(_, ids)| ids.len() > 1) {
            warn!(
                "{} {} objects named '{}' are protected by SLA '{}'",
                ids.len(),
                object_type,
                name,
                sla_name
            );
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_literals() {
        assert_eq!(SlaSelector::parse("do not protect"), SlaSelector::DoNotProtect);
        assert_eq!(SlaSelector::parse("clear"), SlaSelector::Clear);
        assert_eq!(SlaSelector::parse("current"), SlaSelector::Current);
        assert_eq!(
            SlaSelector::parse("Gold"),
            SlaSelector::Named("Gold".to_string())
        );
        // Literal matching is exact.
        assert_eq!(
            SlaSelector::parse("Clear"),
            SlaSelector::Named("Clear".to_string())
        );
    }

    #[test]
    fn test_selector_display_round_trips_literal() {
        assert_eq!(SlaSelector::DoNotProtect.to_string(), "do not protect");
        assert_eq!(SlaSelector::from("Gold").to_string(), "Gold");
    }
}
