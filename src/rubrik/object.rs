use super::client::{ApiVersion, RubrikClient};
use super::error::{Result, RubrikError};
use super::models::{ListResponse, ObjectEntry};
use log::{debug, info, warn};
use std::fmt;
use std::str::FromStr;

/// Kinds of object that can be looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Vmware,
    Sla,
    VmwareHost,
    PhysicalHost,
    FilesetTemplate,
    ManagedVolume,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Vmware => "vmware",
            ObjectType::Sla => "sla",
            ObjectType::VmwareHost => "vmwareHost",
            ObjectType::PhysicalHost => "physicalHost",
            ObjectType::FilesetTemplate => "filesetTemplate",
            ObjectType::ManagedVolume => "managedVolume",
        }
    }

    /// Only vSphere VMs can be assigned, paused or snapshotted by name.
    pub(crate) fn require_vmware(self) -> Result<()> {
        if self != ObjectType::Vmware {
            return Err(RubrikError::usage("The 'objectType' must be 'vmware'"));
        }
        Ok(())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = RubrikError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vmware" => Ok(ObjectType::Vmware),
            "sla" => Ok(ObjectType::Sla),
            "vmwareHost" => Ok(ObjectType::VmwareHost),
            "physicalHost" => Ok(ObjectType::PhysicalHost),
            "filesetTemplate" => Ok(ObjectType::FilesetTemplate),
            "managedVolume" => Ok(ObjectType::ManagedVolume),
            _ => Err(RubrikError::usage(
                "The 'objectType' must be 'vmware', 'sla', 'vmwareHost', 'physicalHost', 'filesetTemplate', or 'managedVolume'",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    Windows,
}

impl HostOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Linux => "Linux",
            HostOs::Windows => "Windows",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostOs {
    type Err = RubrikError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Linux" => Ok(HostOs::Linux),
            "Windows" => Ok(HostOs::Windows),
            _ => Err(RubrikError::usage(
                "The hostOS must be either 'Linux' or 'Windows'",
            )),
        }
    }
}

/// List endpoint and filters for one lookup.
struct LookupQuery<'a> {
    version: ApiVersion,
    path: &'static str,
    params: Vec<(&'static str, &'a str)>,
}

fn lookup_query<'a>(
    object_type: ObjectType,
    name: &'a str,
    host_os: Option<HostOs>,
) -> Result<LookupQuery<'a>> {
    let query = match object_type {
        ObjectType::Vmware => LookupQuery {
            version: ApiVersion::V1,
            path: "vmware/vm",
            params: vec![
                ("primary_cluster_id", "local"),
                ("is_relic", "false"),
                ("name", name),
            ],
        },
        ObjectType::Sla => LookupQuery {
            version: ApiVersion::V1,
            path: "sla_domain",
            params: vec![("primary_cluster_id", "local"), ("name", name)],
        },
        // The host endpoint has no name filter, matching happens below.
        ObjectType::VmwareHost => LookupQuery {
            version: ApiVersion::V1,
            path: "vmware/host",
            params: vec![("primary_cluster_id", "local")],
        },
        ObjectType::PhysicalHost => LookupQuery {
            version: ApiVersion::V1,
            path: "host",
            params: vec![("primary_cluster_id", "local"), ("hostname", name)],
        },
        ObjectType::FilesetTemplate => {
            let os = host_os.ok_or_else(|| {
                RubrikError::usage("You must provide the Fileset Template OS type")
            })?;
            LookupQuery {
                version: ApiVersion::V1,
                path: "fileset_template",
                params: vec![
                    ("primary_cluster_id", "local"),
                    ("operating_system_type", os.as_str()),
                    ("name", name),
                ],
            }
        }
        ObjectType::ManagedVolume => LookupQuery {
            version: ApiVersion::Internal,
            path: "managed_volume",
            params: vec![
                ("is_relic", "false"),
                ("primary_cluster_id", "local"),
                ("name", name),
            ],
        },
    };
    Ok(query)
}

/// Narrows the candidates to exact name matches and insists on exactly one.
fn select_unique(
    object_type: ObjectType,
    name: &str,
    candidates: ListResponse<ObjectEntry>,
) -> Result<String> {
    let not_found = || RubrikError::NotFound {
        object_type: object_type.to_string(),
        name: name.to_string(),
    };

    if candidates.total == 0 {
        return Err(not_found());
    }

    let mut ids: Vec<String> = candidates
        .data
        .into_iter()
        .filter(|entry| {
            let field = match object_type {
                ObjectType::PhysicalHost => entry.hostname.as_deref(),
                _ => entry.name.as_deref(),
            };
            field == Some(name)
        })
        .map(|entry| entry.id)
        .collect();

    match ids.len() {
        0 => Err(not_found()),
        1 => Ok(ids.remove(0)),
        _ => Err(RubrikError::Ambiguous {
            object_type: object_type.to_string(),
            name: name.to_string(),
        }),
    }
}

impl RubrikClient {
    /// Looks up the unique id of `name`. Fileset templates also need the
    /// operating system they were written for.
    pub async fn object_id(
        &self,
        name: &str,
        object_type: ObjectType,
        host_os: Option<HostOs>,
    ) -> Result<String> {
        let query = lookup_query(object_type, name, host_os)?;
        let candidates: ListResponse<ObjectEntry> = self
            .get(
                query.version,
                query.path,
                &query.params,
                self.default_timeout(),
            )
            .await?;
        debug!(
            "{} lookup for '{}' returned {} candidates",
            object_type, name, candidates.total
        );
        if candidates.has_more {
            // Only the first page is searched, a later page may hold the match.
            warn!(
                "{} lookup for '{}' returned {} of {} candidates, results are truncated",
                object_type,
                name,
                candidates.data.len(),
                candidates.total
            );
        }

        let id = select_unique(object_type, name, candidates)?;
        info!("Resolved {} '{}' to {}", object_type, name, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, &str)], by_hostname: bool) -> ListResponse<ObjectEntry> {
        ListResponse {
            total: items.len() as u64,
            has_more: false,
            data: items
                .iter()
                .map(|(id, n)| ObjectEntry {
                    id: id.to_string(),
                    name: (!by_hostname).then(|| n.to_string()),
                    hostname: by_hostname.then(|| n.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_object_type() {
        assert_eq!("vmware".parse::<ObjectType>().unwrap(), ObjectType::Vmware);
        assert_eq!(
            "filesetTemplate".parse::<ObjectType>().unwrap(),
            ObjectType::FilesetTemplate
        );
        assert!(matches!(
            "hyperv".parse::<ObjectType>(),
            Err(RubrikError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_host_os() {
        assert_eq!("Linux".parse::<HostOs>().unwrap(), HostOs::Linux);
        assert!(matches!("linux".parse::<HostOs>(), Err(RubrikError::Usage(_))));
    }

    #[test]
    fn test_fileset_template_requires_os() {
        let err = lookup_query(ObjectType::FilesetTemplate, "tpl", None)
            .err()
            .unwrap();
        assert!(matches!(err, RubrikError::Usage(_)));

        let q = lookup_query(ObjectType::FilesetTemplate, "tpl", Some(HostOs::Windows)).unwrap();
        assert!(q.params.contains(&("operating_system_type", "Windows")));
    }

    #[test]
    fn test_select_unique_exact_match() {
        let list = entries(&[("vm-1", "web"), ("vm-2", "web-01")], false);
        assert_eq!(
            select_unique(ObjectType::Vmware, "web", list).unwrap(),
            "vm-1"
        );
    }

    #[test]
    fn test_select_unique_uses_hostname_for_physical_hosts() {
        let list = entries(&[("host-1", "db.example.com")], true);
        assert_eq!(
            select_unique(ObjectType::PhysicalHost, "db.example.com", list).unwrap(),
            "host-1"
        );

        let list = entries(&[("host-1", "db.example.com")], false);
        assert!(matches!(
            select_unique(ObjectType::PhysicalHost, "db.example.com", list),
            Err(RubrikError::NotFound { .. })
        ));
    }

    #[test]
    fn test_select_unique_rejects_duplicates() {
        let list = entries(&[("mv-1", "logs"), ("mv-2", "logs")], false);
        let err = select_unique(ObjectType::ManagedVolume, "logs", list).unwrap_err();
        assert!(matches!(err, RubrikError::Ambiguous { .. }));
        assert!(err.to_string().contains("Multiple managedVolume objects named 'logs'"));
    }

    #[test]
    fn test_select_unique_not_found() {
        let list = entries(&[("sla-1", "Gold")], false);
        let err = select_unique(ObjectType::Sla, "Silver", list).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The sla object 'Silver' was not found on the Rubrik cluster"
        );

        assert!(matches!(
            select_unique(ObjectType::Sla, "Gold", entries(&[], false)),
            Err(RubrikError::NotFound { .. })
        ));
    }
}
