use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Command line client for Rubrik CDM clusters",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, env = "RUBRIK_CDM_CONFIG")]
    pub config: Option<String>,

    /// Cluster node IP or hostname (e.g., 10.0.1.20)
    #[arg(short = 'H', long, env = "RUBRIK_CDM_NODE_IP")]
    pub node_ip: Option<String>,

    /// Cluster username
    #[arg(short = 'u', long, env = "RUBRIK_CDM_USERNAME")]
    pub username: Option<String>,

    /// Cluster password
    #[arg(short = 'P', long, env = "RUBRIK_CDM_PASSWORD")]
    pub password: Option<String>,

    /// API token (takes precedence over username and password)
    #[arg(short = 'T', long, env = "RUBRIK_CDM_API_TOKEN")]
    pub api_token: Option<String>,

    /// Base request timeout in seconds
    #[arg(long, env = "RUBRIK_CDM_TIMEOUT")]
    pub default_timeout: Option<u64>,

    /// Disable SSL verification (for self-signed certs)
    #[arg(
        short = 'k',
        long,
        env = "RUBRIK_CDM_NO_VERIFY_SSL",
        default_value_t = false
    )]
    pub no_verify_ssl: bool,

    /// Output format for results
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'L', long, env = "RUBRIK_CDM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable logging to a file
    #[arg(long, env = "RUBRIK_CDM_LOG_FILE_ENABLE", default_value_t = false)]
    pub log_file_enable: bool,

    /// Log file directory
    #[arg(long, env = "RUBRIK_CDM_LOG_DIR", default_value = ".")]
    pub log_dir: String,

    /// Log filename prefix
    #[arg(long, env = "RUBRIK_CDM_LOG_FILENAME", default_value = "rubrik-cdm.log")]
    pub log_filename: String,

    /// Log rotation strategy (daily, hourly, never)
    #[arg(long, env = "RUBRIK_CDM_LOG_ROTATE", default_value = "daily")]
    pub log_rotate: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CDM version of the cluster
    ClusterVersion,

    /// List the IP address of every cluster node
    ClusterNodeIp,

    /// Look up the id of an object by name
    ObjectId {
        /// Object name (hostname for physical hosts)
        name: String,
        /// vmware, sla, vmwareHost, physicalHost, filesetTemplate or managedVolume
        #[arg(short = 't', long)]
        object_type: String,
        /// Linux or Windows (fileset templates only)
        #[arg(long)]
        host_os: Option<String>,
    },

    /// Assign an object to an SLA Domain ("do not protect" or "clear" are accepted)
    AssignSla {
        object_name: String,
        sla_name: String,
        #[arg(short = 't', long, default_value = "vmware")]
        object_type: String,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Open a managed volume for writes
    BeginManagedVolumeSnapshot {
        name: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Close a managed volume for writes ("current" keeps the retention)
    EndManagedVolumeSnapshot {
        name: String,
        #[arg(default_value = "current")]
        sla_name: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the objects protected by an SLA Domain
    GetSlaObjects {
        sla_name: String,
        #[arg(short = 't', long, default_value = "vmware")]
        object_type: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Suspend snapshot activity for an object
    PauseSnapshot {
        object_name: String,
        #[arg(short = 't', long, default_value = "vmware")]
        object_type: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Resume snapshot activity for an object
    ResumeSnapshot {
        object_name: String,
        #[arg(short = 't', long, default_value = "vmware")]
        object_type: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Take an on-demand snapshot of a VM ("current" uses the assigned SLA)
    OnDemandSnapshotVm {
        object_name: String,
        #[arg(default_value = "current")]
        sla_name: String,
        #[arg(short = 't', long, default_value = "vmware")]
        object_type: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Take an on-demand snapshot of a physical host fileset
    OnDemandSnapshotPhysical {
        host_name: String,
        fileset: String,
        /// Linux or Windows
        host_os: String,
        #[arg(default_value = "current")]
        sla_name: String,
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_assign_sla() {
        let args = Args::try_parse_from([
            "rubrik-cdm",
            "--node-ip",
            "10.0.0.5",
            "assign-sla",
            "vm1",
            "do not protect",
        ])
        .unwrap();
        match args.command {
            Commands::AssignSla {
                object_name,
                sla_name,
                object_type,
                timeout,
            } => {
                assert_eq!(object_name, "vm1");
                assert_eq!(sla_name, "do not protect");
                assert_eq!(object_type, "vmware");
                assert_eq!(timeout, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_token_and_password_both_accepted() {
        let args = Args::try_parse_from([
            "rubrik-cdm",
            "--username",
            "admin",
            "--password",
            "pw",
            "--api-token",
            "tok",
            "cluster-version",
        ])
        .unwrap();
        assert_eq!(args.api_token.as_deref(), Some("tok"));
        assert_eq!(args.password.as_deref(), Some("pw"));
    }
}
