use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::error;
use rubrik_cdm_rs::cli::{Args, Commands, OutputFormat};
use rubrik_cdm_rs::rubrik::{HostOs, ObjectType, RubrikClient, SlaSelector};
use rubrik_cdm_rs::settings::Settings;
use serde::Serialize;
use std::process;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("Invalid log level '{}'", args.log_level))?;

    // Results go to stdout, so console logs stay on stderr.
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = if args.log_file_enable {
        let rotation = match args.log_rotate.as_str() {
            "hourly" => Rotation::HOURLY,
            "never" => Rotation::NEVER,
            _ => Rotation::DAILY,
        };
        let appender = RollingFileAppender::new(rotation, &args.log_dir, &args.log_filename);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    tracing_log::LogTracer::init().context("Failed to bridge log records")?;

    Ok(guard)
}

fn print_output<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn settings_from(args: &Args) -> Result<Settings> {
    let mut settings =
        Settings::new(args.config.as_deref()).context("Failed to load configuration")?;

    // CLI arguments take precedence over the config file
    if let Some(node_ip) = &args.node_ip {
        settings.node_ip = Some(node_ip.clone());
    }
    if let Some(username) = &args.username {
        settings.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        settings.password = Some(password.clone());
    }
    if let Some(api_token) = &args.api_token {
        settings.api_token = Some(api_token.clone());
    }
    if let Some(timeout) = args.default_timeout {
        settings.timeout = Some(timeout);
    }
    if args.no_verify_ssl {
        settings.no_verify_ssl = Some(true);
    }
    Ok(settings)
}

async fn run(args: Args) -> Result<()> {
    let format = args.output;

    if let Commands::Completions { shell } = &args.command {
        let mut cmd = Args::command();
        clap_complete::generate(*shell, &mut cmd, "rubrik-cdm", &mut std::io::stdout());
        return Ok(());
    }

    let settings = settings_from(&args)?;
    let client = RubrikClient::from_settings(&settings)?;
    let secs = |t: Option<u64>| t.map(Duration::from_secs);

    match args.command {
        Commands::ClusterVersion => print_output(format, &client.cluster_version().await?),
        Commands::ClusterNodeIp => print_output(format, &client.cluster_node_ip().await?),
        Commands::ObjectId {
            name,
            object_type,
            host_os,
        } => {
            let object_type: ObjectType = object_type.parse()?;
            let host_os = host_os.as_deref().map(str::parse::<HostOs>).transpose()?;
            let id = client.object_id(&name, object_type, host_os).await?;
            print_output(format, &id)
        }
        Commands::AssignSla {
            object_name,
            sla_name,
            object_type,
            timeout,
        } => {
            let res = client
                .assign_sla(
                    &object_name,
                    object_type.parse()?,
                    &SlaSelector::parse(&sla_name),
                    secs(timeout),
                )
                .await?;
            print_output(format, &res)
        }
        Commands::BeginManagedVolumeSnapshot { name, timeout } => {
            let res = client
                .begin_managed_volume_snapshot(&name, secs(timeout))
                .await?;
            print_output(format, &res)
        }
        Commands::EndManagedVolumeSnapshot {
            name,
            sla_name,
            timeout,
        } => {
            let res = client
                .end_managed_volume_snapshot(&name, &SlaSelector::parse(&sla_name), secs(timeout))
                .await?;
            print_output(format, &res)
        }
        Commands::GetSlaObjects {
            sla_name,
            object_type,
            timeout,
        } => {
            let object_type: ObjectType = object_type.parse()?;
            let objects = client
                .get_sla_objects(&sla_name, object_type, secs(timeout))
                .await?;
            if objects.is_empty() {
                let msg = format!(
                    "The SLA '{}' is currently not protecting any {} objects.",
                    sla_name, object_type
                );
                print_output(format, &msg)
            } else {
                print_output(format, &objects)
            }
        }
        Commands::PauseSnapshot {
            object_name,
            object_type,
            timeout,
        } => {
            let res = client
                .pause_snapshot(&object_name, object_type.parse()?, secs(timeout))
                .await?;
            print_output(format, &res)
        }
        Commands::ResumeSnapshot {
            object_name,
            object_type,
            timeout,
        } => {
            let res = client
                .resume_snapshot(&object_name, object_type.parse()?, secs(timeout))
                .await?;
            print_output(format, &res)
        }
        Commands::OnDemandSnapshotVm {
            object_name,
            sla_name,
            object_type,
            timeout,
        } => {
            let url = client
                .on_demand_snapshot_vm(
                    &object_name,
                    object_type.parse()?,
                    &SlaSelector::parse(&sla_name),
                    secs(timeout),
                )
                .await?;
            print_output(format, &url)
        }
        Commands::OnDemandSnapshotPhysical {
            host_name,
            fileset,
            host_os,
            sla_name,
            timeout,
        } => {
            let url = client
                .on_demand_snapshot_physical(
                    &host_name,
                    &SlaSelector::parse(&sla_name),
                    &fileset,
                    host_os.parse()?,
                    secs(timeout),
                )
                .await?;
            print_output(format, &url)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _guard = match init_logging(&args) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        process::exit(1);
    }
}
