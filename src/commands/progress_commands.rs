use super::render::ProgressBarListener;
use super::WatchArgs;
use crate::api::types::ProcessingRequest;
use crate::api::ApiClient;
use crate::config::MonitorConfig;
use crate::progress::{
    ArtifactDownloads, DownloadTrigger, LogListener, MonitorListener, ProgressMonitor, SessionEnd,
    SkipDownloads,
};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit code when the backend reports the job as failed.
const EXIT_JOB_FAILED: u8 = 2;
/// Exit code after Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

pub(super) async fn watch(mut config: MonitorConfig, job_id: &str, args: &WatchArgs) -> Result<ExitCode> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    config.download_package |= args.package;

    let client = ApiClient::new(&config).context("failed to build HTTP client")?;
    let listener: Arc<dyn MonitorListener> = if args.plain {
        Arc::new(LogListener::new())
    } else {
        Arc::new(ProgressBarListener::new(job_id))
    };
    let artifacts = if args.no_download {
        None
    } else {
        Some(Arc::new(
            ArtifactDownloads::new(&config).context("failed to build download client")?,
        ))
    };
    let downloads: Arc<dyn DownloadTrigger> = match &artifacts {
        Some(artifacts) => artifacts.clone(),
        None => Arc::new(SkipDownloads),
    };

    info!(
        "watch: {} api_base={} output_dir={}",
        job_id,
        config.api_base,
        config.output_dir.display()
    );
    let mut monitor = ProgressMonitor::new(client, config, listener, downloads);
    monitor.show(job_id);

    let end = tokio::select! {
        end = monitor.wait() => end,
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(end) = end else {
        monitor.hide();
        if let Some(artifacts) = &artifacts {
            artifacts.cancel_all();
        }
        eprintln!("Interrupted");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    let state = monitor.display();
    match end {
        SessionEnd::Completed => {
            println!("{}: completed. {}", job_id, state.message);
            Ok(ExitCode::SUCCESS)
        }
        SessionEnd::Failed => {
            eprintln!("{}: failed. {}", job_id, state.message);
            Ok(ExitCode::from(EXIT_JOB_FAILED))
        }
        SessionEnd::PollFailed(error) => Err(anyhow!("polling {} failed: {}", job_id, error)),
        SessionEnd::Cancelled => Ok(ExitCode::from(EXIT_INTERRUPTED)),
    }
}

pub(super) async fn status(config: &MonitorConfig, job_id: &str) -> Result<ExitCode> {
    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let snapshot = client
        .fetch_progress(job_id)
        .await
        .with_context(|| format!("failed to fetch progress of {}", job_id))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(ExitCode::SUCCESS)
}

pub(super) async fn start(
    config: MonitorConfig,
    conversation_id: String,
    satellites: Vec<String>,
    options: Option<&str>,
    watch_args: Option<&WatchArgs>,
) -> Result<ExitCode> {
    let processing_options = options
        .map(|raw| serde_json::from_str::<serde_json::Value>(raw))
        .transpose()
        .context("--options must be a JSON object")?;
    if processing_options.as_ref().is_some_and(|v| !v.is_object()) {
        bail!("--options must be a JSON object");
    }

    let client = ApiClient::new(&config).context("failed to build HTTP client")?;
    let started = client
        .start_processing(&ProcessingRequest {
            conversation_id,
            selected_satellites: satellites,
            processing_options,
        })
        .await
        .context("failed to start processing")?;

    if !started.success {
        bail!("backend refused to start processing: {}", started.message);
    }
    let Some(job_id) = started.processing_id else {
        bail!("backend did not return a processing id: {}", started.message);
    };
    println!("{}", job_id);

    match watch_args {
        Some(args) => watch(config, &job_id, args).await,
        None => Ok(ExitCode::SUCCESS),
    }
}
