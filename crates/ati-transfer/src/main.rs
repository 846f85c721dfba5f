/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Annotation/manuscript operations with inline progress
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or command wiring
*/

mod cli;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use ati_adapter::{
    ALL_HYPOTHESIS_GROUPS_ID, AtiClient, GroupId, GroupSelection, ManuscriptUpload,
};
use ati_transfer::{
    AnnotationForms, AtiConfig, DatasetService, DeletionRequest, TaskSlot, TransferRequest,
    manuscript, pipeline,
};
use cli::render::{render_state, spawn_progress};
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_deref())?;

    if let Command::Init { output } = args.command {
        let output = match output {
            Some(path) => path,
            None => default_config_path()?,
        };
        cli::init::run_init(output)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config_path = match args.config_path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = AtiConfig::load(&config_path).context("load config")?;
    info!(
        config_path = %config_path.display(),
        dataset_id = %config.project.dataset_id,
        "configuration loaded"
    );

    let client = AtiClient::with_config(&config.server.base_url, config.client_config())
        .context("build ATI client")?;
    let service = Arc::new(DatasetService::new(client, config.project.dataset_id.clone()));

    run_command(args.command, &config, service).await
}

async fn run_command(
    command: Command,
    config: &AtiConfig,
    service: Arc<DatasetService>,
) -> Result<ExitCode> {
    match command {
        Command::Init { .. } => bail!("init runs before a configuration is loaded"),
        Command::Info => {
            print_info(config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Export {
            source_group,
            destination_url,
            destination_group,
            make_private,
        } => {
            url::Url::parse(&destination_url)
                .with_context(|| format!("destination URL is not a valid URL: {destination_url}"))?;
            if destination_group.trim().is_empty() {
                bail!("destination group must not be empty");
            }
            let request = TransferRequest {
                source_group: GroupSelection::parse(&source_group),
                destination_url,
                destination_group: GroupId::new(destination_group),
                make_private,
            };
            run_export(config, service, request).await
        }
        Command::Delete { source_group, yes } => {
            let request = DeletionRequest {
                source_group: GroupSelection::parse(&source_group),
            };
            run_delete(config, service, request, yes).await
        }
        Command::DownloadAnnotations { group, output } => {
            let json = pipeline::annotations_json(
                &*service,
                &config.credentials(),
                &GroupSelection::parse(&group),
            )
            .await
            .map_err(|err| anyhow!(err.user_message()))
            .context("download annotations")?;
            tokio::fs::write(&output, json)
                .await
                .with_context(|| format!("write {}", output.display()))?;
            println!("Annotations saved to {}", style(output.display()).cyan());
            Ok(ExitCode::SUCCESS)
        }
        Command::UploadManuscript { path } => {
            let upload = ManuscriptUpload::from_path(&path)
                .await
                .map_err(|err| anyhow!(err.user_message()))
                .with_context(|| format!("read manuscript {}", path.display()))?;
            let mut slot = TaskSlot::new("manuscript");
            let task = slot.begin()?;
            let progress = spawn_progress(slot.subscribe());
            let outcome =
                manuscript::upload_manuscript(&*service, &config.credentials(), upload, &task).await;
            drop(task);
            finish(slot, progress, outcome.is_ok()).await
        }
        Command::DeleteManuscript { id, yes } => {
            let id = id
                .or_else(|| config.project.manuscript_id.clone())
                .context("no manuscript id given and project.manuscript_id is not set")?;
            if !yes && !confirm(&format!("Delete manuscript {id}?"))? {
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            let mut slot = TaskSlot::new("manuscript");
            let task = slot.begin()?;
            let progress = spawn_progress(slot.subscribe());
            let outcome =
                manuscript::delete_manuscript(&*service, &config.credentials(), &id, &task).await;
            drop(task);
            finish(slot, progress, outcome.is_ok()).await
        }
    }
}

async fn run_export(
    config: &AtiConfig,
    service: Arc<DatasetService>,
    request: TransferRequest,
) -> Result<ExitCode> {
    let mut forms = AnnotationForms::new(
        service,
        config.credentials(),
        config.project.manuscript_name.clone(),
    );
    let progress = spawn_progress(forms.watch_export());
    let job = forms.submit_export(request)?;
    let outcome = job.run().await;

    let state = forms.export_state();
    drop(forms);
    let _ = progress.await;
    println!("{}", render_state(&state));
    if let Ok(result) = &outcome {
        println!("Link: {}", style(result.locator_url()).underlined());
    }
    Ok(exit_code(outcome.is_ok()))
}

async fn run_delete(
    config: &AtiConfig,
    service: Arc<DatasetService>,
    request: DeletionRequest,
    yes: bool,
) -> Result<ExitCode> {
    let mut forms = AnnotationForms::new(
        service,
        config.credentials(),
        config.project.manuscript_name.clone(),
    );
    forms.submit_delete(request)?;

    if !yes && !confirm(&forms.confirmation_prompt())? {
        forms.cancel_delete();
        println!("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let progress = spawn_progress(forms.watch_delete());
    let job = forms.confirm_delete()?;
    let outcome = job.run().await;

    let state = forms.delete_state();
    drop(forms);
    let _ = progress.await;
    println!("{}", render_state(&state));
    Ok(exit_code(outcome.is_ok()))
}

async fn finish(
    slot: TaskSlot,
    progress: tokio::task::JoinHandle<()>,
    succeeded: bool,
) -> Result<ExitCode> {
    let state = slot.state();
    drop(slot);
    let _ = progress.await;
    println!("{}", render_state(&state));
    Ok(exit_code(succeeded))
}

fn print_info(config: &AtiConfig) {
    let project = &config.project;
    let base_url = config.server.base_url.trim_end_matches('/');
    println!("{}", style("ATI project").bold());
    println!("  dataset:    {}", project.dataset_id);
    println!("  manuscript: {}", project.manuscript_name);
    println!("  source URL: {base_url}/ati/{}/manuscript", project.dataset_id);

    println!("{}", style("Groups").bold());
    println!("  {ALL_HYPOTHESIS_GROUPS_ID}  All groups");
    for group in &project.groups {
        println!("  {}  {}", group.id, group.display_label());
    }

    println!("{}", style("Datasources").bold());
    if project.datasources.is_empty() {
        println!("  No datasources found for this project.");
    }
    for datasource in &project.datasources {
        println!("  {}  {}", datasource.name, style(&datasource.uri).underlined());
    }
    match config.datasource_edit_url() {
        Some(url) => println!("  modify: {}", style(url).underlined()),
        None => println!("  set project.doi and project.dataverse_url to link the datasource editor"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn default_config_path() -> Result<PathBuf> {
    AtiConfig::default_path().context("could not determine a config directory; pass --config")
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("log file path must name a file")?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(Some(guard))
}
