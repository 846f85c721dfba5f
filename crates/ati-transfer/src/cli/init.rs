/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When AtiConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use std::path::PathBuf;

use ati_transfer::config::{AtiConfig, ProjectConfig, ServerConfig, SessionConfig};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to ATI setup").bold().cyan());
    println!(
        "{}",
        style("This will guide you through connecting to an ATI project.").dim()
    );

    let theme = ColorfulTheme::default();

    println!("\n{}", style("--- Server ---").bold());
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("ATI server URL")
        .default("http://localhost:3000".to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|err| format!("not a valid URL: {err}"))
        })
        .interact_text()?;

    println!("\n{}", style("--- Session ---").bold());
    let api_token: String = Password::with_theme(&theme)
        .with_prompt("Dataverse API token")
        .interact()?;

    println!("\n{}", style("--- Project ---").bold());
    let dataset_id: String = Input::with_theme(&theme)
        .with_prompt("Dataset id")
        .interact_text()?;

    let manuscript_name: String = Input::with_theme(&theme)
        .with_prompt("Manuscript name")
        .interact_text()?;

    let doi: String = Input::with_theme(&theme)
        .with_prompt("Dataset DOI (optional)")
        .allow_empty(true)
        .interact_text()?;

    let dataverse_url: String = Input::with_theme(&theme)
        .with_prompt("Dataverse server URL (optional)")
        .allow_empty(true)
        .interact_text()?;

    let config = AtiConfig {
        server: ServerConfig {
            base_url,
            timeout_secs: 60,
            connect_timeout_secs: 10,
        },
        session: SessionConfig { api_token },
        project: ProjectConfig {
            dataset_id,
            manuscript_name,
            manuscript_id: None,
            doi: non_empty(doi),
            dataverse_url: non_empty(dataverse_url),
            groups: Vec::new(),
            datasources: Vec::new(),
        },
    };
    config.validate().context("configuration is incomplete")?;
    config.save(&output)?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
