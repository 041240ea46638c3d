//! Command dispatch: maps parsed arguments onto network service calls.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, DetailArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{encode_data_uri, mime_for_path, UnitDraft, UnitId, UnitPatch};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `partynet --help`".to_string(),
        ));
    };

    // Completions need no settings or store
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    if let Commands::Config { command } = command {
        return config_command(cli, command, &settings);
    }

    let container = ServiceContainer::new(settings);
    match command {
        Commands::Tree { stats } => tree(cli, &container, *stats),
        Commands::Show { id } => show(cli, &container, id),
        Commands::Children { id } => children(cli, &container, id),
        Commands::Add {
            level,
            name,
            parent,
            details,
        } => add(cli, &container, level, name, parent.as_deref(), details),
        Commands::Update { id, name, details } => {
            update(cli, &container, id, name.as_deref(), details)
        }
        Commands::Delete { id } => delete(cli, &container, id),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| InfraError::io("render json", io::Error::from(e)))?;
    output::info(&rendered);
    Ok(())
}

/// Resolve `--photo` / `--photo-file` into the stored photo string.
fn photo_value(details: &DetailArgs) -> CliResult<Option<String>> {
    if let Some(path) = &details.photo_file {
        return Ok(Some(read_photo(path)?));
    }
    Ok(details.photo.clone())
}

fn read_photo(path: &Path) -> CliResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| InfraError::io(format!("read photo {}", path.display()), e))?;
    debug!("photo {}: {} bytes", path.display(), bytes.len());
    Ok(encode_data_uri(mime_for_path(path), &bytes))
}

#[instrument(skip(cli, container))]
fn tree(cli: &Cli, container: &ServiceContainer, stats: bool) -> CliResult<()> {
    let forest = container.network.list_tree()?;
    if cli.json {
        return print_json(&forest);
    }
    output::forest(&forest);
    if stats {
        let counts = forest.stats();
        output::header("Totals");
        output::detail(&format!("unions:   {}", counts.unions));
        output::detail(&format!("villages: {}", counts.villages));
        output::detail(&format!("wards:    {}", counts.wards));
        output::detail(&format!("booths:   {}", counts.booths));
    }
    Ok(())
}

#[instrument(skip(cli, container))]
fn show(cli: &Cli, container: &ServiceContainer, id: &str) -> CliResult<()> {
    let node = container.network.get_unit(&UnitId::from(id))?;
    if cli.json {
        return print_json(&node);
    }
    output::unit_details(&node);
    Ok(())
}

#[instrument(skip(cli, container))]
fn children(cli: &Cli, container: &ServiceContainer, id: &str) -> CliResult<()> {
    let nodes = container.network.list_children(&UnitId::from(id))?;
    if cli.json {
        return print_json(&nodes);
    }
    for node in &nodes {
        output::info(&output::node_label(node));
    }
    Ok(())
}

#[instrument(skip(cli, container, details))]
fn add(
    cli: &Cli,
    container: &ServiceContainer,
    level: &str,
    name: &str,
    parent: Option<&str>,
    details: &DetailArgs,
) -> CliResult<()> {
    let draft = UnitDraft {
        level: level.to_string(),
        name_label: name.to_string(),
        parent_id: parent.map(str::to_string),
        person_name: details.person.clone(),
        role_label: details.role.clone(),
        phone: details.phone.clone(),
        photo: photo_value(details)?,
    };
    let node = container.network.create_unit(draft)?;
    if cli.json {
        return print_json(&node);
    }
    output::action("Added", &output::node_label(&node));
    Ok(())
}

#[instrument(skip(cli, container, details))]
fn update(
    cli: &Cli,
    container: &ServiceContainer,
    id: &str,
    name: Option<&str>,
    details: &DetailArgs,
) -> CliResult<()> {
    let patch = UnitPatch {
        name_label: name.map(str::to_string),
        person_name: details.person.clone(),
        role_label: details.role.clone(),
        phone: details.phone.clone(),
        photo: photo_value(details)?,
    };
    if patch.is_empty() {
        return Err(CliError::InvalidArgs(
            "nothing to update, pass at least one field".to_string(),
        ));
    }
    let node = container.network.update_unit(&UnitId::from(id), patch)?;
    if cli.json {
        return print_json(&node);
    }
    output::action("Updated", &output::node_label(&node));
    Ok(())
}

#[instrument(skip(cli, container))]
fn delete(cli: &Cli, container: &ServiceContainer, id: &str) -> CliResult<()> {
    let outcome = container.network.delete_unit(&UnitId::from(id))?;
    if cli.json {
        return print_json(&outcome);
    }
    output::success(&format!(
        "Unit {} and {} sub-units deleted",
        outcome.root,
        outcome.descendants().len()
    ));
    for removed in outcome.descendants() {
        output::diff_remove(removed);
    }
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            if cli.json {
                return print_json(settings);
            }
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            output::detail(&format!("global: {}", global));
            if let Some(path) = &cli.config {
                output::detail(&format!("local:  {}", path.display()));
            }
            output::detail(&format!("data:   {}", settings.store.path.display()));
        }
    }
    Ok(())
}
