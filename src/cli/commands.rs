//! Command dispatch

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::LineagePage;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{graduation_years, is_search_active, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::MemberSource;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree {
            file,
            tree,
            search,
            year,
            json,
        }) => cmd_tree(&container, file.clone(), tree.as_deref(), search, *year, *json),
        Some(Commands::Trees { file, json }) => cmd_trees(&container, file.clone(), *json),
        Some(Commands::Years { file }) => cmd_years(&container, file.clone()),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Ok(()),
    }
}

fn member_source(
    container: &ServiceContainer,
    file: Option<PathBuf>,
) -> CliResult<Arc<dyn MemberSource>> {
    container.member_source(file).ok_or_else(|| {
        CliError::Usage("no members file given and members_file is not configured".to_string())
    })
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    file: Option<PathBuf>,
    tree: Option<&str>,
    search: &str,
    year: Option<i32>,
    json: bool,
) -> CliResult<()> {
    let service = container.lineage_service(member_source(container, file)?);

    let Some((name, decorated)) = service.view(tree, search, year)? else {
        output::warning("No lineage data available yet.");
        return Ok(());
    };
    debug!("cmd_tree: showing '{}'", name);

    if json {
        let value = serde_json::json!({ "name": name, "root": decorated });
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| InfraError::json("serialize tree", e))?;
        output::info(&text);
        return Ok(());
    }

    let rendered = decorated
        .to_tree_string_with(&container.settings.virtual_root_id)
        .to_string();
    output::header(&name);
    output::tree(&rendered, is_search_active(search, year));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_trees(container: &ServiceContainer, file: Option<PathBuf>, json: bool) -> CliResult<()> {
    let service = container.lineage_service(member_source(container, file)?);
    let trees = service.load_forest()?;

    if json {
        let page = LineagePage::from_trees(trees);
        let text = serde_json::to_string_pretty(&page)
            .map_err(|e| InfraError::json("serialize forest", e))?;
        output::info(&text);
        return Ok(());
    }

    if trees.is_empty() {
        output::warning("No lineage data available yet.");
        return Ok(());
    }

    let sentinel = &container.settings.virtual_root_id;
    for tree in &trees {
        output::info(&format!(
            "{}  ({} members, depth {})",
            tree.name,
            tree.root.member_count(sentinel),
            tree.root.depth()
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_years(container: &ServiceContainer, file: Option<PathBuf>) -> CliResult<()> {
    let service = container.lineage_service(member_source(container, file)?);
    let trees = service.load_forest()?;

    for year in graduation_years(&trees) {
        output::info(&year);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Global config:");
            match global_config_path() {
                Some(path) => {
                    let status = if path.exists() { "exists" } else { "not found" };
                    output::detail(&format!("{} ({})", path.display(), status));
                }
                None => output::detail("unavailable (no home directory)"),
            }
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
