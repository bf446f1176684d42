//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::StoreService;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{ItemId, LevelPolicy, TreeStore};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };

    // Commands that need no store
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return cmd_config(command),
        _ => {}
    }

    let service = service_for(cli)?;
    let mut store = service.open(cli.file.as_deref())?;
    let show_levels = service.settings().show_levels;

    match command {
        Commands::Tree => cmd_tree(&store, show_levels),
        Commands::Rows => {
            output::rows(&store.to_row_data());
            Ok(())
        }
        Commands::List => {
            output::rows(&store.get_all());
            Ok(())
        }
        Commands::Item { id } => cmd_item(&store, id),
        Commands::Children { id } => {
            output::rows(&store.get_children(Some(id)));
            Ok(())
        }
        Commands::Descendants { id } => {
            output::rows(&store.get_all_children(id));
            Ok(())
        }
        Commands::Parents { id } => {
            output::rows(&store.get_all_parents(id));
            Ok(())
        }
        Commands::Remove { id } => cmd_remove(&mut store, id, show_levels),
        Commands::Move { id, parent } => {
            service.move_item(&mut store, id, parent.clone())?;
            output::action("Moved", id);
            cmd_tree(&store, show_levels)
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn service_for(cli: &Cli) -> CliResult<StoreService> {
    let mut service = StoreService::new(Settings::load()?);
    let settings = service.settings_mut();
    if cli.cascade {
        settings.level_policy = LevelPolicy::Cascade;
    }
    if cli.levels {
        settings.show_levels = true;
    }
    debug!(?settings, "settings resolved");
    Ok(service)
}

#[instrument(level = "debug", skip(store))]
fn cmd_tree(store: &TreeStore, show_levels: bool) -> CliResult<()> {
    output::info(&store.to_tree(show_levels));
    Ok(())
}

#[instrument(level = "debug", skip(store))]
fn cmd_item(store: &TreeStore, id: &ItemId) -> CliResult<()> {
    let row = store
        .get_item(id)
        .ok_or_else(|| CliError::InvalidArgs(format!("no row with id {}", id)))?;
    output::header(row);
    output::info(&format!("  level:    {}", row.level));
    output::info(&format!(
        "  parent:   {}",
        row.parent
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.to_string())
    ));
    output::info(&format!("  expanded: {}", row.expanded));
    output::info(&format!("  children: {}", output::ids(store.get_children(Some(id)))));
    output::info(&format!(
        "  path:     {}",
        output::ids(store.get_all_parents(id).into_iter().rev())
    ));
    Ok(())
}

#[instrument(level = "debug", skip(store))]
fn cmd_remove(store: &mut TreeStore, id: &ItemId, show_levels: bool) -> CliResult<()> {
    let removed = remove_subtree(store, id)?;
    output::action("Removed", &format!("{} rows ({} and its subtree)", removed, id));
    cmd_tree(store, show_levels)
}

/// Removes `id` with its subtree and returns the number of rows dropped.
fn remove_subtree(store: &mut TreeStore, id: &ItemId) -> CliResult<usize> {
    let before = store.len();
    store.remove_item(id).map_err(ApplicationError::from)?;
    Ok(before - store.len())
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::DomainError;

    const ROWS: &str = r#"
[[items]]
id = 1
label = "root"

[[items]]
id = 2
parent = 1
label = "branch"

[[items]]
id = 3
parent = 2
label = "leaf"

[[items]]
id = 4
label = "other"
"#;

    fn items_file() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rows.toml");
        std::fs::write(&path, ROWS).unwrap();
        (temp, path)
    }

    fn parse(path: &Path, args: &[&str]) -> Cli {
        let file = path.to_str().unwrap();
        let head = ["treestore", "-f", file];
        let argv = head.iter().chain(args).copied();
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn given_numeric_ids_when_running_lookups_then_rows_are_found() {
        let (_temp, path) = items_file();

        for args in [
            ["item", "2"].as_slice(),
            ["children", "1"].as_slice(),
            ["descendants", "1"].as_slice(),
            ["parents", "3"].as_slice(),
        ] {
            let cli = parse(&path, args);
            execute_command(&cli).unwrap();
        }
    }

    #[test]
    fn given_numeric_id_when_parsing_then_matches_stored_row() {
        let (_temp, path) = items_file();
        let cli = parse(&path, &["item", "3"]);

        let store = service_for(&cli).unwrap().open(cli.file.as_deref()).unwrap();

        let Some(Commands::Item { id }) = &cli.command else {
            panic!("expected item command");
        };
        assert_eq!(store.get_item(id).unwrap().label, "leaf");
    }

    #[test]
    fn given_unknown_id_when_showing_item_then_invalid_args() {
        let (_temp, path) = items_file();
        let cli = parse(&path, &["item", "99"]);

        let err = execute_command(&cli).unwrap_err();

        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn given_subtree_when_removing_then_reports_closure_size() {
        let (_temp, path) = items_file();
        let cli = parse(&path, &["remove", "1"]);
        execute_command(&cli).unwrap();

        let mut store = service_for(&cli).unwrap().open(cli.file.as_deref()).unwrap();
        let removed = remove_subtree(&mut store, &ItemId::Num(1)).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&ItemId::Num(4)));
    }

    #[test]
    fn given_unknown_id_when_removing_then_not_found() {
        let (_temp, path) = items_file();
        let cli = parse(&path, &["remove", "99"]);

        let err = execute_command(&cli).unwrap_err();

        assert!(matches!(
            err,
            CliError::Application(ApplicationError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[test]
    fn given_cascade_flag_when_moving_then_descendant_levels_follow() {
        let (_temp, path) = items_file();
        let cli = parse(&path, &["--cascade", "--levels", "move", "2"]);
        execute_command(&cli).unwrap();

        let service = service_for(&cli).unwrap();
        assert_eq!(service.settings().level_policy, LevelPolicy::Cascade);
        assert!(service.settings().show_levels);

        let mut store = service.open(cli.file.as_deref()).unwrap();
        assert_eq!(store.options().level_policy, LevelPolicy::Cascade);

        service.move_item(&mut store, &ItemId::Num(2), None).unwrap();
        assert_eq!(store.get_item(&ItemId::Num(2)).unwrap().level, 0);
        assert_eq!(store.get_item(&ItemId::Num(3)).unwrap().level, 1);
    }

    #[test]
    fn given_no_command_when_dispatching_then_usage_error() {
        let cli = Cli::try_parse_from(["treestore"]).unwrap();

        let err = execute_command(&cli).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
    }
}
