use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["unitsync-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["unitsync-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["unitsync-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn sync_run_defaults_to_writing() {
    let cli = Cli::try_parse_from(["unitsync-cli", "sync", "run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::Run { dry_run: false }
        })
    ));
}

#[test]
fn sync_run_dry_run() {
    let cli = Cli::try_parse_from(["unitsync-cli", "sync", "run", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::Run { dry_run: true }
        })
    ));
}

#[test]
fn sync_history_limit() {
    let cli = Cli::try_parse_from(["unitsync-cli", "sync", "history"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::History { limit: 20 }
        })
    ));

    let cli = Cli::try_parse_from(["unitsync-cli", "sync", "history", "--limit", "5"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::History { limit: 5 }
        })
    ));
}

#[test]
fn products_list_default_limit() {
    let cli = Cli::try_parse_from(["unitsync-cli", "products", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Products {
            command: ProductsCommands::List { limit: 50 }
        })
    ));
}

#[test]
fn parses_debug_commands() {
    let show = Cli::try_parse_from(["unitsync-cli", "debug", "show"]).unwrap();
    assert!(matches!(
        show.command,
        Some(Commands::Debug {
            command: DebugCommands::Show
        })
    ));

    let clear = Cli::try_parse_from(["unitsync-cli", "debug", "clear"]).unwrap();
    assert!(matches!(
        clear.command,
        Some(Commands::Debug {
            command: DebugCommands::Clear
        })
    ));
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["unitsync-cli", "sync", "rewind"]).is_err());
}
