use anyhow::Result;
use clap::{Parser, Subcommand};

use tally::cli::{
    handle_audit_command, handle_balance_command, handle_config_command, handle_entry_command,
    handle_export_command, handle_group_command, handle_member_command, handle_settle_command,
    AuditArgs, BalanceArgs, ConfigCommands, EntryCommands, ExportArgs, GroupCommands,
    MemberCommands, SettleCommands,
};
use tally::config::{paths::TallyPaths, settings::Settings};
use tally::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based shared-expense tracker",
    long_about = "Tally keeps track of who paid for what in a group, splits every \
                  expense exactly, and tells you the fewest payments needed to \
                  settle up."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Member management commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Record and edit expenses, income and transfers
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Show who owes what
    #[command(alias = "balances")]
    Balance(BalanceArgs),

    /// Suggest and record settlements
    #[command(subcommand)]
    Settle(SettleCommands),

    /// Export a group
    Export(ExportArgs),

    /// Show recent changes
    Audit(AuditArgs),
}

fn main() -> Result<()> {
    tally::logging::init();

    let cli = Cli::parse();

    let paths = TallyPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            let storage = Storage::open(paths.clone())?;
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Create a group with: tally group create <name>");
        }
        Some(Commands::Config { action }) => {
            handle_config_command(&paths, &mut settings, action)?;
        }
        Some(command) => {
            let storage = Storage::open(paths)?;
            match command {
                Commands::Group(cmd) => handle_group_command(&storage, cmd)?,
                Commands::Member(cmd) => handle_member_command(&storage, cmd)?,
                Commands::Entry(cmd) => handle_entry_command(&storage, &settings, cmd)?,
                Commands::Balance(args) => handle_balance_command(&storage, &settings, args)?,
                Commands::Settle(cmd) => handle_settle_command(&storage, &settings, cmd)?,
                Commands::Export(args) => handle_export_command(&storage, &settings, args)?,
                Commands::Audit(args) => handle_audit_command(&storage, args)?,
                Commands::Init | Commands::Config { .. } => {}
            }
        }
        None => {
            println!("Tally - shared-expense tracker");
            println!();
            println!("Run 'tally --help' for usage information.");
        }
    }

    Ok(())
}
