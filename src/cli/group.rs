//! Group CLI commands

use clap::Subcommand;

use super::resolve_group;
use crate::display::group::{format_group_list, format_roster};
use crate::error::TallyResult;
use crate::services::GroupService;
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List all groups
    List,
    /// Show a group and its members
    Show {
        /// Group name or ID
        group: String,
    },
    /// Rename a group or change its description
    Edit {
        /// Group name or ID
        group: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Handle a group command
pub fn handle_group_command(storage: &Storage, cmd: GroupCommands) -> TallyResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::Create { name, description } => {
            let group = service.create(&name, description.as_deref())?;
            println!("Created group: {}", group.name);
            println!("  ID: {}", group.id);
            println!();
            println!("Add members with: tally member add \"{}\" <name>", group.name);
        }

        GroupCommands::List => {
            let rosters = service
                .list()?
                .into_iter()
                .map(|g| service.roster(g.id))
                .collect::<TallyResult<Vec<_>>>()?;
            print!("{}", format_group_list(&rosters));
        }

        GroupCommands::Show { group } => {
            let found = resolve_group(storage, &group)?;
            print!("{}", format_roster(&service.roster(found.id)?));
        }

        GroupCommands::Edit {
            group,
            name,
            description,
        } => {
            let found = resolve_group(storage, &group)?;

            if name.is_none() && description.is_none() {
                println!("No changes specified. Use --name or --description.");
                return Ok(());
            }

            let updated = service.update(found.id, name.as_deref(), description.as_deref())?;
            println!("Updated group: {}", updated.name);
        }
    }

    Ok(())
}
