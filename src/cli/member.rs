//! Member CLI commands
//!
//! Members are the participants of a group.

use clap::Subcommand;

use super::resolve_group;
use crate::error::TallyResult;
use crate::services::ParticipantService;
use crate::storage::Storage;

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add one or more members to a group
    Add {
        /// Group name or ID
        group: String,
        /// Member names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List the members of a group
    List {
        /// Group name or ID
        group: String,
    },
    /// Rename a member
    Rename {
        /// Group name or ID
        group: String,
        /// Current member name or ID
        member: String,
        /// New name
        new_name: String,
    },
}

/// Handle a member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> TallyResult<()> {
    let service = ParticipantService::new(storage);

    match cmd {
        MemberCommands::Add { group, names } => {
            let group = resolve_group(storage, &group)?;
            for name in names {
                let participant = service.add(group.id, &name)?;
                println!(
                    "Added {} to {} ({})",
                    participant.name, group.name, participant.id
                );
            }
        }

        MemberCommands::List { group } => {
            let group = resolve_group(storage, &group)?;
            let members = service.list(group.id)?;
            if members.is_empty() {
                println!("No members in {}.", group.name);
            }
            for member in members {
                println!("{:<12}  {}", member.id.to_string(), member.name);
            }
        }

        MemberCommands::Rename {
            group,
            member,
            new_name,
        } => {
            let group = resolve_group(storage, &group)?;
            let found = service.resolve(group.id, &member)?;
            let renamed = service.rename(found.id, &new_name)?;
            println!("Renamed {} to {}", found.name, renamed.name);
        }
    }

    Ok(())
}
