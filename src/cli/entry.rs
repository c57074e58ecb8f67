//! Entry CLI commands
//!
//! Records expenses, income and transfers. Split participants are given as
//! repeated `--split` arguments: `name` for an equal share, `name=12.50` for
//! an exact amount, or `name=2` for a weight.

use clap::Subcommand;

use super::{parse_amount, parse_date, resolve_group};
use crate::config::settings::Settings;
use crate::display::entry::{format_entry_details, format_entry_list};
use crate::error::{TallyError, TallyResult};
use crate::models::{EntryDraft, EntryKind, Roster, SplitPolicy, SplitRequest};
use crate::services::{EntryService, EntryUpdate, GroupService, ParticipantService};
use crate::storage::Storage;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record a new expense, income or transfer
    Add {
        /// Group name or ID
        group: String,
        /// Amount (e.g., "42.50")
        amount: String,
        /// Who paid (for income: who received the money)
        #[arg(short = 'p', long)]
        paid_by: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Entry kind (expense, income, transfer)
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Split policy (equal, exact, weighted); defaults to the configured one
        #[arg(long)]
        policy: Option<String>,
        /// Split participant: NAME, NAME=AMOUNT or NAME=WEIGHT (repeatable; default: everyone)
        #[arg(short, long = "split")]
        splits: Vec<String>,
        /// Recipient of a transfer
        #[arg(long)]
        to: Option<String>,
        /// Date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List a group's entries
    List {
        /// Group name or ID
        group: String,
        /// Number of most recent entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an entry and how it was split
    Show {
        /// Group name or ID
        group: String,
        /// Entry ID (short form is fine)
        entry: String,
    },
    /// Edit an entry; splits are recomputed
    Edit {
        /// Group name or ID
        group: String,
        /// Entry ID (short form is fine)
        entry: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New payer
        #[arg(short = 'p', long)]
        paid_by: Option<String>,
        /// New split policy (requires --split unless splitting between everyone)
        #[arg(long)]
        policy: Option<String>,
        /// New split participants, as for `entry add`
        #[arg(short, long = "split")]
        splits: Vec<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Group name or ID
        group: String,
        /// Entry ID (short form is fine)
        entry: String,
    },
}

/// Handle an entry command
pub fn handle_entry_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EntryCommands,
) -> TallyResult<()> {
    let service = EntryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        EntryCommands::Add {
            group,
            amount,
            paid_by,
            description,
            kind,
            policy,
            splits,
            to,
            date,
        } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let participants = ParticipantService::new(storage);

            let amount = parse_amount(&amount)?;
            let date = parse_date(date.as_deref())?;
            let payer = participants.resolve(group.id, &paid_by)?;
            let kind = EntryKind::parse(&kind).ok_or_else(|| {
                TallyError::Validation(format!(
                    "Invalid entry kind: '{}'. Valid kinds: expense, income, transfer",
                    kind
                ))
            })?;

            let draft = if kind.is_transfer() {
                let to = to.ok_or_else(|| {
                    TallyError::Validation("A transfer needs a recipient (--to)".into())
                })?;
                let recipient = participants.resolve(group.id, &to)?;
                EntryDraft::transfer(group.id, payer.id, recipient.id, amount, date)
            } else {
                let policy = parse_policy(policy.as_deref(), settings)?;
                let shares = parse_split_args(&roster, policy, &splits)?;
                EntryDraft::new(group.id, payer.id, amount, policy, shares, date).with_kind(kind)
            };
            let draft = match description {
                Some(d) => draft.with_description(d.trim()),
                None => draft,
            };

            let entry = service.create(draft)?;
            println!(
                "Recorded {} {} ({})",
                entry.kind,
                entry.amount.format_with_symbol(symbol),
                entry.id
            );
            print!("{}", format_entry_details(&entry, &roster, symbol));
        }

        EntryCommands::List { group, limit } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let mut entries = service.list(group.id)?;
            if let Some(limit) = limit {
                let skip = entries.len().saturating_sub(limit);
                entries.drain(..skip);
            }
            print!("{}", format_entry_list(&entries, &roster, symbol));
        }

        EntryCommands::Show { group, entry } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let entry = service.resolve(group.id, &entry)?;
            print!("{}", format_entry_details(&entry, &roster, symbol));
        }

        EntryCommands::Edit {
            group,
            entry,
            amount,
            description,
            paid_by,
            policy,
            splits,
            date,
        } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let existing = service.resolve(group.id, &entry)?;

            let mut changes = EntryUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                description: description.map(|d| d.trim().to_string()),
                date: date.as_deref().map(|d| parse_date(Some(d))).transpose()?,
                ..EntryUpdate::default()
            };
            if let Some(paid_by) = paid_by {
                let payer = ParticipantService::new(storage).resolve(group.id, &paid_by)?;
                changes.payer_id = Some(payer.id);
            }
            if policy.is_some() || !splits.is_empty() {
                if existing.kind.is_transfer() {
                    return Err(TallyError::Validation(
                        "A transfer has no split to change".into(),
                    ));
                }
                let policy = match policy.as_deref() {
                    Some(p) => parse_policy(Some(p), settings)?,
                    None => existing.policy,
                };
                changes.split = Some((policy, parse_split_args(&roster, policy, &splits)?));
            }

            if changes.is_empty() {
                println!(
                    "No changes specified. Use --amount, --description, --paid-by, --split or --date."
                );
                return Ok(());
            }

            let updated = service.update(existing.id, changes)?;
            println!("Updated entry {}", updated.id);
            print!("{}", format_entry_details(&updated, &roster, symbol));
        }

        EntryCommands::Delete { group, entry } => {
            let group = resolve_group(storage, &group)?;
            let entry = service.resolve(group.id, &entry)?;
            let deleted = service.delete(entry.id)?;
            println!("Deleted entry {} ({})", deleted.id, deleted);
        }
    }

    Ok(())
}

fn parse_policy(input: Option<&str>, settings: &Settings) -> TallyResult<SplitPolicy> {
    match input {
        Some(p) => SplitPolicy::parse(p).ok_or_else(|| {
            TallyError::Validation(format!(
                "Invalid split policy: '{}'. Valid policies: equal, exact, weighted",
                p
            ))
        }),
        None => Ok(settings.default_split_policy),
    }
}

/// Turn `--split` arguments into split requests, in the order given
///
/// No arguments means everyone in the group, which only works for policies
/// that do not need a value per participant.
pub(crate) fn parse_split_args(
    roster: &Roster,
    policy: SplitPolicy,
    args: &[String],
) -> TallyResult<Vec<SplitRequest>> {
    if args.is_empty() {
        return match policy {
            SplitPolicy::Equal => Ok(roster
                .participant_ids()
                .into_iter()
                .map(SplitRequest::equal)
                .collect()),
            SplitPolicy::Weighted => Ok(roster
                .participant_ids()
                .into_iter()
                .map(|id| SplitRequest::weighted(id, 1.0))
                .collect()),
            SplitPolicy::ExactAmount => Err(TallyError::Validation(
                "Exact splits need NAME=AMOUNT for every participant".into(),
            )),
        };
    }

    args.iter()
        .map(|arg| {
            let (name, value) = match arg.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (arg.trim(), None),
            };
            let participant = roster
                .find(name)
                .ok_or_else(|| TallyError::participant_reference(name))?;

            match (policy, value) {
                (SplitPolicy::Equal, None) => Ok(SplitRequest::equal(participant.id)),
                (SplitPolicy::Equal, Some(_)) => Err(TallyError::Validation(format!(
                    "'{}': equal splits take names only; use --policy exact or weighted",
                    arg
                ))),
                (SplitPolicy::ExactAmount, Some(v)) => {
                    Ok(SplitRequest::exact(participant.id, parse_amount(v)?))
                }
                (SplitPolicy::ExactAmount, None) => Err(TallyError::Validation(format!(
                    "'{}': exact splits need NAME=AMOUNT",
                    arg
                ))),
                (SplitPolicy::Weighted, Some(v)) => {
                    let weight = v.parse::<f64>().map_err(|_| {
                        TallyError::Validation(format!("'{}': invalid weight '{}'", arg, v))
                    })?;
                    Ok(SplitRequest::weighted(participant.id, weight))
                }
                (SplitPolicy::Weighted, None) => Ok(SplitRequest::weighted(participant.id, 1.0)),
            }
        })
        .collect()
}
