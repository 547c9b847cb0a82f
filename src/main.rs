use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};

use subconverter_editor::drafts::JsonFileDraftCache;
use subconverter_editor::editor::{validate_document, GroupStats, RulesetStats};
use subconverter_editor::settings::EditorSettings;
use subconverter_editor::vfs::{LocalDirStorage, ProfileStorage};
use subconverter_editor::{parse, stringify, DocumentStore, DraftChoice, EditorSession};

/// Inspect and edit subconverter external config profiles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the profiles (overrides the settings file)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the profiles in the profile directory
    List,
    /// Print sections and statistics of a profile
    Show {
        file: String,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report duplicate group names and circular group references
    Check { file: String },
    /// Print the canonical form of a profile (comments are not kept)
    Fmt {
        file: String,
        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Rename a proxy group
    RenameGroup {
        file: String,
        from: String,
        to: String,
        /// Continue from an unsaved draft if one exists
        #[arg(long)]
        restore_draft: bool,
    },
    /// Delete a proxy group
    DeleteGroup {
        file: String,
        name: String,
        #[arg(long)]
        restore_draft: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = EditorSettings::load_or_default(args.config.as_deref())
        .context("failed to load settings")?;
    if let Some(dir) = args.dir {
        settings.profiles_dir = dir;
    }

    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args.command, settings))
}

async fn run(command: Command, settings: EditorSettings) -> anyhow::Result<()> {
    let storage = LocalDirStorage::new(&settings.profiles_dir, &settings.extension);
    info!("Using profile directory {}", storage.root().display());

    match command {
        Command::List => {
            for name in storage.list_documents().await? {
                println!("{}", name);
            }
        }
        Command::Show { file, json } => {
            let document = parse(&storage.read_document(&file).await?);
            let group_stats = GroupStats::collect(&document);
            let ruleset_stats = RulesetStats::collect(&document);
            if json {
                let value = serde_json::json!({
                    "sections": document.sections.iter().map(|s| &s.name).collect::<Vec<_>>(),
                    "groups": group_stats,
                    "rulesets": ruleset_stats,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for section in &document.sections {
                    println!(
                        "[{}] {} config, {} rulesets, {} groups",
                        section.name,
                        section.config.len(),
                        section.rulesets.len(),
                        section.proxy_groups.len()
                    );
                }
                println!("groups: {}", group_stats.total);
                for (group_type, count) in &group_stats.by_type {
                    println!("  {}: {}", group_type, count);
                }
                println!("rulesets: {}", ruleset_stats.total);
                for (kind, count) in &ruleset_stats.by_type {
                    println!("  {}: {}", kind.as_str(), count);
                }
            }
        }
        Command::Check { file } => {
            let document = parse(&storage.read_document(&file).await?);
            let issues = validate_document(&document);
            if issues.is_empty() {
                println!("{}: ok", file);
            } else {
                for issue in &issues {
                    println!("{}: {}", file, issue);
                }
                bail!("{} issue(s) found in {}", issues.len(), file);
            }
        }
        Command::Fmt { file, write } => {
            let content = storage.read_document(&file).await?;
            let formatted = stringify(&parse(&content));
            if write {
                storage.write_document(&file, &formatted).await?;
            } else {
                println!("{}", formatted);
            }
        }
        Command::RenameGroup {
            file,
            from,
            to,
            restore_draft,
        } => {
            let mut session = open_session(storage, &settings, &file, restore_draft).await?;
            let mut group = session
                .store()
                .document()
                .find_group(&from)
                .cloned()
                .ok_or_else(|| anyhow!("no group named '{}' in {}", from, file))?;
            group.name = to;
            session.edit(|store| store.update_group(group, Some(from.as_str())))?;
            session.save_file().await?;
        }
        Command::DeleteGroup {
            file,
            name,
            restore_draft,
        } => {
            let mut session = open_session(storage, &settings, &file, restore_draft).await?;
            if session.store().document().find_group(&name).is_none() {
                bail!("no group named '{}' in {}", name, file);
            }
            session.edit(|store| store.delete_group(&name));
            session.save_file().await?;
        }
    }

    Ok(())
}

async fn open_session(
    storage: LocalDirStorage,
    settings: &EditorSettings,
    file: &str,
    restore_draft: bool,
) -> anyhow::Result<EditorSession<LocalDirStorage, JsonFileDraftCache>> {
    let drafts = JsonFileDraftCache::open(&settings.draft_file);
    let store = DocumentStore::with_history_limit("", settings.history_limit);
    let mut session = EditorSession::with_store(storage, drafts, store);

    session
        .load_file(file, |conflict| {
            if restore_draft {
                DraftChoice::Restore
            } else {
                warn!(
                    "Discarding unsaved draft of {} ({} bytes)",
                    conflict.name,
                    conflict.draft.len()
                );
                DraftChoice::Discard
            }
        })
        .await?;
    Ok(session)
}
