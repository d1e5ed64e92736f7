//! `horadric`: keep a local copy of the game's reference data and query it.

use clap::{Parser, Subcommand, ValueEnum};
use horadric_cache::{Database, Repository};
use horadric_config::{Config, TableSource};
use horadric_extract::models::{CharClass, Modifier};
use horadric_source::BackendHandle;
use horadric_source::backend::{HttpBackend, LocalBackend};
use horadric_sync::{Pages, Sources, SyncReason, SyncState, Synchronizer};
use miette::{Result, miette};
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "horadric", version, about)]
struct Cli {
    /// Configuration file to use instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bring the local database up to date with the publisher.
    Sync {
        /// Download and compare everything even if the version is unchanged.
        #[arg(long)]
        force: bool,
    },
    /// Show the stored version and record counts.
    Status,
    /// Print stored records.
    Show {
        entity: Entity,
        /// Name to look up (a class for skills, an index for monsters, a code
        /// for base items).
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Entity {
    Properties,
    Socketables,
    Runewords,
    Uniques,
    Sets,
    BaseItems,
    ItemTypes,
    Monsters,
    Skills,
    Coupons,
}

/// `Exn` errors render their whole tree with `Debug`.
fn report(err: impl Debug) -> miette::Report {
    miette!("{err:?}")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(report)?;
    let db = Database::connect(&config.database).await.map_err(report)?;
    let repo = Repository::from(&db);
    let result = match cli.command {
        Command::Sync { force } => sync(&config, repo, force).await,
        Command::Status => status(&db, &repo).await,
        Command::Show { entity, name } => show(&repo, entity, name.as_deref()).await,
    };
    db.close().await;
    result
}

fn sources(config: &Config) -> Result<Sources> {
    let timeout = config.fetch.timeout();
    let site: BackendHandle = Arc::new(HttpBackend::new("site", &config.remote.base_url, timeout).map_err(report)?);
    let tables: BackendHandle = match &config.tables {
        TableSource::Local { path } => Arc::new(LocalBackend::new("mirror", path).map_err(report)?),
        TableSource::Remote { base_url } => Arc::new(HttpBackend::new("tables", base_url, timeout).map_err(report)?),
    };
    let pages = Pages {
        changelog: config.remote.changelog.clone(),
        gems: config.remote.gems.clone(),
        runewords: config.remote.runewords.clone(),
    };
    Ok(Sources { site, tables, pages })
}

async fn sync(config: &Config, repo: Repository, force: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted; abandoning downloads");
                cancel.cancel();
            }
        }
    });
    let synchronizer = Synchronizer::new(sources(config)?, &config.product, repo)
        .with_timeout(config.fetch.timeout())
        .with_cancellation(cancel);
    let reason = if force { SyncReason::Explicit } else { SyncReason::Routine };
    match synchronizer.run(reason).await {
        Ok(Some(outcome)) => println!("{outcome}"),
        Ok(None) => println!("A sync is already running"),
        Err(err) => {
            if let SyncState::Error { stale_data: true, .. } = synchronizer.state() {
                eprintln!("Previously synced data is still available.");
            }
            return Err(report(err));
        },
    }
    Ok(())
}

async fn status(db: &Database, repo: &Repository) -> Result<()> {
    if let Some(schema) = db.schema_version().await.map_err(report)? {
        println!("Schema:      {schema}");
    }
    match repo.sync_metadata().await.map_err(report)? {
        None => println!("Never synced."),
        Some(metadata) => {
            let synced_at = OffsetDateTime::from(metadata.synced_at).format(&Rfc3339).map_err(report)?;
            println!("Version:     {}", metadata.version);
            println!("Released:    {}", metadata.released_on);
            println!("Last synced: {synced_at}");
        },
    }
    for (table, count) in repo.counts().await.map_err(report)? {
        println!("{table:>15}: {count}");
    }
    Ok(())
}

fn modifiers(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn matches_name(filter: Option<&str>, name: &str) -> bool {
    filter.is_none_or(|filter| name.to_lowercase().contains(&filter.to_lowercase()))
}

async fn show(repo: &Repository, entity: Entity, name: Option<&str>) -> Result<()> {
    match entity {
        Entity::Properties => {
            for property in repo.properties().await.map_err(report)? {
                if matches_name(name, &property.code) {
                    println!("{}\t{}\t{}", property.code, property.description, property.stats.join(", "));
                }
            }
        },
        Entity::Socketables => {
            for socketable in repo.socketables().await.map_err(report)? {
                if matches_name(name, &socketable.name) {
                    println!("{} [{}] ({})", socketable.name, socketable.code, socketable.kind);
                    println!("  weapon: {}", modifiers(&socketable.weapon));
                    println!("  helm:   {}", modifiers(&socketable.helm));
                    println!("  shield: {}", modifiers(&socketable.shield));
                }
            }
        },
        Entity::Runewords => {
            let runewords = match name {
                Some(name) => repo.runeword_by_name(name).await.map_err(report)?.into_iter().collect(),
                None => repo.runewords().await.map_err(report)?,
            };
            for runeword in runewords {
                println!("{} ({} sockets): {}", runeword.name, runeword.sockets(), runeword.rune_names.join(" + "));
                println!("  types: {}", runeword.item_types.join(", "));
                for line in &runeword.effects {
                    println!("  {line}");
                }
            }
        },
        Entity::Uniques => {
            let uniques = match name {
                Some(name) => repo.uniques_by_name(name).await.map_err(report)?,
                None => repo.uniques().await.map_err(report)?,
            };
            for unique in uniques {
                let coupon = if unique.coupon { " [coupon]" } else { "" };
                println!("{} ({}, level {}){coupon}", unique.name, unique.base_name, unique.level_req);
                println!("  {}", modifiers(&unique.modifiers));
            }
        },
        Entity::Sets => match name {
            Some(name) => {
                let Some((set, items)) = repo.set_with_items(name).await.map_err(report)? else {
                    return Err(miette!("no set named '{name}'"));
                };
                println!("{}", set.name);
                println!("  partial: {}", modifiers(&set.partial));
                println!("  full:    {}", modifiers(&set.full));
                for item in items {
                    println!("  - {} ({}): {}", item.name, item.base_name, modifiers(&item.modifiers));
                }
            },
            None => {
                for set in repo.sets().await.map_err(report)? {
                    println!("{}", set.name);
                }
            },
        },
        Entity::BaseItems => {
            let items = match name {
                Some(code) => repo.base_item(code).await.map_err(report)?.into_iter().collect(),
                None => repo.base_items().await.map_err(report)?,
            };
            for item in items {
                println!("{}\t{}\t{}\t{}", item.code, item.name, item.category, item.item_type);
            }
        },
        Entity::ItemTypes => {
            for item_type in repo.item_types().await.map_err(report)? {
                if matches_name(name, &item_type.name) {
                    println!("{}\t{}\t{}", item_type.code, item_type.name, item_type.equivalents.join(", "));
                }
            }
        },
        Entity::Monsters => match name {
            Some(index) => {
                let index: u32 = index.parse().map_err(|_| miette!("monster index must be a number"))?;
                match repo.monster_name(index).await.map_err(report)? {
                    Some(monster) => println!("{index}\t{monster}"),
                    None => return Err(miette!("no monster with index {index}")),
                }
            },
            None => {
                for monster in repo.monsters().await.map_err(report)? {
                    println!("{}\t{}\t{}", monster.index, monster.id, monster.name);
                }
            },
        },
        Entity::Skills => {
            let skills = match name {
                Some(class) => {
                    let class: CharClass = class.parse().map_err(report)?;
                    repo.skills_by_class(class).await.map_err(report)?
                },
                None => repo.skills().await.map_err(report)?,
            };
            for skill in skills {
                println!("{}\t{}", skill.name, skill.class);
            }
        },
        Entity::Coupons => {
            for name in repo.coupon_uniques().await.map_err(report)? {
                println!("{name}");
            }
        },
    }
    Ok(())
}
