use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use encounter_engine::api::{simulate_adventure, simulate_adventure_many};
use encounter_engine::config::AdventureConfig;
use encounter_engine::content::builtin_store;
use encounter_engine::store::{AdventureStore, CharacterStore, JsonStore};
use encounter_engine::{level_for_xp, Adventure, AdventureOutcome, Character};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Args)]
struct RunArgs {
    /// YAML or JSON run config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Adventure name
    #[arg(long)]
    adventure: Option<String>,
    /// Party member names, comma separated (3 to 5)
    #[arg(long, value_delimiter = ',')]
    party: Vec<String>,
    /// Data directory with characters.json, monsters.json, adventures.json
    #[arg(long)]
    data: Option<PathBuf>,
    /// RNG seed for determinism
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Play one adventure and print the log
    Play {
        #[command(flatten)]
        run: RunArgs,
        /// Do not write experience back to the data directory
        #[arg(long, default_value_t = false)]
        no_save: bool,
        /// Print the result as JSON instead of the log
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay an adventure many times (trial i uses seed+i) and summarize
    Simulate {
        #[command(flatten)]
        run: RunArgs,
        /// Number of trials
        #[arg(long, default_value_t = 1000)]
        trials: u32,
    },
    /// List characters, optionally filtered by player
    Characters {
        #[arg(long)]
        data: Option<PathBuf>,
        /// Case-insensitive substring of the owning player
        #[arg(long)]
        player: Option<String>,
    },
    /// List adventures and their encounters
    Adventures {
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "encounter")]
#[command(about = "Turn-based adventure runner")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn build_config(run: RunArgs) -> anyhow::Result<AdventureConfig> {
    let mut cfg = match &run.config {
        Some(path) => AdventureConfig::from_path(path)?,
        None => {
            let Some(adventure) = run.adventure.clone() else {
                bail!("--adventure is required without --config");
            };
            AdventureConfig::new(adventure, Vec::new())
        }
    };
    if let Some(adventure) = run.adventure {
        cfg.adventure = adventure;
    }
    if !run.party.is_empty() {
        cfg.party = run.party;
    }
    if let Some(dir) = run.data {
        cfg.data_dir = Some(dir.display().to_string());
    }
    if run.seed.is_some() {
        cfg.seed = run.seed;
    }
    Ok(cfg)
}

fn load_characters(data: Option<PathBuf>, player: Option<&str>) -> anyhow::Result<Vec<Character>> {
    let characters = match data {
        Some(dir) => JsonStore::open(&dir)
            .characters_by_owner(player)
            .with_context(|| format!("failed to load characters from {}", dir.display()))?,
        None => builtin_store()?.characters_by_owner(player)?,
    };
    Ok(characters)
}

fn load_adventures(data: Option<PathBuf>) -> anyhow::Result<Vec<Adventure>> {
    let adventures = match data {
        Some(dir) => JsonStore::open(&dir)
            .adventures()
            .with_context(|| format!("failed to load adventures from {}", dir.display()))?,
        None => builtin_store()?.adventures()?,
    };
    Ok(adventures)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Play { run, no_save, json } => {
            let mut cfg = build_config(run)?;
            if no_save {
                cfg.save = false;
            }
            info!(
                adventure = %cfg.adventure,
                party = ?cfg.party,
                seed = ?cfg.seed,
                save = cfg.save,
                "playing adventure"
            );
            let res = simulate_adventure(cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
                return Ok(());
            }
            for line in &res.log {
                println!("{}", line);
            }
            match res.outcome {
                AdventureOutcome::Victory => println!(
                    "Outcome: VICTORY ({} encounters cleared)",
                    res.encounters_cleared
                ),
                AdventureOutcome::Defeat { encounter } => println!(
                    "Outcome: DEFEAT in encounter {} ({} cleared)",
                    encounter + 1,
                    res.encounters_cleared
                ),
            }
            for m in &res.party {
                println!(
                    "  {}: level {} xp={} hp={}/{}",
                    m.name, m.level, m.xp, m.hp, m.max_hp
                );
            }
        }
        Cmd::Simulate { run, trials } => {
            let cfg = build_config(run)?;
            let name = cfg.adventure.clone();
            info!(adventure = %name, trials, seed = ?cfg.seed, "simulating adventure");
            let stats = simulate_adventure_many(cfg, trials)?;
            let pct = |n: u32| {
                if stats.samples == 0 {
                    0.0
                } else {
                    100.0 * f64::from(n) / f64::from(stats.samples)
                }
            };
            println!("Adventure: {}", name);
            println!("Trials: {}", stats.samples);
            println!("Victories: {} ({:.1}%)", stats.victories, pct(stats.victories));
            println!("Defeats: {} ({:.1}%)", stats.defeats, pct(stats.defeats));
            for (i, n) in stats.defeats_by_encounter.iter().enumerate() {
                println!("  fell in encounter {}: {}", i + 1, n);
            }
            println!("Avg encounters cleared: {:.2}", stats.avg_encounters_cleared);
        }
        Cmd::Characters { data, player } => {
            for c in load_characters(data, player.as_deref())? {
                println!(
                    "{} ({}) {} level {} xp={} body={} mind={} spirit={}",
                    c.name,
                    c.player,
                    c.class,
                    level_for_xp(c.xp),
                    c.xp,
                    c.body,
                    c.mind,
                    c.spirit
                );
            }
        }
        Cmd::Adventures { data } => {
            for adventure in load_adventures(data)? {
                println!("{}", adventure.name());
                for (i, encounter) in adventure.encounters().iter().enumerate() {
                    let roster = encounter
                        .summary()
                        .into_iter()
                        .map(|(name, n)| format!("{}x {}", n, name))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!(
                        "  {}. {} ({} XP)",
                        i + 1,
                        roster,
                        encounter.total_experience()
                    );
                }
            }
        }
    }
    Ok(())
}
