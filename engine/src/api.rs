use anyhow::{Context, Result};
use serde::Serialize;

use crate::classes::ClassRegistry;
use crate::combat::HitOutcome;
use crate::config::AdventureConfig;
use crate::content::builtin_store;
use crate::events::{ActionReport, Event};
use crate::lifecycle::{play_adventure, AdventureOutcome, AdventureReport};
use crate::store::{AdventureStore, CharacterStore, JsonStore, MemoryStore, MonsterStore};
use crate::{Combatant, Dice};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberSummary {
    pub name: String,
    pub xp: u32,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdventureResult {
    pub adventure: String,
    pub outcome: AdventureOutcome,
    pub encounters_cleared: usize,
    pub party: Vec<MemberSummary>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdventureStats {
    pub samples: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Defeat count per encounter index.
    pub defeats_by_encounter: Vec<u32>,
    pub avg_encounters_cleared: f64,
}

/// Play one adventure described by `cfg`, collecting a readable log.
pub fn simulate_adventure(cfg: AdventureConfig) -> Result<AdventureResult> {
    let mut dice = cfg.seed.map(Dice::from_seed).unwrap_or_else(Dice::from_entropy);
    let mut store = open_store(&cfg)?;
    let mut logs = Vec::new();

    let report = match &mut store {
        Store::Json(json) => run(json, &cfg, &mut dice, &mut logs)?,
        Store::Memory(mem) => run(mem, &cfg, &mut dice, &mut logs)?,
    };

    Ok(AdventureResult {
        adventure: cfg.adventure.clone(),
        outcome: report.outcome,
        encounters_cleared: report.encounters_cleared,
        party: report
            .party
            .iter()
            .map(|c| MemberSummary {
                name: c.name.clone(),
                xp: c.xp,
                level: c.level(),
                hp: c.current_hp(),
                max_hp: c.max_hp(),
            })
            .collect(),
        log: logs,
    })
}

/// Replay the same adventure `samples` times; sample `i` uses `seed + i`.
/// Nothing is written back.
pub fn simulate_adventure_many(cfg: AdventureConfig, samples: u32) -> Result<AdventureStats> {
    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    let store = match open_store(&cfg)? {
        Store::Json(json) => snapshot(&json)?,
        Store::Memory(mem) => mem,
    };
    let encounters = store
        .adventure(&cfg.adventure)
        .with_context(|| format!("adventure '{}' not found", cfg.adventure))?
        .encounters()
        .len();

    let registry = ClassRegistry::default();
    let mut stats = AdventureStats {
        samples,
        victories: 0,
        defeats: 0,
        defeats_by_encounter: vec![0; encounters],
        avg_encounters_cleared: 0.0,
    };
    let mut cleared_total = 0u64;

    for i in 0..samples {
        let mut dice = Dice::from_seed(base_seed.wrapping_add(u64::from(i)));
        // A fresh copy per sample keeps earlier samples' experience out.
        let mut sample_store = store.clone();
        let report = play_adventure(
            &mut sample_store,
            &cfg.adventure,
            &cfg.party,
            &registry,
            &mut dice,
            |_| {},
        )?;
        cleared_total += report.encounters_cleared as u64;
        match report.outcome {
            AdventureOutcome::Victory => stats.victories += 1,
            AdventureOutcome::Defeat { encounter } => {
                stats.defeats += 1;
                stats.defeats_by_encounter[encounter] += 1;
            }
        }
    }

    if samples > 0 {
        stats.avg_encounters_cleared = cleared_total as f64 / f64::from(samples);
    }
    Ok(stats)
}

enum Store {
    Json(JsonStore),
    Memory(MemoryStore),
}

fn open_store(cfg: &AdventureConfig) -> Result<Store> {
    match &cfg.data_dir {
        Some(dir) if cfg.save => Ok(Store::Json(JsonStore::open(dir))),
        Some(dir) => Ok(Store::Memory(snapshot(&JsonStore::open(dir))?)),
        None => Ok(Store::Memory(builtin_store()?)),
    }
}

/// Copy every record of a JSON store into memory.
fn snapshot(json: &JsonStore) -> Result<MemoryStore> {
    let dir = json.dir().display();
    Ok(MemoryStore::new(
        json.characters_by_owner(None)
            .with_context(|| format!("failed to load characters from {}", dir))?,
        json.monsters()
            .with_context(|| format!("failed to load monsters from {}", dir))?,
        json.adventures()
            .with_context(|| format!("failed to load adventures from {}", dir))?,
    ))
}

fn run<S: CharacterStore + AdventureStore>(
    store: &mut S,
    cfg: &AdventureConfig,
    dice: &mut Dice,
    logs: &mut Vec<String>,
) -> Result<AdventureReport> {
    let registry = ClassRegistry::default();
    let report = play_adventure(store, &cfg.adventure, &cfg.party, &registry, dice, |event| {
        logs.extend(describe(event));
    })
    .with_context(|| format!("failed to play '{}'", cfg.adventure))?;
    Ok(report)
}

/// Render an event as one tagged log line. Round ends render as nothing.
pub fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::EncounterStarted {
            index,
            total,
            monsters,
        } => {
            let roster = monsters
                .iter()
                .map(|(name, n)| format!("{}x {}", n, name))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[ENCOUNTER] {}/{}: {}", index + 1, total, roster)
        }
        Event::Prepared { name, spirit } => format!("[PREP][{}] spirit → {}", name, spirit),
        Event::TurnOrder { order } => {
            let order = order
                .iter()
                .map(|v| format!("{} ({})", v.name, v.initiative))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[ORDER] {}", order)
        }
        Event::RoundStarted { round, combatants } => {
            let hp = combatants
                .iter()
                .map(|v| format!("{} {}/{}", v.name, v.current_hp, v.max_hp))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[ROUND] {} | {}", round, hp)
        }
        Event::Action(report) => describe_action(report),
        Event::RoundEnded { .. } => return None,
        Event::EncounterWon { index, xp } => {
            format!("[VICTORY] encounter {} cleared (+{} XP)", index + 1, xp)
        }
        Event::ExperienceGained {
            name,
            gained,
            total_xp,
            level,
            leveled_up,
        } => format!(
            "[XP][{}] +{} → {} XP, level {}{}",
            name,
            gained,
            total_xp,
            level,
            if *leveled_up { " LEVEL UP!" } else { "" }
        ),
        Event::ShortRest {
            name,
            healed,
            current_hp,
            max_hp,
        } => format!("[REST][{}] +{} HP ({}/{})", name, healed, current_hp, max_hp),
        Event::PartyDefeated { index } => {
            format!("[DEFEAT] the party falls in encounter {}", index + 1)
        }
        Event::AdventureWon { name } => format!("[END] {} complete", name),
    };
    Some(line)
}

fn describe_action(report: &ActionReport) -> String {
    let outcome = match report.outcome {
        HitOutcome::Critical => "CRIT!",
        HitOutcome::Normal => "HIT",
        HitOutcome::Fail => "MISS (NAT1)",
    };
    let damage = match &report.damage_type {
        Some(dtype) if !dtype.is_empty() => format!("dmg={} [{}]", report.damage, dtype),
        _ => format!("dmg={}", report.damage),
    };
    let mut line = format!(
        "[ATTACK][{}] hit={} {} {} → {}",
        report.actor,
        report.hit_die,
        outcome,
        damage,
        report.targets.join(", ")
    );
    if !report.felled.is_empty() {
        line.push_str(&format!(" ✖ {} down", report.felled.join(", ")));
    }
    line
}
