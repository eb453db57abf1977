//! Human-readable rendering of bus events and the final summary.

use combat_core::{CombatEvent, EncounterSummary, Outcome, SelectionSource};
use runtime::{Event, LifecycleEvent};

/// One log line per event, or `None` for events not worth printing.
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::Combat(event) => describe_combat(event),
        Event::Lifecycle(LifecycleEvent::EncounterStarted { enemy, seed }) => {
            Some(format!("== encounter vs {enemy} (seed {seed}) =="))
        }
        Event::Lifecycle(LifecycleEvent::PlayRejected { command, error }) => {
            Some(format!("   ! {command} rejected: {error}"))
        }
        Event::Lifecycle(LifecycleEvent::EncounterFinished { .. }) => None,
    }
}

fn describe_combat(event: &CombatEvent) -> Option<String> {
    let line = match event {
        CombatEvent::RoundStarted { round, initiative } => format!(
            "-- round {round}: {} acts first ({:?})",
            initiative.first, initiative.tier
        ),
        CombatEvent::CardPlayed {
            card, energy_left, ..
        } => format!("   player plays {card} ({energy_left} energy left)"),
        CombatEvent::EnemyIntent { action, source } => match source {
            SelectionSource::Scripted { phase } => {
                format!("   enemy uses {action} (scripted, phase {phase})")
            }
            SelectionSource::Pooled { probability, .. } => {
                format!("   enemy uses {action} ({:.0}%)", probability * 100.0)
            }
        },
        CombatEvent::EnemyIdle { reason } => format!("   enemy idles: {reason:?}"),
        CombatEvent::ActionResolved {
            actor,
            action,
            hits,
            guard_gained,
            healed,
            ..
        } => {
            let damage: u32 = hits.iter().map(|hit| hit.damage.final_damage).sum();
            let crits = hits.iter().filter(|hit| hit.damage.is_critical).count();
            let mut line = format!("   {actor} {action}: {damage} damage");
            if crits > 0 {
                line.push_str(&format!(", {crits} critical"));
            }
            if *guard_gained > 0 {
                line.push_str(&format!(", +{guard_gained} guard"));
            }
            if *healed > 0 {
                line.push_str(&format!(", +{healed} health"));
            }
            line
        }
        CombatEvent::PeriodicDamage { side, amount } => {
            format!("   {side} takes {amount} periodic damage")
        }
        CombatEvent::EffectsApplied { side, kinds } => format!("   {side} gains {}", join(kinds)),
        CombatEvent::EffectsExpired { side, kinds } => format!("   {side} loses {}", join(kinds)),
        CombatEvent::InvariantViolated { side, violation } => {
            format!("   ! {side} invariant violated: {violation}")
        }
        CombatEvent::EncounterEnded { outcome, round } => {
            format!("== {} in round {round} ==", outcome_label(*outcome))
        }
        CombatEvent::PhaseStarted { .. }
        | CombatEvent::Restored { .. }
        | CombatEvent::CardsDrawn { .. }
        | CombatEvent::HandDiscarded { .. } => return None,
    };
    Some(line)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
    }
}

pub fn summary(summary: &EncounterSummary) -> String {
    let outcome = summary.outcome.map_or("unfinished", outcome_label);
    format!(
        "outcome: {outcome}\nrounds: {}\nenemy phases: {}\nplayer health: {} (armor {})\nenemy health: {}",
        summary.rounds,
        summary.enemy_phases,
        summary.player_health,
        summary.player_secondary_armor,
        summary.enemy_health,
    )
}
