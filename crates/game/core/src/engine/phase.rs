//! Round and phase procedures.
//!
//! Each procedure is a complete unit of work: a phase never begins while the
//! previous one is partially applied.

use crate::action::select_action;
use crate::env::RngOracle;
use crate::state::{Outcome, Phase, Side};
use crate::stats::resolve_initiative;

use super::{Advance, CombatEngine, CombatEvent, EnemyTurn, IdleReason, disabling_effect};

impl<R: RngOracle> CombatEngine<R> {
    /// Runs phases in queue order until the player must decide or the
    /// encounter ends.
    pub(super) fn advance(&mut self) -> Advance {
        let mut advance = Advance::default();

        while !self.state.turn.is_finished() {
            let Some(side) = self.state.turn.next_side() else {
                self.begin_round();
                continue;
            };
            self.state.turn.slot += 1;

            match side {
                Side::Player => {
                    self.begin_player_phase();
                    if !self.state.turn.is_finished() {
                        break;
                    }
                }
                Side::Enemy => {
                    let turn = self.run_enemy_phase();
                    advance.enemy_turns.push(turn);
                }
            }
        }

        advance
    }

    /// Recomputes initiative; the queue is never carried across rounds.
    fn begin_round(&mut self) {
        let initiative = resolve_initiative(&self.state.player, &self.state.enemy, &self.config);
        let turn = &mut self.state.turn;
        turn.round += 1;
        turn.slot = 0;
        turn.initiative = Some(initiative);

        tracing::debug!(
            round = turn.round,
            first = %initiative.first,
            tier = ?initiative.tier,
            player_speed = initiative.player_speed,
            enemy_speed = initiative.enemy_speed,
            "round started"
        );
        self.events.push(CombatEvent::RoundStarted {
            round: turn.round,
            initiative,
        });
    }

    /// Restorations, energy refill and draw.
    fn begin_player_phase(&mut self) {
        let round = self.state.turn.round;
        self.state.turn.phase = Phase::PlayerPhase;
        self.events.push(CombatEvent::PhaseStarted {
            side: Side::Player,
            round,
        });

        self.restore(Side::Player);

        let penalty = self.state.player.status.energy_penalty(&self.config);
        self.state.turn.energy = self.config.energy_per_turn.saturating_sub(penalty);

        let report = self
            .state
            .deck
            .draw(self.config.cards_per_draw, &mut self.dice);
        self.events.push(CombatEvent::CardsDrawn {
            count: report.drawn,
            reshuffled: report.reshuffled,
        });

        tracing::debug!(
            round,
            energy = self.state.turn.energy,
            hand = self.state.deck.hand().len(),
            "player phase started"
        );
    }

    /// Player periodic damage, then decay, then the hand is discarded.
    pub(super) fn finish_player_phase(&mut self) {
        self.state.turn.phase = Phase::EndPlayerPhase;
        self.tick_effects(Side::Player);

        let count = self.state.deck.discard_hand();
        self.state.turn.energy = 0;
        self.events.push(CombatEvent::HandDiscarded { count });
    }

    /// Enemy periodic damage, decay, restorations, selection, resolution.
    ///
    /// Action gating is read when the phase begins, so a one-phase stun
    /// costs the enemy this action before it expires in decay.
    fn run_enemy_phase(&mut self) -> EnemyTurn {
        let turn = &mut self.state.turn;
        turn.phase = Phase::EnemyPhase;
        turn.enemy_phase_counter += 1;
        let round = turn.round;
        let phase_counter = turn.enemy_phase_counter;

        self.events.push(CombatEvent::PhaseStarted {
            side: Side::Enemy,
            round,
        });

        let mut report = EnemyTurn {
            round,
            phase_counter,
            action: None,
            source: None,
            resolution: None,
            idle: None,
        };

        let disabled = disabling_effect(&self.state.enemy);

        self.tick_effects(Side::Enemy);
        if self.state.turn.is_finished() {
            return report;
        }
        self.restore(Side::Enemy);

        if let Some(kind) = disabled {
            tracing::debug!(phase_counter, status = %kind, "enemy is disabled");
            return self.idle(report, IdleReason::Disabled(kind));
        }

        let selection = select_action(
            &self.enemy.patterns,
            phase_counter,
            self.state.enemy.health,
            self.state.enemy.max_health,
            &mut self.dice,
            &self.config,
        );
        let Some(selection) = selection else {
            tracing::warn!(
                enemy = %self.enemy.id,
                phase_counter,
                health = self.state.enemy.health,
                "no eligible enemy pattern; enemy idles"
            );
            return self.idle(report, IdleReason::NoEligiblePattern);
        };

        let action = selection.action.clone();
        self.events.push(CombatEvent::EnemyIntent {
            action: action.name.clone(),
            source: selection.source,
        });

        report.source = Some(selection.source);
        report.resolution = Some(self.resolve(Side::Enemy, &action));
        report.action = Some(action);
        report
    }

    fn idle(&mut self, mut report: EnemyTurn, reason: IdleReason) -> EnemyTurn {
        self.events.push(CombatEvent::EnemyIdle { reason });
        report.idle = Some(reason);
        report
    }

    /// Periodic damage from the pre-decay ledger, then the decayed ledger.
    ///
    /// Periodic damage bypasses guard and secondary armor.
    fn tick_effects(&mut self, side: Side) {
        let combatant = self.state.combatant_mut(side);
        let advance = combatant.status.advance();
        combatant.status = advance.ledger;

        if advance.periodic_damage > 0 {
            combatant.lose_health(advance.periodic_damage);
            tracing::debug!(%side, amount = advance.periodic_damage, "periodic damage");
            self.events.push(CombatEvent::PeriodicDamage {
                side,
                amount: advance.periodic_damage,
            });
        }
        if !advance.expired.is_empty() {
            self.events.push(CombatEvent::EffectsExpired {
                side,
                kinds: advance.expired,
            });
        }

        self.settle();
    }

    /// Start-of-phase regen and shield regen.
    fn restore(&mut self, side: Side) {
        let combatant = self.state.combatant_mut(side);
        let restoration = combatant.status.restoration();
        if restoration.is_empty() {
            return;
        }

        let healed = combatant.heal(restoration.health);
        combatant.gain_guard(restoration.guard);
        self.events.push(CombatEvent::Restored {
            side,
            health: healed,
            guard: restoration.guard,
        });

        self.settle();
    }

    /// Clamps pools back into range and checks for victory or defeat.
    pub(super) fn settle(&mut self) {
        for side in [Side::Player, Side::Enemy] {
            for violation in self.state.combatant_mut(side).enforce_invariants() {
                tracing::error!(
                    %side,
                    pool = ?violation.pool,
                    observed = violation.observed,
                    clamped = violation.clamped,
                    "combatant invariant violated"
                );
                self.events
                    .push(CombatEvent::InvariantViolated { side, violation });
            }
        }

        if self.state.turn.is_finished() {
            return;
        }

        if let Some(outcome) = Outcome::judge(self.state.player.health, self.state.enemy.health) {
            let turn = &mut self.state.turn;
            turn.outcome = Some(outcome);
            turn.phase = Phase::Finished;
            turn.energy = 0;

            tracing::info!(
                ?outcome,
                round = turn.round,
                enemy_phases = turn.enemy_phase_counter,
                "encounter ended"
            );
            self.events.push(CombatEvent::EncounterEnded {
                outcome,
                round: turn.round,
            });
        }
    }
}
