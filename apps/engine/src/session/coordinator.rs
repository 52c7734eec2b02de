//! Per-session coordinator: the single-writer action queue.
//!
//! One tokio task owns a session's `GameState` exclusively. Inbound actions
//! are queued and applied strictly in submission order; a phase handler runs
//! to completion before the next action is considered, which eliminates the
//! race class where two participants' near-simultaneous messages interleave
//! mid-mutation. Bots submit through the same queue as humans.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::action::{ActionKind, Committed, GameAction, SessionEvent};
use crate::domain::rules::{DEFAULT_TARGET_SCORE, PLAYERS};
use crate::domain::snapshot::{snapshot, SeatPublic};
use crate::domain::state::GameState;
use crate::domain::{declaration, preparation, scoring, turn};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;

pub type SessionId = Uuid;

/// Per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub seating: [SeatPublic; PLAYERS],
    /// First cumulative total at or above this ends the game.
    pub target_score: i16,
    /// Dealing seed; random when unset.
    pub rng_seed: Option<u64>,
    /// Bound on queued-but-unapplied actions.
    pub queue_capacity: usize,
    /// Bound on undelivered broadcast events per subscriber.
    pub broadcast_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seating: [
                SeatPublic::human(0, "Player 1"),
                SeatPublic::human(1, "Player 2"),
                SeatPublic::human(2, "Player 3"),
                SeatPublic::human(3, "Player 4"),
            ],
            target_score: DEFAULT_TARGET_SCORE,
            rng_seed: None,
            queue_capacity: 64,
            broadcast_capacity: 64,
        }
    }
}

struct Envelope {
    action: GameAction,
    reply: oneshot::Sender<Result<Committed, DomainError>>,
}

/// Handle to a running session. Cloneable; dropping every handle closes the
/// queue and shuts the worker down.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    actions: mpsc::Sender<Envelope>,
    events: broadcast::Sender<SessionEvent>,
    latest: Arc<RwLock<Option<SessionEvent>>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Submit an action and wait for its outcome.
    ///
    /// Actions are applied in submission order, one at a time. A rejection
    /// leaves session state untouched and the same actor may resubmit.
    pub async fn submit(&self, action: GameAction) -> Result<Committed, DomainError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            action,
            reply: reply_tx,
        };
        self.actions.send(envelope).await.map_err(|_| {
            DomainError::validation(ValidationKind::SessionHalted, "Session is closed")
        })?;
        reply_rx.await.map_err(|_| {
            DomainError::validation(ValidationKind::SessionHalted, "Session is closed")
        })?
    }

    /// Subscribe to session events. Every committed mutation produces
    /// exactly one `Phase` event; a lagged receiver can rely on the next
    /// event superseding anything it missed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The most recent event, for subscribers attaching mid-session.
    pub fn latest_event(&self) -> Option<SessionEvent> {
        self.latest.read().clone()
    }
}

/// Spawn a session worker and return its handle.
///
/// The worker deals round 1 immediately and announces it as the first event.
pub fn spawn_session(config: SessionConfig) -> SessionHandle {
    let seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = GameState::new();
    preparation::enter_round(&mut state, &mut rng);
    spawn_worker(config, state, rng)
}

/// Test seam: spawn a worker around a pre-built state, skipping the deal.
#[cfg(test)]
pub(crate) fn spawn_session_with_state(
    config: SessionConfig,
    state: GameState,
    rng: ChaCha8Rng,
) -> SessionHandle {
    spawn_worker(config, state, rng)
}

fn spawn_worker(config: SessionConfig, state: GameState, rng: ChaCha8Rng) -> SessionHandle {
    let id = Uuid::new_v4();
    let (action_tx, action_rx) = mpsc::channel(config.queue_capacity);
    let (event_tx, _) = broadcast::channel(config.broadcast_capacity);
    let latest = Arc::new(RwLock::new(None));

    let handle = SessionHandle {
        id,
        actions: action_tx,
        events: event_tx.clone(),
        latest: latest.clone(),
    };

    tokio::spawn(run_session(id, config, state, rng, action_rx, event_tx, latest));
    handle
}

#[allow(clippy::too_many_arguments)]
async fn run_session(
    id: SessionId,
    config: SessionConfig,
    mut state: GameState,
    mut rng: ChaCha8Rng,
    mut actions: mpsc::Receiver<Envelope>,
    events: broadcast::Sender<SessionEvent>,
    latest: Arc<RwLock<Option<SessionEvent>>>,
) {
    let mut seq: u64 = 0;
    info!(session = %id, "Session started");
    emit(
        &config,
        &state,
        &events,
        &latest,
        &mut seq,
        format!("Round {} dealt", state.round_no),
    );

    while let Some(envelope) = actions.recv().await {
        if state.halted {
            let _ = envelope.reply.send(Err(DomainError::validation(
                ValidationKind::SessionHalted,
                "Game ended due to an internal error",
            )));
            continue;
        }

        let actor = envelope.action.actor;
        match apply_action(&mut state, &mut rng, &envelope.action, config.target_score) {
            Ok(reason) => {
                let committed = emit(&config, &state, &events, &latest, &mut seq, reason);
                debug!(session = %id, actor, seq, "Action committed");
                let _ = envelope.reply.send(Ok(committed));
            }
            Err(err) if err.is_fatal() => {
                state.halted = true;
                error!(session = %id, actor, %err, "Fatal consistency violation; halting session");
                let event = SessionEvent::CriticalError {
                    detail: "Game ended due to an internal error".to_string(),
                };
                *latest.write() = Some(event.clone());
                let _ = events.send(event);
                let _ = envelope.reply.send(Err(err));
            }
            Err(err) => {
                debug!(session = %id, actor, code = %ErrorCode::from(&err), %err, "Action rejected");
                let _ = envelope.reply.send(Err(err));
            }
        }
    }

    debug!(session = %id, "Session worker stopped");
}

/// Dispatch one action to the current phase handler and, when a round
/// completes, run the transient Scoring phase and the next deal within the
/// same commit. Returns the human-readable reason for the broadcast.
fn apply_action(
    state: &mut GameState,
    rng: &mut ChaCha8Rng,
    action: &GameAction,
    target_score: i16,
) -> Result<String, DomainError> {
    let who = action.actor;
    match &action.kind {
        ActionKind::RedealDecision { accept } => {
            let outcome = preparation::redeal_decision(state, who, *accept, rng)?;
            let mut reason = if outcome.accepted {
                format!(
                    "Player {who} accepted a redeal; multiplier is now {}",
                    outcome.redeal_multiplier
                )
            } else {
                format!("Player {who} declined a redeal")
            };
            if outcome.preparation_complete {
                reason.push_str("; declarations open");
            }
            Ok(reason)
        }
        ActionKind::Declare { value } => {
            let result = declaration::declare(state, who, *value)?;
            let mut reason = format!("Player {who} declared {value}");
            if result.declarations_complete {
                reason.push_str(&format!(
                    "; player {} leads the first turn",
                    state.round_starter
                ));
            }
            Ok(reason)
        }
        ActionKind::PlayPieces { pieces } => {
            let result = turn::play_pieces(state, who, pieces)?;
            if !result.trick_completed {
                return Ok(format!(
                    "Player {who} played {} piece(s)",
                    pieces.len()
                ));
            }

            let winner = result.trick_winner.unwrap_or(who);
            let mut reason = format!(
                "Player {winner} won turn {} and captured {} pile(s)",
                result.turn_no, result.piles_awarded
            );

            if result.round_completed {
                let scored_round = state.round_no;
                let outcome = scoring::apply_round_scoring(state, target_score)?;
                if outcome.game_over {
                    reason.push_str(&format!(
                        "; round {scored_round} scored; game over, winner(s): {:?}",
                        outcome.winners
                    ));
                } else {
                    preparation::enter_round(state, rng);
                    reason.push_str(&format!(
                        "; round {scored_round} scored; round {} dealt",
                        state.round_no
                    ));
                }
            }
            Ok(reason)
        }
    }
}

fn emit(
    config: &SessionConfig,
    state: &GameState,
    events: &broadcast::Sender<SessionEvent>,
    latest: &Arc<RwLock<Option<SessionEvent>>>,
    seq: &mut u64,
    reason: String,
) -> Committed {
    *seq += 1;
    let snap = snapshot(state, &config.seating);
    let event = SessionEvent::Phase {
        seq: *seq,
        snapshot: snap.clone(),
        reason: reason.clone(),
    };
    *latest.write() = Some(event.clone());
    if events.send(event).is_err() {
        // No subscribers; the snapshot still reaches the submitter.
        debug!(seq = *seq, "No subscribers for session event");
    }
    Committed {
        seq: *seq,
        snapshot: snap,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::domain::snapshot::PhaseSnapshot;
    use crate::domain::state::Phase;
    use crate::domain::try_parse_pieces;
    use crate::domain::Piece;
    use crate::errors::domain::ValidationKind;

    fn pieces(tokens: &[&str]) -> Vec<Piece> {
        try_parse_pieces(tokens).expect("hardcoded valid piece tokens")
    }

    /// A Turn-phase state one play away from a hand-size divergence: seat 3
    /// holds three pieces where everyone else holds one.
    fn near_divergence_state() -> GameState {
        let mut state = GameState::new();
        state.phase = Phase::Turn { turn_no: 1 };
        state.hands = [
            pieces(&["SR"]),
            pieces(&["SB"]),
            pieces(&["CR"]),
            pieces(&["GR", "GB", "AR"]),
        ];
        // Park the rest of the set so only the divergence guard can trip.
        let mut remaining = crate::domain::full_deck();
        for hand in &state.hands {
            for piece in hand {
                let idx = remaining.iter().position(|p| p == piece).unwrap();
                remaining.swap_remove(idx);
            }
        }
        state.round.captured[0] = remaining;
        state.round.trick_leader = Some(0);
        for seat in 0..4 {
            state.round.declarations[seat] = Some(1);
        }
        state
    }

    #[tokio::test]
    async fn fatal_divergence_halts_the_session() {
        let handle = spawn_session_with_state(
            SessionConfig::default(),
            near_divergence_state(),
            ChaCha8Rng::seed_from_u64(0),
        );
        let mut events = handle.subscribe();
        // Skip the session's opening announcement.
        let _ = events.recv().await.unwrap();

        for seat in 0..3u8 {
            let play = match seat {
                0 => pieces(&["SR"]),
                1 => pieces(&["SB"]),
                _ => pieces(&["CR"]),
            };
            handle
                .submit(GameAction::play_pieces(seat, play))
                .await
                .unwrap();
            let _ = events.recv().await.unwrap();
        }

        // The fourth play resolves the trick and trips the guard.
        let err = handle
            .submit(GameAction::play_pieces(3, pieces(&["GR"])))
            .await
            .unwrap_err();
        assert!(err.is_fatal());

        // One critical event, then nothing but rejections.
        match events.recv().await.unwrap() {
            SessionEvent::CriticalError { detail } => {
                assert!(detail.contains("internal error"));
            }
            SessionEvent::Phase { .. } => panic!("expected a critical event"),
        }

        let err = handle
            .submit(GameAction::declare(0, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::SessionHalted, _)
        ));
        assert!(matches!(
            handle.latest_event(),
            Some(SessionEvent::CriticalError { .. })
        ));
    }

    #[tokio::test]
    async fn rejections_produce_no_broadcast() {
        let handle = spawn_session_with_state(
            SessionConfig::default(),
            near_divergence_state(),
            ChaCha8Rng::seed_from_u64(0),
        );
        let mut events = handle.subscribe();
        let _ = events.recv().await.unwrap();

        // Out of turn: seat 1 is not the leader.
        let err = handle
            .submit(GameAction::play_pieces(1, pieces(&["SB"])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::OutOfTurn, _)
        ));

        // A committed action still works and is the next event (seq 2).
        let committed = handle
            .submit(GameAction::play_pieces(0, pieces(&["SR"])))
            .await
            .unwrap();
        assert_eq!(committed.seq, 2);
        match events.recv().await.unwrap() {
            SessionEvent::Phase { seq, snapshot, .. } => {
                assert_eq!(seq, 2);
                assert!(matches!(snapshot.phase, PhaseSnapshot::Turn(_)));
            }
            SessionEvent::CriticalError { .. } => panic!("unexpected critical event"),
        }
    }
}
