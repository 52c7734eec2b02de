//! Bot driver: submits bot actions through the same session queue humans
//! use.
//!
//! The driver subscribes to session events and, whenever the snapshot shows
//! its seat to act, asks the bot for a decision and submits it after a
//! human-plausible delay. Pacing is advisory timing only; correctness comes
//! solely from queue serialization — a bot is just a slow participant.

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::trait_def::{BotError, BotPlayer, BotView};
use crate::domain::snapshot::{GameSnapshot, PhaseSnapshot};
use crate::domain::Seat;
use crate::session::action::{ActionKind, GameAction, SessionEvent};
use crate::session::coordinator::SessionHandle;

/// Delay range applied before each bot submission.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Pacing {
    /// Roughly human response latency.
    pub const fn human_like() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(1500),
        }
    }

    /// No delay; used by tests and the simulator.
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    fn delay<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let span = (self.max - self.min).as_millis() as u64;
        self.min + Duration::from_millis(rng.random_range(0..=span))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::human_like()
    }
}

/// Spawn a driver task that plays `seat` with `bot` until the game ends.
pub fn spawn_bot(
    handle: SessionHandle,
    seat: Seat,
    bot: Arc<dyn BotPlayer>,
    pacing: Pacing,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = handle.subscribe();
        // Thread-local RNGs are not Send; a seeded ChaCha stream lives in
        // the task across await points.
        let mut rng = ChaCha8Rng::seed_from_u64(rand::rng().random());
        let mut acted_seq: u64 = 0;

        // A session announces its opening deal before drivers attach; pick
        // that up from the handle so the first actor is not stuck waiting.
        if let Some(event) = handle.latest_event() {
            if handle_event(&handle, seat, bot.as_ref(), pacing, &mut rng, &mut acted_seq, event)
                .await
                .is_break()
            {
                return;
            }
        }

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                // Snapshots are full state; whatever was missed is
                // superseded by the next event.
                Err(RecvError::Lagged(skipped)) => {
                    debug!(seat, skipped, "Bot driver lagged behind session events");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if handle_event(&handle, seat, bot.as_ref(), pacing, &mut rng, &mut acted_seq, event)
                .await
                .is_break()
            {
                break;
            }
        }
    })
}

async fn handle_event(
    handle: &SessionHandle,
    seat: Seat,
    bot: &dyn BotPlayer,
    pacing: Pacing,
    rng: &mut (impl Rng + Send),
    acted_seq: &mut u64,
    event: SessionEvent,
) -> std::ops::ControlFlow<()> {
    use std::ops::ControlFlow;

    let (seq, snapshot) = match event {
        SessionEvent::Phase { seq, snapshot, .. } => (seq, snapshot),
        SessionEvent::CriticalError { .. } => return ControlFlow::Break(()),
    };
    if matches!(
        snapshot.phase,
        PhaseSnapshot::GameOver(_) | PhaseSnapshot::Halted
    ) {
        return ControlFlow::Break(());
    }
    if seq <= *acted_seq {
        return ControlFlow::Continue(());
    }

    let Some(kind) = decide(seat, bot, snapshot) else {
        return ControlFlow::Continue(());
    };
    *acted_seq = seq;

    let delay = pacing.delay(rng);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if let Err(err) = handle.submit(GameAction::new(seat, kind)).await {
        // A stale view can lose the race to a resubmitting human; the next
        // event triggers a fresh decision.
        warn!(seat, %err, "Bot action rejected");
    }
    ControlFlow::Continue(())
}

/// Ask the bot for a decision when the snapshot shows its seat to act.
fn decide(seat: Seat, bot: &dyn BotPlayer, snapshot: GameSnapshot) -> Option<ActionKind> {
    let to_act = match &snapshot.phase {
        PhaseSnapshot::Preparation(prep) => prep.to_decide == Some(seat),
        PhaseSnapshot::Declaration(decl) => decl.to_act == seat,
        PhaseSnapshot::Turn(turn) => turn.to_act == Some(seat),
        PhaseSnapshot::Scoring(_) | PhaseSnapshot::GameOver(_) | PhaseSnapshot::Halted => false,
    };
    if !to_act {
        return None;
    }

    let view = BotView::new(seat, snapshot);
    let decision: Result<ActionKind, BotError> = match &view.snapshot.phase {
        PhaseSnapshot::Preparation(_) => bot
            .choose_redeal(&view)
            .map(|accept| ActionKind::RedealDecision { accept }),
        PhaseSnapshot::Declaration(_) => bot
            .choose_declaration(&view)
            .map(|value| ActionKind::Declare { value }),
        PhaseSnapshot::Turn(_) => bot
            .choose_play(&view)
            .map(|pieces| ActionKind::PlayPieces { pieces }),
        _ => return None,
    };

    match decision {
        Ok(kind) => Some(kind),
        Err(err) => {
            warn!(seat, %err, "Bot failed to choose an action");
            None
        }
    }
}
