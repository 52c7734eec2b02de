//! End-to-end coordinator tests: a scripted session driven through the
//! public submit/subscribe surface.

use engine::bot::BotView;
use engine::domain::snapshot::{GameSnapshot, PhaseSnapshot};
use engine::errors::{DomainError, ValidationKind};
use engine::session::{spawn_session, GameAction, SessionConfig, SessionEvent};

fn test_config(seed: u64) -> SessionConfig {
    SessionConfig {
        // Any best total ends the game after round 1.
        target_score: -100,
        rng_seed: Some(seed),
        broadcast_capacity: 256,
        ..Default::default()
    }
}

/// What the scripted participant does for whichever seat must act: decline
/// redeals, declare the first legal value, commit the first legal play.
fn scripted_action(snapshot: &GameSnapshot) -> Option<GameAction> {
    match &snapshot.phase {
        PhaseSnapshot::Preparation(prep) => {
            let seat = prep.to_decide?;
            Some(GameAction::redeal_decision(seat, false))
        }
        PhaseSnapshot::Declaration(decl) => {
            let view = BotView::new(decl.to_act, snapshot.clone());
            let value = *view.legal_declarations().first()?;
            Some(GameAction::declare(decl.to_act, value))
        }
        PhaseSnapshot::Turn(turn) => {
            let seat = turn.to_act?;
            let view = BotView::new(seat, snapshot.clone());
            let play = view.legal_plays().into_iter().next()?;
            Some(GameAction::play_pieces(seat, play))
        }
        PhaseSnapshot::Scoring(_) | PhaseSnapshot::GameOver(_) | PhaseSnapshot::Halted => None,
    }
}

#[tokio::test]
async fn a_scripted_round_runs_to_game_over_with_gapless_broadcasts() {
    let handle = spawn_session(test_config(7));
    let mut events = handle.subscribe();

    let SessionEvent::Phase { seq, snapshot, .. } = events.recv().await.unwrap() else {
        panic!("expected the opening deal announcement");
    };
    assert_eq!(seq, 1);

    let mut last_seq = seq;
    let mut snapshot = snapshot;
    let mut commits = 0u64;
    loop {
        let Some(action) = scripted_action(&snapshot) else {
            break;
        };
        let committed = handle.submit(action).await.unwrap();
        // Exactly one broadcast per commit, in lockstep with the outcome.
        assert_eq!(committed.seq, last_seq + 1);
        let SessionEvent::Phase {
            seq: event_seq,
            snapshot: event_snapshot,
            reason,
        } = events.recv().await.unwrap()
        else {
            panic!("expected a phase broadcast");
        };
        assert_eq!(event_seq, committed.seq);
        assert_eq!(event_snapshot, committed.snapshot);
        assert!(!reason.is_empty());

        last_seq = committed.seq;
        snapshot = committed.snapshot;
        commits += 1;
        assert!(commits < 256, "session failed to converge");
    }

    let PhaseSnapshot::GameOver(over) = &snapshot.phase else {
        panic!("expected the session to finish, got {:?}", snapshot.phase);
    };
    assert!(!over.winners.is_empty());
    // Every piece was played out before scoring ran.
    assert!(snapshot.game.hands.iter().all(|h| h.is_empty()));
}

#[tokio::test]
async fn rejections_leave_no_trace_and_allow_correction() {
    let handle = spawn_session(test_config(21));
    let mut events = handle.subscribe();
    let SessionEvent::Phase { mut snapshot, .. } = events.recv().await.unwrap() else {
        panic!("expected the opening deal announcement");
    };

    // Walk to the Declaration phase by declining any pending redeals.
    while let PhaseSnapshot::Preparation(prep) = &snapshot.phase {
        let seat = prep.to_decide.unwrap();
        snapshot = handle
            .submit(GameAction::redeal_decision(seat, false))
            .await
            .unwrap()
            .snapshot;
    }
    let PhaseSnapshot::Declaration(decl) = &snapshot.phase else {
        panic!("expected Declaration");
    };
    let declarer = decl.to_act;
    let wrong_seat = (declarer + 1) % 4;

    // Out of turn: rejected, no broadcast, no mutation.
    let err = handle
        .submit(GameAction::declare(wrong_seat, 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));

    // An out-of-range value from the right seat: also rejected.
    let err = handle
        .submit(GameAction::declare(declarer, 9))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidDeclaration, _)
    ));

    // The corrected action succeeds; the first attempt left no side effects.
    let committed = handle.submit(GameAction::declare(declarer, 2)).await.unwrap();
    assert_eq!(committed.snapshot.game.declarations[declarer as usize], Some(2));
    assert_eq!(
        committed
            .snapshot
            .game
            .declarations
            .iter()
            .filter(|d| d.is_some())
            .count(),
        1
    );
}
