//! Four automated participants drive a session to completion through the
//! same action queue a human would use.

use std::sync::Arc;
use std::time::Duration;

use engine::bot::{spawn_bot, Pacing, RandomBot};
use engine::domain::snapshot::{PhaseSnapshot, SeatPublic};
use engine::session::{SessionConfig, SessionEvent, SessionRegistry};

fn bot_session_config(seed: u64) -> SessionConfig {
    SessionConfig {
        seating: [
            SeatPublic::bot(0, "Bot 1"),
            SeatPublic::bot(1, "Bot 2"),
            SeatPublic::bot(2, "Bot 3"),
            SeatPublic::bot(3, "Bot 4"),
        ],
        // Any best total ends the game after round 1; bots still exercise
        // the full phase cycle.
        target_score: -100,
        rng_seed: Some(seed),
        queue_capacity: 64,
        broadcast_capacity: 256,
    }
}

#[tokio::test]
async fn bots_play_a_session_to_completion() {
    let registry = SessionRegistry::new();
    let handle = registry.create_session(bot_session_config(11));
    assert_eq!(registry.len(), 1);

    let mut events = handle.subscribe();
    for seat in 0..4u8 {
        let bot = Arc::new(RandomBot::new(Some(100 + seat as u64)));
        spawn_bot(handle.clone(), seat, bot, Pacing::none());
    }

    let mut last_seq = 0u64;
    let game_over = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match events.recv().await.expect("session events closed early") {
                SessionEvent::Phase { seq, snapshot, .. } => {
                    // Sequence numbers never stall or repeat.
                    assert!(seq > last_seq, "seq went backwards: {seq} <= {last_seq}");
                    last_seq = seq;
                    if let PhaseSnapshot::GameOver(over) = snapshot.phase {
                        return over;
                    }
                }
                SessionEvent::CriticalError { detail } => {
                    panic!("session halted unexpectedly: {detail}");
                }
            }
        }
    })
    .await
    .expect("bots failed to finish the game in time");

    assert!(!game_over.winners.is_empty());
    let best = game_over.scores_total.iter().max().copied().unwrap();
    for &winner in &game_over.winners {
        assert_eq!(game_over.scores_total[winner as usize], best);
    }

    // Tear down through the registry; the worker stops once handles drop.
    assert!(registry.remove(handle.id()).is_some());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn parallel_sessions_are_independent() {
    let registry = SessionRegistry::new();
    let mut joins = Vec::new();

    for session_no in 0..3u64 {
        let handle = registry.create_session(bot_session_config(40 + session_no));
        let mut events = handle.subscribe();
        for seat in 0..4u8 {
            let bot = Arc::new(RandomBot::new(Some(session_no * 10 + seat as u64)));
            spawn_bot(handle.clone(), seat, bot, Pacing::none());
        }
        joins.push(tokio::spawn(async move {
            loop {
                match events.recv().await.expect("session events closed early") {
                    SessionEvent::Phase { snapshot, .. } => {
                        if matches!(snapshot.phase, PhaseSnapshot::GameOver(_)) {
                            break;
                        }
                    }
                    SessionEvent::CriticalError { detail } => {
                        panic!("session halted unexpectedly: {detail}");
                    }
                }
            }
        }));
    }

    tokio::time::timeout(Duration::from_secs(30), async {
        for join in joins {
            join.await.unwrap();
        }
    })
    .await
    .expect("sessions failed to finish in time");
}
