//! Shared sessions: commands from many tasks apply one at a time.

mod common;

use common::game;
use zorkcore::game::GameSession;

#[test]
fn test_session_round_trip_blocking() {
    let session = GameSession::new(game());

    tokio_test::block_on(async {
        assert!(session.process("open mailbox").await.success);
        assert!(session.process("take leaflet").await.success);
        assert_eq!(session.inventory().await, vec!["leaflet".to_string()]);
        assert_eq!(session.moves().await, 2);
        assert_eq!(session.current_scene().await, "west_of_house");
    });
}

#[tokio::test]
async fn test_concurrent_walkers_share_one_position() {
    let session = GameSession::new(game());

    let mut handles = Vec::new();
    for line in ["north", "south", "north", "south"] {
        let session = session.clone();
        handles.push(tokio::spawn(async move { session.process(line).await }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    // Every attempt counts whether or not it succeeded.
    assert_eq!(session.moves().await, 4);
    let scene = session.current_scene().await;
    assert!(scene == "west_of_house" || scene == "north_of_house");
    let clean = session
        .with_processor(|game| game.state().check_invariants().is_empty())
        .await;
    assert!(clean);
}

#[tokio::test]
async fn test_concurrent_deposits_score_once() {
    let session = GameSession::new(common::game_in("living_room"));
    session
        .with_processor(|game| {
            common::give(game, "coin");
            assert!(game.process("open trophy case").success);
        })
        .await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            let put = session.process("put coin in trophy case").await;
            let take = session.process("take coin from trophy case").await;
            (put, take)
        }));
    }

    let mut points = 0;
    for handle in handles {
        let (put, _) = handle.await.expect("task");
        points += put.score_change;
    }
    assert_eq!(points, 22);
    assert_eq!(session.score().await, 22);
}
