mod support;

use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn when_client_connects_then_it_is_prompted_for_a_class_and_sees_the_lobby() {
    let url = support::start_server();
    let mut client = support::connect(&url).await;

    let prompt = support::next_json(&mut client).await;
    assert_eq!(prompt["type"], "choose_class");
    assert!(prompt["data"]["player_id"].is_string());

    let state = support::next_json(&mut client).await;
    assert_eq!(state["type"], "match_state");
    assert_eq!(state["data"], "Lobby");
}

#[tokio::test]
async fn when_a_third_client_connects_then_it_is_closed_as_server_full() {
    let url = support::start_server();
    let (_first, _) = support::join(&url).await;
    let (_second, _) = support::join(&url).await;

    let mut third = support::connect(&url).await;
    let (code, reason) = support::expect_close(&mut third).await;

    assert_eq!(code, 1008);
    assert_eq!(reason, "server full");
}

#[tokio::test]
async fn when_both_players_choose_a_class_then_the_match_starts_after_the_countdown() {
    let url = support::start_server();
    let (mut first, first_id) = support::join(&url).await;
    let (mut second, _) = support::join(&url).await;

    support::send_json(
        &mut first,
        json!({"type": "class_choice", "data": {"class_type": "Fighter"}}),
    )
    .await;
    support::send_json(
        &mut second,
        json!({"type": "class_choice", "data": {"class_type": "Mage"}}),
    )
    .await;

    support::next_matching(&mut first, |msg| {
        msg["type"] == "match_state" && msg["data"] == "MatchRunning"
    })
    .await;

    // Countdown snapshots may still be queued; the round clock only runs once active.
    let snapshot = support::next_matching(&mut first, |msg| {
        msg["type"] == "game_state"
            && msg["data"]["round_timer"]
                .as_f64()
                .is_some_and(|timer| timer < 120.0)
    })
    .await;
    let players = snapshot["data"]["players"]
        .as_array()
        .expect("players array");
    assert_eq!(players.len(), 2);
    let me = players
        .iter()
        .find(|p| p["id"] == first_id.as_str())
        .expect("own player in snapshot");
    assert_eq!(me["class_type"], "Fighter");
    assert_eq!(me["max_health"], 150);
}

#[tokio::test]
async fn when_a_level_change_is_requested_then_every_client_is_told() {
    let url = support::start_server();
    let (mut first, _) = support::join(&url).await;
    let (mut second, _) = support::join(&url).await;

    support::send_json(
        &mut first,
        json!({"type": "request_level_change", "data": {"level_name": "floresta"}}),
    )
    .await;

    for client in [&mut first, &mut second] {
        let changed = support::next_of_type(client, "level_changed").await;
        assert_eq!(changed["data"]["level_name"], "floresta");
        assert_eq!(changed["data"]["level_title"], "Floresta");
    }

    let snapshot = support::next_of_type(&mut second, "game_state").await;
    assert_eq!(snapshot["data"]["level"], "floresta");
}

#[tokio::test]
async fn when_a_player_disconnects_then_the_slot_opens_again() {
    let url = support::start_server();
    let (_first, _) = support::join(&url).await;
    let (mut second, _) = support::join(&url).await;

    second.close(None).await.expect("close second client");
    drop(second);

    // Leave reaches the arena on a later tick, so retry until the slot is free.
    for _ in 0..50 {
        let mut client = support::connect(&url).await;
        match client.next().await {
            Some(Ok(Message::Text(text))) => {
                let msg: serde_json::Value =
                    serde_json::from_str(text.as_str()).expect("valid json");
                assert_eq!(msg["type"], "choose_class");
                return;
            }
            Some(Ok(Message::Close(_))) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            other => panic!("unexpected first frame: {other:?}"),
        }
    }
    panic!("slot was never released");
}
