//! Mocked-server tests for the Risk client

use super::*;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> RiskClient {
    RiskClient::new(Client::new(), format!("{}/api", server.uri()), "Aldi")
}

fn players_response() -> Value {
    json!([
        {"team": "Aldi", "player": "user1", "turnsPlayed": 16, "mvps": 6,
         "lastTurn": {"season": 1, "day": 17, "stars": 3}},
        {"team": "Aldi", "player": "EpicWolverine", "turnsPlayed": 112, "mvps": 9,
         "lastTurn": {"season": 1, "day": 17, "stars": 4}}
    ])
}

fn info(name: &str, overall: u8) -> Value {
    json!({
        "name": name,
        "team": {"name": "Aldi"},
        "ratings": {"overall": overall, "totalTurns": 1, "gameTurns": 2, "mvps": 3, "streak": 4},
        "stats": {"totalTurns": 10, "gameTurns": 9, "mvps": 1, "streak": 2},
        "turns": [{"season": 1, "day": 18, "stars": overall, "mvp": false, "territory": "Ohio"}]
    })
}

fn turn(id: u32, day: u32, complete: bool, active: bool) -> Value {
    json!({"id": id, "season": 1, "day": day, "complete": complete, "active": active})
}

#[tokio::test]
async fn test_players_cached_after_first_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players"))
        .and(query_param("team", "Aldi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(players_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.players().await.unwrap().to_vec();
    let second = client.players().await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(second[1].player, "EpicWolverine");
}

#[tokio::test]
async fn test_mercenaries_cached_after_first_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mercs"))
        .and(query_param("team", "Aldi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"team": "Aldi", "player": "merc1", "turnsPlayed": 67, "mvps": 6, "stars": 4},
            {"team": "Aldi", "player": "Mautamu", "turnsPlayed": 57, "mvps": 6, "stars": 3}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.mercenaries().await.unwrap();
    let mercs = client.mercenaries().await.unwrap();

    let stars = client.mercenary_stars(mercs);
    assert_eq!(
        stars,
        vec![
            PlayerStars {
                name: "merc1".to_string(),
                stars: 4
            },
            PlayerStars {
                name: "Mautamu".to_string(),
                stars: 3
            },
        ]
    );
}

#[tokio::test]
async fn test_player_info_cached_per_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/player"))
        .and(query_param("player", "user1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info("user1", 4)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.player_info("user1").await.unwrap();
    let second = client.player_info("user1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.ratings.overall, 4);
}

#[tokio::test]
async fn test_player_info_failure_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/player"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info("user1", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.player_info("user1").await,
        Err(StarsError::Http(_))
    ));

    let retried = client.player_info("user1").await.unwrap();
    assert_eq!(retried.ratings.overall, 2);
}

#[tokio::test]
async fn test_batch_player_info_chunks_at_max_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let names: Vec<String> = (0..900).map(|i| format!("player{i}")).collect();
    client.batch_player_info(&names).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "players")
                .map(|(_, v)| v.split(',').count())
                .unwrap()
        })
        .collect();
    assert_eq!(sizes, vec![400, 400, 100]);

    let first_chunk = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "players")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(first_chunk.starts_with("player0,player1,"));
    assert!(first_chunk.ends_with(",player399"));
}

#[tokio::test]
async fn test_batch_player_info_populates_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players/batch"))
        .and(query_param("players", "user1,EpicWolverine"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([info("user1", 4), info("EpicWolverine", 5)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/player"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let names = vec!["user1".to_string(), "EpicWolverine".to_string()];
    let batch = client.batch_player_info(&names).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].name, "user1");

    let stars = client.player_stars(&names).await.unwrap();
    assert_eq!(stars[0].stars, 4);
    assert_eq!(stars[1].stars, 5);
}

#[tokio::test]
async fn test_batch_player_info_empty_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.batch_player_info(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_turns_sorted_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/turns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            turn(19, 18, true, false),
            turn(17, 16, true, false),
            turn(20, 19, false, true),
            turn(18, 17, true, false)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<u32> = client.turns().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![17, 18, 19, 20]);

    let previous = client.previous_turn().await.unwrap();
    assert_eq!(previous.id, 19);
    assert_eq!(previous.day, 18);
}

#[tokio::test]
async fn test_previous_turn_single_active_turn_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/turns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([turn(1, 1, false, true)])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.previous_turn().await.unwrap_err() {
        StarsError::TurnHistoryTooShort { len } => assert_eq!(len, 1),
        other => panic!("Expected TurnHistoryTooShort, got {other:?}"),
    }
}

#[tokio::test]
async fn test_players_http_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(client.players().await, Err(StarsError::Http(_))));
}

#[test]
fn test_previous_completed_turn_cases() {
    let t = |id, complete, active| Turn {
        id,
        season: 1,
        day: id,
        complete,
        active,
    };

    assert_eq!(previous_completed_turn(&[]), None);
    assert_eq!(previous_completed_turn(&[t(1, false, true)]), None);
    assert_eq!(
        previous_completed_turn(&[t(1, true, false)]).map(|t| t.id),
        Some(1)
    );
    assert_eq!(
        previous_completed_turn(&[t(1, true, false), t(2, false, true)]).map(|t| t.id),
        Some(1)
    );
    assert_eq!(
        previous_completed_turn(&[t(1, true, false), t(2, true, false)]).map(|t| t.id),
        Some(2)
    );
}
