//! Completion logging and progress integration tests.

mod common;

use common::TestHarness;
use serde_json::Value;

// ============================================================================
// Increment
// ============================================================================

#[tokio::test]
async fn single_completion_reaches_goal_of_one() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Read", 1).await;

    let log = harness.complete(&id).await;
    assert_eq!(log["completed_count"], 1);
    assert_eq!(log["is_completed"], true);
    assert_eq!(log["date"], "2024-06-10");

    let habit = harness.habit(&id).await;
    assert_eq!(habit["streak_count"], 1);
    assert_eq!(habit["progress_percent"], 100.0);
}

#[tokio::test]
async fn one_of_three_rounds_to_two_decimals() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Water", 3).await;
    harness.complete(&id).await;

    let response = harness.server.get(&format!("/v1/habits/{id}/progress")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["progress_percent"], 33.33);
    assert_eq!(body["streak_count"], 0);
}

#[tokio::test]
async fn completion_past_goal_stays_completed() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Read", 1).await;
    harness.complete(&id).await;

    let log = harness.complete(&id).await;
    assert_eq!(log["completed_count"], 2);
    assert_eq!(log["is_completed"], true);
    assert_eq!(harness.habit(&id).await["progress_percent"], 200.0);
}

#[tokio::test]
async fn backdated_completions_build_streak() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Run", 1).await;

    for date in ["2024-06-08", "2024-06-09", "2024-06-10"] {
        harness
            .server
            .post(&format!("/v1/habits/{id}/log"))
            .add_query_param("date", date)
            .await
            .assert_status_ok();
    }

    assert_eq!(harness.habit(&id).await["streak_count"], 3);
}

#[tokio::test]
async fn malformed_date_returns_error_envelope() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Run", 1).await;

    let response = harness
        .server
        .post(&format!("/v1/habits/{id}/log"))
        .add_query_param("date", "yesterday")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn completion_on_unknown_habit_is_not_found() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/v1/habits/01ARZ3NDEKTSV4RRFFQ69G5FAV/log")
        .await
        .assert_status_not_found();
}

// ============================================================================
// Partial
// ============================================================================

#[tokio::test]
async fn partial_count_raises_and_lowers_completion() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Pushups", 4).await;

    let response = harness.server.post(&format!("/v1/habits/{id}/log/4")).await;
    response.assert_status_ok();
    let log: Value = response.json();
    assert_eq!(log["is_completed"], true);

    let response = harness.server.post(&format!("/v1/habits/{id}/log/1")).await;
    response.assert_status_ok();
    let log: Value = response.json();
    assert_eq!(log["completed_count"], 1);
    assert_eq!(log["is_completed"], false);

    let habit = harness.habit(&id).await;
    assert_eq!(habit["progress_percent"], 25.0);
    assert_eq!(habit["streak_count"], 0);
}

// ============================================================================
// Logs
// ============================================================================

#[tokio::test]
async fn today_log_is_null_until_logged() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Read", 2).await;

    let response = harness.server.get(&format!("/v1/habits/{id}/today")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body.is_null());

    harness.complete(&id).await;

    let response = harness.server.get(&format!("/v1/habits/{id}/today")).await;
    let body: Value = response.json();
    assert_eq!(body["completed_count"], 1);
}

#[tokio::test]
async fn logs_are_listed_oldest_first() {
    let harness = TestHarness::new();
    let id = harness.create_habit("Read", 1).await;

    for date in ["2024-06-10", "2024-06-01", "2024-06-05"] {
        harness
            .server
            .post(&format!("/v1/habits/{id}/log"))
            .add_query_param("date", date)
            .await
            .assert_status_ok();
    }

    let response = harness.server.get(&format!("/v1/habits/{id}/logs")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let dates: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|log| log["date"].as_str().expect("date").to_string())
        .collect();
    assert_eq!(dates, vec!["2024-06-01", "2024-06-05", "2024-06-10"]);
}
