//! Common test utilities for habit tracker integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{json, Value};

use habit_core::ManualClock;
use habit_service::{create_router, AppState, HabitTracker, ServiceConfig};
use habit_store::MemoryStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Clock driving "today" for every request.
    pub clock: Arc<ManualClock>,
    /// A test user ID.
    pub user_id: u64,
}

impl TestHarness {
    /// Create a new test harness with an empty in-memory store.
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(start_date()));
        let tracker = HabitTracker::new(Arc::new(MemoryStore::new()), clock.clone());

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            cors_origins: vec!["*".into()],
            ..ServiceConfig::default()
        };

        let state = AppState::new(tracker, config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            clock,
            user_id: 1,
        }
    }

    /// Create a habit for the test user and return its ID.
    pub async fn create_habit(&self, name: &str, daily_goal: u32) -> String {
        let response = self
            .server
            .post("/v1/habits")
            .json(&json!({
                "user_id": self.user_id,
                "name": name,
                "daily_goal": daily_goal,
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["id"].as_str().expect("habit id").to_string()
    }

    /// Log one completion for today.
    pub async fn complete(&self, habit_id: &str) -> Value {
        let response = self.server.post(&format!("/v1/habits/{habit_id}/log")).await;
        response.assert_status_ok();
        response.json()
    }

    /// Fetch a habit.
    pub async fn habit(&self, habit_id: &str) -> Value {
        let response = self.server.get(&format!("/v1/habits/{habit_id}")).await;
        response.assert_status_ok();
        response.json()
    }

    /// Fetch the test user's streak.
    pub async fn user_streak(&self) -> u64 {
        let response = self
            .server
            .get(&format!("/v1/users/{}/streak", self.user_id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["total_streak"].as_u64().expect("total_streak")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The date the harness clock starts on.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date")
}
