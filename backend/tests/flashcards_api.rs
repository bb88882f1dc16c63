use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use studybuddy_backend::{router, state::AppState, utils::time::today_local};
use tower::ServiceExt;

mod support;

struct Harness {
    app: axum::Router,
    token: String,
    state: AppState,
}

async fn harness(pool: &PgPool) -> Harness {
    let state = AppState::new(pool.clone(), support::test_config());
    let user = support::seed_user(pool).await;
    let token = state.tokens.issue(user.id).await.expect("issue").access_token;
    Harness {
        app: router(state.clone()),
        token,
        state,
    }
}

impl Harness {
    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(support::json_request(method, uri, Some(&self.token), body))
            .await
            .expect("response");
        let status = response.status();
        (status, support::response_json(response).await)
    }
}

fn batch(subject: &str, questions: &[&str]) -> Value {
    json!({
        "subject": subject,
        "notes": "chapter 3",
        "flashcards": questions
            .iter()
            .map(|q| json!({"question": q, "answer": "answer"}))
            .collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn saving_cards_awards_xp_and_starts_a_streak() {
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    let (status, body) = h
        .call(Method::POST, "/api/flashcards", Some(batch("biology", &["ATP?", "DNA?"])))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["count"], 2);
    assert_eq!(body["progress"]["points_awarded"], 20);
    assert_eq!(body["progress"]["xp"]["new_xp"], 20);
    assert_eq!(body["progress"]["streak"]["current_streak"], 1);

    let (status, progress) = h.call(Method::GET, "/api/me/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["xp"], 20);
    assert_eq!(progress["xp_to_next_level"], 80);
    assert_eq!(progress["current_streak"], 1);
    let today = today_local(&h.state.config.time_zone).to_string();
    assert_eq!(progress["last_streak_date"], today);

    let (_, events) = h.call(Method::GET, "/api/me/xp-events", None).await;
    assert_eq!(events[0]["reason"], "cards_created");
    assert_eq!(events[0]["points"], 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_for_one_user_all_succeed() {
    const N: usize = 16;
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let app = h.app.clone();
        let token = h.token.clone();
        let question = format!("capital #{}", i);
        let body = batch("geography", &[question.as_str()]);
        handles.push(tokio::spawn(async move {
            app.oneshot(support::json_request(
                Method::POST,
                "/api/flashcards",
                Some(token.as_str()),
                Some(body),
            ))
            .await
            .expect("response")
            .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.expect("join"), StatusCode::CREATED);
    }

    let (_, progress) = h.call(Method::GET, "/api/me/progress", None).await;
    assert_eq!(progress["xp"], 10 * N as i64);
    assert_eq!(progress["current_streak"], 1);

    let (_, list) = h.call(Method::GET, "/api/flashcards", None).await;
    assert_eq!(list["total"], N as i64);
}

#[tokio::test]
async fn list_filters_by_subject_and_paginates() {
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    h.call(Method::POST, "/api/flashcards", Some(batch("math", &["1+1", "2+2", "3+3"])))
        .await;
    h.call(Method::POST, "/api/flashcards", Some(batch("history", &["1066?"])))
        .await;

    let (status, all) = h.call(Method::GET, "/api/flashcards?subject=all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total"], 4);

    let (_, math) = h
        .call(Method::GET, "/api/flashcards?subject=math&limit=2&offset=0", None)
        .await;
    assert_eq!(math["total"], 3);
    assert_eq!(math["limit"], 2);
    assert_eq!(math["flashcards"].as_array().expect("array").len(), 2);

    let (_, rest) = h
        .call(Method::GET, "/api/flashcards?subject=math&limit=2&offset=2", None)
        .await;
    assert_eq!(rest["flashcards"].as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    let (status, body) = h
        .call(Method::POST, "/api/flashcards", Some(batch("math", &[])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, progress) = h.call(Method::GET, "/api/me/progress", None).await;
    assert_eq!(progress["xp"], 0);
}

#[tokio::test]
async fn review_increments_and_records_activity() {
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    h.call(Method::POST, "/api/flashcards", Some(batch("chemistry", &["H2O?"])))
        .await;
    let (_, list) = h.call(Method::GET, "/api/flashcards", None).await;
    let id = list["flashcards"][0]["id"].as_str().expect("id").to_string();

    let (status, body) = h
        .call(Method::POST, &format!("/api/flashcards/{}/review", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcard"]["times_reviewed"], 1);
    assert_eq!(body["progress"]["points_awarded"], 5);
    assert_eq!(body["progress"]["streak"]["day_count"], 2);

    let (_, stats) = h.call(Method::GET, "/api/stats", None).await;
    assert_eq!(stats["total_flashcards"], 1);
    assert_eq!(stats["reviewed_today"], 1);
    assert_eq!(stats["most_reviewed_subject"], "chemistry");
    assert_eq!(stats["streak_days"], 1);
    assert_eq!(stats["xp"], 15);
}

#[tokio::test]
async fn cards_of_other_users_are_invisible() {
    let pool = support::test_pool().await;
    let owner = harness(&pool).await;
    let intruder = harness(&pool).await;

    owner
        .call(Method::POST, "/api/flashcards", Some(batch("physics", &["F=?"])))
        .await;
    let (_, list) = owner.call(Method::GET, "/api/flashcards", None).await;
    let id = list["flashcards"][0]["id"].as_str().expect("id").to_string();

    let (status, _) = intruder
        .call(Method::DELETE, &format!("/api/flashcards/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = intruder
        .call(Method::POST, &format!("/api/flashcards/{}/review", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = owner
        .call(Method::DELETE, &format!("/api/flashcards/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = owner.call(Method::GET, "/api/flashcards", None).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn study_sessions_and_tasks_award_fixed_points() {
    let pool = support::test_pool().await;
    let h = harness(&pool).await;

    let (status, body) = h
        .call(
            Method::POST,
            "/api/study-sessions",
            Some(json!({"subject": "math", "flashcards_studied": 12, "duration_minutes": 25})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session"]["flashcards_studied"], 12);
    assert_eq!(body["progress"]["points_awarded"], 15);

    let (status, body) = h.call(Method::POST, "/api/tasks/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_awarded"], 20);
    assert_eq!(body["xp"]["new_xp"], 35);
    assert_eq!(body["streak"]["current_streak"], 1);
}
