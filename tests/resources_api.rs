//! Deadlines, courses, study sessions and aggregates through the full router.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_and_test_endpoints() {
    let app = TestApp::new();
    let (token, _) = app.register("Ada", "ada@example.com").await;
    app.post("/api/courses", &token, json!({ "name": "Physics" })).await;

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["users"], 1);
    assert_eq!(body["courses"], 1);
    assert_eq!(body["deadlines"], 0);
    assert_eq!(body["studySessions"], 0);
    assert_eq!(body["port"], 3001);
    assert!(body["timestamp"].is_string());

    let (status, body) = app.request(Method::GET, "/api/test", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is working!");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new();
    for uri in ["/api/nope", "/nowhere"] {
        let (status, body) = app.request(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
    }

    // Known path, unsupported method
    for (method, uri) in [
        (Method::DELETE, "/api/courses"),
        (Method::POST, "/api/study-data"),
        (Method::GET, "/api/deadlines/abc"),
    ] {
        let (status, body) = app.request(method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "Route not found", "{method} {uri}");
    }
}

#[tokio::test]
async fn deadline_lifecycle() {
    let app = TestApp::new();
    let (token, user_id) = app.register("Ada", "ada@example.com").await;

    let (status, created) = app
        .post(
            "/api/deadlines",
            &token,
            json!({ "title": "  Calculus Final  ", "dueDate": "2025-12-15", "priority": "high" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Calculus Final");
    assert_eq!(created["userId"], user_id.as_str());
    assert_eq!(created["description"], "");
    assert_eq!(created["priority"], "high");
    assert_eq!(created["completed"], false);
    assert_eq!(created["dueDate"], "2025-12-15T00:00:00Z");
    assert!(created.get("updatedAt").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .put(
            &format!("/api/deadlines/{id}"),
            &token,
            json!({ "completed": true, "id": "hijack", "userId": "someone-else" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["userId"], user_id.as_str());
    assert_eq!(updated["title"], "Calculus Final");
    assert!(updated["updatedAt"].is_string());

    let (status, _) = app.delete(&format!("/api/deadlines/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.delete(&format!("/api/deadlines/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Deadline not found");
}

#[tokio::test]
async fn deadline_validation() {
    let app = TestApp::new();
    let (token, _) = app.register("Ada", "ada@example.com").await;

    let (status, body) = app.post("/api/deadlines", &token, json!({ "title": "Essay" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title and due date are required");

    let (status, body) = app
        .post("/api/deadlines", &token, json!({ "title": "Essay", "dueDate": "next week" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid due date");
}

#[tokio::test]
async fn users_only_see_and_touch_their_own_records() {
    let app = TestApp::new();
    let (alice, _) = app.register("Alice", "alice@example.com").await;
    let (bob, _) = app.register("Bob", "bob@example.com").await;

    let mut ids = Vec::new();
    for title in ["One", "Two", "Three"] {
        let (_, d) = app
            .post("/api/deadlines", &alice, json!({ "title": title, "dueDate": "2025-11-20" }))
            .await;
        ids.push(d["id"].as_str().unwrap().to_string());
    }

    let (_, list) = app.get("/api/deadlines", &alice).await;
    let titles: Vec<_> = list.as_array().unwrap().iter().map(|d| d["title"].clone()).collect();
    assert_eq!(titles, [json!("One"), json!("Two"), json!("Three")]);

    let (status, list) = app.get("/api/deadlines", &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (status, body) = app
        .put(&format!("/api/deadlines/{}", ids[0]), &bob, json!({ "completed": true }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Deadline not found");

    let (status, _) = app.delete(&format!("/api/deadlines/{}", ids[1]), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, course) = app.post("/api/courses", &alice, json!({ "name": "Physics" })).await;
    let course_id = course["id"].as_str().unwrap();
    let (status, body) = app
        .put(&format!("/api/courses/{course_id}"), &bob, json!({ "progress": 100 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
    let (status, _) = app.delete(&format!("/api/courses/{course_id}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/study-sessions", &alice, json!({ "courseId": course_id, "duration": 50 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, done) = app
        .put(&format!("/api/deadlines/{}", ids[2]), &alice, json!({ "completed": true }))
        .await;
    assert_eq!(done["completed"], true);

    for uri in ["/api/courses", "/api/study-sessions", "/api/deadlines"] {
        let (status, list) = app.get(uri, &bob).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(list, json!([]), "{uri}");
    }
    let (_, data) = app.get("/api/study-data", &bob).await;
    assert_eq!(
        data,
        json!({ "totalXP": 0, "studyStreak": 0, "hoursStudied": "0.0", "goalsCompleted": 0 })
    );

    let (_, list) = app.get("/api/courses", &alice).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = app.get("/api/study-sessions", &alice).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = app.get("/api/deadlines", &alice).await;
    let completed: Vec<_> = list.as_array().unwrap().iter().map(|d| d["completed"].clone()).collect();
    assert_eq!(completed, [json!(false), json!(false), json!(true)]);
}

#[tokio::test]
async fn course_defaults_and_updates() {
    let app = TestApp::new();
    let (token, _) = app.register("Ada", "ada@example.com").await;

    let (status, body) = app.post("/api/courses", &token, json!({ "color": "#ef4444" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Course name is required");

    let (status, course) = app
        .post("/api/courses", &token, json!({ "name": "Mathematics", "progress": 60 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["color"], "#3b82f6");
    assert_eq!(course["progress"], 0);
    assert_eq!(course["description"], "");
    let id = course["id"].as_str().unwrap();

    let (status, updated) = app
        .put(&format!("/api/courses/{id}"), &token, json!({ "progress": 75 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["progress"], 75);
    assert_eq!(updated["name"], "Mathematics");

    let (status, _) = app.delete(&format!("/api/courses/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = app.get("/api/courses", &token).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn study_sessions_and_aggregates() {
    let app = TestApp::new();
    let (token, _) = app.register("Ada", "ada@example.com").await;

    let (_, data) = app.get("/api/study-data", &token).await;
    assert_eq!(
        data,
        json!({ "totalXP": 0, "studyStreak": 0, "hoursStudied": "0.0", "goalsCompleted": 0 })
    );

    let (status, session) = app
        .post("/api/study-sessions", &token, json!({ "courseId": "c1", "duration": 25 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["xpEarned"], 20);
    assert_eq!(session["notes"], "");

    let (status, session) = app
        .post("/api/study-sessions", &token, json!({ "courseId": "c1", "duration": "65" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["duration"], 65);
    assert_eq!(session["xpEarned"], 60);

    for bad in [json!({ "courseId": "c1" }), json!({ "duration": 30 }), json!({ "courseId": "c1", "duration": -5 })] {
        let (status, body) = app.post("/api/study-sessions", &token, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Course and duration are required");
    }

    let (_, deadline) = app
        .post("/api/deadlines", &token, json!({ "title": "Essay", "dueDate": "2025-11-20" }))
        .await;
    let id = deadline["id"].as_str().unwrap();
    app.put(&format!("/api/deadlines/{id}"), &token, json!({ "completed": true })).await;

    let (status, data) = app.get("/api/study-data", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        data,
        json!({ "totalXP": 80, "studyStreak": 2, "hoursStudied": "1.5", "goalsCompleted": 1 })
    );

    let (_, list) = app.get("/api/study-sessions", &token).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cors_preflight_allows_known_origins_only() {
    let app = TestApp::new();
    let preflight = |origin: &'static str| {
        axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/deadlines")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization,content-type")
            .body(axum::body::Body::empty())
            .unwrap()
    };

    use tower::ServiceExt;
    let resp = app.router.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(resp.headers()["access-control-allow-credentials"], "true");

    let resp = app.router.clone().oneshot(preflight("http://evil.example")).await.unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
