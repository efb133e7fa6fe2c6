use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use folio::api::{self, AppState};
use chrono::{Duration, Utc};
use folio::config::Config;
use folio::db::repositories::format_timestamp;
use folio::entities::{contact_messages, prelude::*};
use folio::models::user::HostedProfile;
use folio::services::scheduler::send_weekly_digest;
use folio::services::{Mailer, OutgoingEmail};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Records every delivery attempt. A failing mailer records and then errors.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            anyhow::bail!("SendGrid API error: 503 Service Unavailable");
        }
        Ok(())
    }
}

/// Deletes the test database and its SQLite side files when dropped.
struct TempDb(PathBuf);

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    mailer: Arc<RecordingMailer>,
    _db: TempDb,
}

impl TestApp {
    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    /// Signs up a fresh account and returns its bearer token.
    async fn sign_up(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/signup",
                None,
                Some(json!({
                    "email": email,
                    "password": password,
                    "firstName": "Test",
                    "lastName": "User"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let token = self.sign_up("admin@example.com", "admin-pass").await;
        assert!(
            self.state
                .store
                .users()
                .set_admin("admin@example.com", true)
                .await
                .unwrap()
        );
        token
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with_mailer(RecordingMailer::default()).await
}

async fn spawn_app_with_mailer(mailer: RecordingMailer) -> TestApp {
    let db_path = std::env::temp_dir().join(format!("folio-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite://{}?mode=rwc", db_path.display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.email.admin_email = "owner@example.com".to_string();

    let mailer = Arc::new(mailer);
    let state = api::create_app_state_with_mailer(config, mailer.clone(), None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: api::router(state.clone()),
        state,
        mailer,
        _db: TempDb(db_path),
    }
}

fn blog_post(slug: &str) -> Value {
    json!({
        "title": "Hello World",
        "slug": slug,
        "content": "First post",
        "excerpt": "Intro",
        "tags": ["rust", "web"],
        "isPublished": true,
        "readTime": 4
    })
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app().await;
    let (status, body) = app.get("/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_signup_returns_user_without_secrets() {
    let app = spawn_app().await;
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "Ada@Example.com",
                "password": "secret1",
                "firstName": "Ada",
                "lastName": "Lovelace"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["isAdmin"], false);
    assert!(user.get("passwordHash").is_none());
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let token = body["data"]["token"].as_str().unwrap();
    let (status, me) = app.request("GET", "/api/auth/user", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["firstName"], "Ada");
}

#[tokio::test]
async fn test_duplicate_signup_creates_nothing() {
    let app = spawn_app().await;
    app.sign_up("dup@example.com", "secret1").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "DUP@example.com",
                "password": "another",
                "firstName": "Second",
                "lastName": "Try"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let count = Users::find().count(&app.state.store.conn).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": "short@example.com",
                "password": "12345",
                "firstName": "A",
                "lastName": "B"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signin_errors_are_generic() {
    let app = spawn_app().await;
    app.sign_up("real@example.com", "right-pass").await;

    for (email, password) in [
        ("real@example.com", "wrong-pass"),
        ("ghost@example.com", "right-pass"),
    ] {
        let (status, body) = app
            .request(
                "POST",
                "/api/auth/signin",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({ "email": "real@example.com", "password": "right-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user"]["lastLoginAt"].is_string());
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let app = spawn_app().await;
    let (status, _) = app
        .request("GET", "/api/auth/user", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_gate() {
    let app = spawn_app().await;
    let faq = json!({ "question": "Q?", "answer": "A." });

    let (status, _) = app.request("POST", "/api/faqs", None, Some(faq.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user_token = app.sign_up("user@example.com", "user-pass").await;
    let (status, body) = app
        .request("POST", "/api/faqs", Some(&user_token), Some(faq.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let admin_token = app.admin_token().await;
    let (status, body) = app
        .request("POST", "/api/faqs", Some(&admin_token), Some(faq))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["question"], "Q?");

    // Revoking takes effect on the next request with the same token
    app.state
        .store
        .users()
        .set_admin("admin@example.com", false)
        .await
        .unwrap();
    let (status, _) = app
        .request("GET", "/api/contact/messages", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blog_post_round_trip() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, created) = app
        .request("POST", "/api/blog/posts", Some(&token), Some(blog_post("hello-world")))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) = app.get(&format!("/api/blog/posts/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let post = &fetched["data"];
    assert_eq!(post["title"], "Hello World");
    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["content"], "First post");
    assert_eq!(post["tags"], json!(["rust", "web"]));
    assert_eq!(post["isPublished"], true);
    assert_eq!(post["readTime"], 4);
    assert_eq!(post["author"]["firstName"], "Test");

    let (status, by_slug) = app.get("/api/blog/posts/slug/hello-world").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["data"]["id"], id.as_str());

    let mut update = blog_post("hello-world");
    update["title"] = json!("Updated");
    update["tags"] = json!([]);
    let (status, updated) = app
        .request("PUT", &format!("/api/blog/posts/{id}"), Some(&token), Some(update))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["title"], "Updated");
    assert_eq!(updated["data"]["tags"], json!([]));
    assert_eq!(updated["data"]["views"], 1);

    let (status, _) = app
        .request("DELETE", &format!("/api/blog/posts/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/blog/posts/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .request("POST", "/api/blog/posts", Some(&token), Some(blog_post("same")))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/api/blog/posts", Some(&token), Some(blog_post("same")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_counters_increase_by_exactly_two() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (_, created) = app
        .request("POST", "/api/blog/posts", Some(&token), Some(blog_post("counted")))
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["likes"], 0);

    let (_, first) = app
        .request("POST", &format!("/api/blog/posts/{id}/like"), None, None)
        .await;
    let (_, second) = app
        .request("POST", &format!("/api/blog/posts/{id}/like"), None, None)
        .await;
    assert_eq!(first["data"]["likes"], 1);
    assert_eq!(second["data"]["likes"], 2);

    app.get(&format!("/api/blog/posts/{id}")).await;
    let (_, viewed) = app.get(&format!("/api/blog/posts/{id}")).await;
    assert_eq!(viewed["data"]["views"], 2);

    let (status, _) = app
        .request("POST", "/api/blog/posts/missing/like", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (_, created) = app
        .request("POST", "/api/blog/posts", Some(&admin), Some(blog_post("discussed")))
        .await;
    let post_id = created["data"]["id"].as_str().unwrap().to_string();
    let comments_uri = format!("/api/blog/posts/{post_id}/comments");

    let (status, _) = app
        .request("POST", &comments_uri, None, Some(json!({ "content": "hi" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let reader = app.sign_up("reader@example.com", "reader-pass").await;
    let (status, comment) = app
        .request("POST", &comments_uri, Some(&reader), Some(json!({ "content": "Nice" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let comment_id = comment["data"]["id"].as_str().unwrap().to_string();

    let (_, liked) = app
        .request("POST", &format!("/api/comments/{comment_id}/like"), None, None)
        .await;
    assert_eq!(liked["data"]["likes"], 1);

    let (_, listed) = app.get(&comments_uri).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["author"]["firstName"], "Test");

    let (status, _) = app
        .request("DELETE", &format!("/api/comments/{comment_id}"), Some(&reader), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request("DELETE", &format!("/api/comments/{comment_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_token_is_single_use() {
    let app = spawn_app().await;
    app.sign_up("forgetful@example.com", "old-pass").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({ "email": "forgetful@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let neutral = body["data"]["message"].clone();

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "forgetful@example.com");

    let user = app
        .state
        .store
        .users()
        .find_by_email("forgetful@example.com")
        .await
        .unwrap()
        .unwrap();
    let token = user.reset_password_token.unwrap();
    assert!(sent[0].text.contains(&token));

    let reset = json!({ "token": token, "newPassword": "new-pass" });
    let (status, _) = app
        .request("POST", "/api/auth/reset-password", None, Some(reset.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("POST", "/api/auth/reset-password", None, Some(reset))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired reset token");

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({ "email": "forgetful@example.com", "password": "new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown emails get the same answer and no mail
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({ "email": "nobody@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], neutral);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_contact_submission_notifies_admin() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "subject": "Hiring",
                "message": "<b>Let's talk</b>"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], false);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
    assert!(sent[0].subject.contains("Hiring"));
    assert!(!sent[0].html.contains("<b>Let's talk</b>"));

    let admin = app.admin_token().await;
    let (status, listed) = app
        .request("GET", "/api/contact/messages", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let (status, read) = app
        .request("PATCH", &format!("/api/contact/messages/{id}/read"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["data"]["isRead"], true);
}

#[tokio::test]
async fn test_contact_rejects_bad_email() {
    let app = spawn_app().await;
    let (status, body) = app
        .request(
            "POST",
            "/api/contact",
            None,
            Some(json!({ "name": "X", "email": "nope", "message": "hi" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_400_envelope() {
    let app = spawn_app().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_forum_accept_marks_post_answered() {
    let app = spawn_app().await;
    let asker = app.sign_up("asker@example.com", "asker-pass").await;
    let helper = app.sign_up("helper@example.com", "helper-pass").await;

    let (status, post) = app
        .request(
            "POST",
            "/api/forum/posts",
            Some(&asker),
            Some(json!({ "title": "How?", "content": "Details", "category": "general" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let post_id = post["data"]["id"].as_str().unwrap().to_string();

    let (status, reply) = app
        .request(
            "POST",
            &format!("/api/forum/posts/{post_id}/replies"),
            Some(&helper),
            Some(json!({ "content": "Like this" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let reply_id = reply["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = app.get("/api/forum/posts").await;
    assert_eq!(listed["data"][0]["replyCount"], 1);

    let accept_uri = format!("/api/forum/replies/{reply_id}/accept");
    let (status, _) = app.request("PATCH", &accept_uri, Some(&helper), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = app.request("PATCH", &accept_uri, Some(&asker), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["data"]["isAccepted"], true);

    let (_, fetched) = app.get(&format!("/api/forum/posts/{post_id}")).await;
    assert_eq!(fetched["data"]["isAnswered"], true);
    assert_eq!(fetched["data"]["views"], 1);
}

#[tokio::test]
async fn test_portfolio_toggle_visibility() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, section) = app
        .request(
            "POST",
            "/api/portfolio/sections",
            Some(&admin),
            Some(json!({ "title": "About", "type": "about", "content": "Hi", "sortOrder": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(section["data"]["type"], "about");
    assert_eq!(section["data"]["isVisible"], true);
    let id = section["data"]["id"].as_str().unwrap().to_string();

    let (status, toggled) = app
        .request(
            "PATCH",
            &format!("/api/portfolio/sections/{id}/toggle-visibility"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["data"]["isVisible"], false);
}

#[tokio::test]
async fn test_skills_grouping_and_featured() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    for (name, category, level, featured) in [
        ("Rust", "Technical", 5, true),
        ("Jira", "Tools", 3, false),
        ("SQL", "Technical", 4, false),
    ] {
        let (status, _) = app
            .request(
                "POST",
                "/api/skills",
                Some(&admin),
                Some(json!({
                    "name": name,
                    "category": category,
                    "proficiencyLevel": level,
                    "isFeatured": featured
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, grouped) = app.get("/api/skills?byCategory=true").await;
    assert_eq!(grouped["data"]["Technical"].as_array().unwrap().len(), 2);
    assert_eq!(grouped["data"]["Tools"].as_array().unwrap().len(), 1);

    let (_, featured) = app.get("/api/skills?featured=true").await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 1);
    assert_eq!(featured["data"][0]["name"], "Rust");

    let (status, body) = app
        .request(
            "POST",
            "/api/skills",
            Some(&admin),
            Some(json!({ "name": "Magic", "category": "Other", "proficiencyLevel": 6 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("proficiency"));
}

#[tokio::test]
async fn test_employment_round_trip() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .request(
            "POST",
            "/api/employment-experience",
            Some(&admin),
            Some(json!({
                "company": "Acme",
                "position": "Engineer",
                "startDate": "2021-03-01",
                "isCurrent": true,
                "technologies": ["Rust", "Postgres"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) = app.get(&format!("/api/employment-experience/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["company"], "Acme");
    assert_eq!(fetched["data"]["technologies"], json!(["Rust", "Postgres"]));

    let (status, _) = app
        .request(
            "POST",
            "/api/employment-experience",
            Some(&admin),
            Some(json!({ "company": "Acme", "position": "Engineer", "startDate": "March 2021" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hosted_login_disabled_without_provider() {
    let app = spawn_app().await;
    for uri in ["/api/login", "/api/callback", "/api/logout"] {
        let (status, _) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_hidden_profile_rows_are_not_public() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .request(
            "POST",
            "/api/skills",
            Some(&admin),
            Some(json!({
                "name": "Cobol",
                "category": "Legacy",
                "proficiencyLevel": 2,
                "isVisible": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/skills/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (_, listed) = app.get("/api/skills").await;
    assert!(listed["data"].as_array().unwrap().is_empty());

    // Admins can still edit it back into view
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/skills/{id}"),
            Some(&admin),
            Some(json!({
                "name": "Cobol",
                "category": "Legacy",
                "proficiencyLevel": 2,
                "isVisible": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/skills/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Cobol");
}

#[tokio::test]
async fn test_hosted_login_email_is_normalized() {
    let app = spawn_app().await;
    app.sign_up("ada@example.com", "secret-pass").await;
    let users = app.state.store.users();

    let clash = users
        .upsert_hosted(HostedProfile {
            subject: "oidc|ada".to_string(),
            email: Some(" Ada@Example.com ".to_string()),
            first_name: Some("Ada".to_string()),
            ..HostedProfile::default()
        })
        .await
        .unwrap();
    assert_eq!(clash.email, None);

    let owner = users.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_ne!(owner.id, "oidc|ada");

    let fresh = users
        .upsert_hosted(HostedProfile {
            subject: "oidc|grace".to_string(),
            email: Some("Grace@Example.COM".to_string()),
            ..HostedProfile::default()
        })
        .await
        .unwrap();
    assert_eq!(fresh.email.as_deref(), Some("grace@example.com"));

    let found = users.find_by_email("grace@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, "oidc|grace");
}

#[tokio::test]
async fn test_contact_succeeds_when_mail_fails() {
    let app = spawn_app_with_mailer(RecordingMailer::failing()).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/contact",
            None,
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "message": "Are you available?"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(app.mailer.sent().len(), 1);

    let stored = app.state.store.contact_messages().list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "Are you available?");
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected() {
    let app = spawn_app().await;
    app.sign_up("late@example.com", "old-pass").await;

    let users = app.state.store.users();
    let user = users.find_by_email("late@example.com").await.unwrap().unwrap();
    let expired_at = format_timestamp(Utc::now() - Duration::hours(1));
    users
        .save_reset_token(&user.id, "stale-token", &expired_at)
        .await
        .unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": "stale-token", "newPassword": "new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired reset token");

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({ "email": "late@example.com", "password": "old-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_weekly_digest_covers_previous_week() {
    let app = spawn_app().await;
    let store = &app.state.store;

    for (name, days_ago) in [("Recent", 1), ("Midweek", 6), ("Stale", 10)] {
        let message = store
            .contact_messages()
            .create(serde_json::from_value(json!({
                "name": name,
                "email": "someone@example.com",
                "message": "Hello"
            }))
            .unwrap())
            .await
            .unwrap();

        let mut active: contact_messages::ActiveModel = message.into();
        active.created_at = Set(format_timestamp(Utc::now() - Duration::days(days_ago)));
        active.update(&store.conn).await.unwrap();
    }

    let included = send_weekly_digest(store, &app.state.notifications, Utc::now(), 7)
        .await
        .unwrap();
    assert_eq!(included, 2);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
    assert!(sent[0].subject.starts_with("Weekly Contact Form Summary"));
    assert!(sent[0].text.contains("Total Submissions: 2"));
    assert!(sent[0].text.contains("Recent"));
    assert!(!sent[0].text.contains("Stale"));
}

#[tokio::test]
async fn test_bad_query_string_is_400_envelope() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/skills?featured=yes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query string")
    );

    let (status, body) = app.get("/api/blog/posts?published=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
