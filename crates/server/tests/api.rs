use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use db::{
    DBService,
    models::user::{CreateUser, User},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, app};
use services::services::auth::AuthService;
use tower::ServiceExt;

async fn test_state() -> AppState {
    let db = DBService::new_in_memory().await.unwrap();
    let auth = AuthService::new(b"test-secret", 1);
    AppState { db, auth }
}

async fn user_with_token(state: &AppState, username: &str, is_superuser: bool) -> (User, String) {
    let user = User::create(
        &state.db.pool,
        &CreateUser {
            username: username.into(),
            password_hash: AuthService::hash_password("s3cret"),
            is_superuser,
        },
    )
    .await
    .unwrap();
    let token = state.auth.issue_token(user.id).unwrap();
    (user, token)
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn a_plant_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "max_height": "medium",
        "spread": "compact",
        "flowering_season": "spring",
        "sunlight_exposure": "full_sun",
        "pruning_frequency": "occasional",
        "watering_needs": "moderate",
        "fertilization": "occasional",
        "pest_disease_resistance": "susceptible",
    })
}

#[tokio::test]
async fn test_gardens_require_login() {
    let state = test_state().await;
    let app = app(state);

    let (status, body) = request(&app, Method::GET, "/api/gardens", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_commenting_requires_login() {
    let state = test_state().await;
    let app = app(state);

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/plants/{}/comments", uuid::Uuid::new_v4()),
        None,
        Some(json!({"comment": "lovely"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_plant_creation_is_superuser_only() {
    let state = test_state().await;
    let (_, member_token) = user_with_token(&state, "member", false).await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&member_token),
        Some(a_plant_body("Rose")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Rose")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], json!("Rose"));

    let (status, body) = request(&app, Method::GET, "/api/plants", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], json!(1));
    assert_eq!(body["data"]["items"][0]["max_height"], json!("medium"));
}

#[tokio::test]
async fn test_unknown_attribute_value_is_rejected() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    let mut body = a_plant_body("Rose");
    body["watering_needs"] = json!("weekly");
    let (status, _) = request(&app, Method::POST, "/api/plants", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_empty_plant_name_is_rejected() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("   ")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_overlong_plant_name_is_rejected() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    let mut body = a_plant_body("Rose");
    body["name"] = json!("x".repeat(101));
    let (status, _) = request(&app, Method::POST, "/api/plants", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 100 characters is still within the limit.
    let mut body = a_plant_body("Rose");
    body["name"] = json!("x".repeat(100));
    let (status, _) = request(&app, Method::POST, "/api/plants", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_blank_plant_description_is_rejected() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    let mut body = a_plant_body("Rose");
    body["description"] = json!("   ");
    let (status, body) = request(&app, Method::POST, "/api/plants", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_plant_search() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let app = app(state);

    for name in ["Rose", "Rosemary", "Tulip"] {
        let (status, _) = request(
            &app,
            Method::POST,
            "/api/plants",
            Some(&admin_token),
            Some(a_plant_body(name)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = request(&app, Method::GET, "/api/plants/search?q=rose", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Rose", "Rosemary"]);
}

#[tokio::test]
async fn test_login_sets_cookie_and_me_returns_user() {
    let state = test_state().await;
    user_with_token(&state, "gardener", false).await;
    let app = app(state);

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "gardener", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_owned();
    assert_eq!(body["data"]["user"]["username"], json!("gardener"));
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = request(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("gardener"));
}

#[tokio::test]
async fn test_cookie_session_and_logout() {
    let state = test_state().await;
    user_with_token(&state, "gardener", false).await;
    let app = app(state);

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"username": "gardener", "password": "s3cret"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("garden_session="));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_owned();

    // The cookie alone authenticates.
    let me = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["username"], json!("gardener"));

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.starts_with("garden_session="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let state = test_state().await;
    user_with_token(&state, "gardener", false).await;
    let app = app(state);

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "gardener", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garden_flow() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let (_, owner_token) = user_with_token(&state, "owner", false).await;
    let (_, other_token) = user_with_token(&state, "other", false).await;
    let app = app(state);

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/gardens",
        Some(&owner_token),
        Some(json!({"name": "Back yard"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let garden_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Empty garden reports the empty-state message.
    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/gardens/{garden_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        json!("There are no plants in your garden yet.")
    );

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Azalea")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let plant_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/plantings"),
        Some(&owner_token),
        Some(json!({
            "plant_id": plant_id,
            "start_date": "2024-04-01",
            "location": "north bed",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/gardens/{garden_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_null());
    assert_eq!(body["data"]["plants"][0]["plant_name"], json!("Azalea"));
    assert_eq!(body["data"]["plants"][0]["location"], json!("north bed"));

    // Only the owner may rename or delete.
    let (status, _) = request(
        &app,
        Method::PUT,
        &format!("/api/gardens/{garden_id}"),
        Some(&other_token),
        Some(json!({"name": "Mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/gardens/{garden_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, Method::GET, "/api/gardens", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_monthly_tasks_filter() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let (_, owner_token) = user_with_token(&state, "owner", false).await;
    let app = app(state);

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Azalea")),
    )
    .await;
    let plant_id = body["data"]["id"].as_str().unwrap().to_owned();

    for month in [3, 3, 7] {
        let (status, _) = request(
            &app,
            Method::POST,
            "/api/maintenance",
            None,
            Some(json!({
                "plant_id": plant_id,
                "task": "pruning",
                "task_description": "trim",
                "week_of_month": "first",
                "month": month,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/gardens",
        Some(&owner_token),
        Some(json!({"name": "Back yard"})),
    )
    .await;
    let garden_id = body["data"]["id"].as_str().unwrap().to_owned();
    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/plantings"),
        Some(&owner_token),
        Some(json!({
            "plant_id": plant_id,
            "start_date": "2024-04-01",
            "location": "north bed",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/gardens/{garden_id}/monthly-tasks?month=3"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selected_month"], json!(3));
    assert_eq!(body["data"]["tasks"]["total_items"], json!(2));
    assert_eq!(body["data"]["tasks"]["items"][0]["plant_name"], json!("Azalea"));

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/gardens/{garden_id}/monthly-tasks?month=13"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_schedule_flow() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let (_, owner_token) = user_with_token(&state, "owner", false).await;
    let app = app(state);

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Azalea")),
    )
    .await;
    let plant_id = body["data"]["id"].as_str().unwrap().to_owned();
    let (_, body) = request(
        &app,
        Method::POST,
        "/api/maintenance",
        None,
        Some(json!({
            "plant_id": plant_id,
            "task": "fertilizing",
            "task_description": "feed with compost",
            "week_of_month": "first",
            "month": 4,
        })),
    )
    .await;
    let maintenance_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/gardens",
        Some(&owner_token),
        Some(json!({"name": "Back yard"})),
    )
    .await;
    let garden_id = body["data"]["id"].as_str().unwrap().to_owned();
    let (_, body) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/plantings"),
        Some(&owner_token),
        Some(json!({
            "plant_id": plant_id,
            "start_date": "2024-04-01",
            "location": "north bed",
        })),
    )
    .await;
    let planting_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/plantings/{planting_id}/schedules"),
        Some(&owner_token),
        Some(json!({"maintenance_id": maintenance_id, "month": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("not_started"));
    let schedule_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Same task and month again refreshes the existing record.
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/plantings/{planting_id}/schedules"),
        Some(&owner_token),
        Some(json!({
            "maintenance_id": maintenance_id,
            "month": 4,
            "status": "in_progress",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], json!(schedule_id));
    assert_eq!(body["data"]["status"], json!("in_progress"));

    let (status, body) = request(
        &app,
        Method::PUT,
        &format!("/api/schedules/{schedule_id}"),
        Some(&owner_token),
        Some(json!({"status": "done"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("done"));
    assert!(body["data"]["completion_date"].is_string());

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/plantings/{planting_id}/schedules?month=4"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_schedule_rejects_other_plants_task() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let (_, owner_token) = user_with_token(&state, "owner", false).await;
    let app = app(state);

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Azalea")),
    )
    .await;
    let planted_id = body["data"]["id"].as_str().unwrap().to_owned();
    let (_, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Tulip")),
    )
    .await;
    let other_plant_id = body["data"]["id"].as_str().unwrap().to_owned();

    // The task belongs to the plant that is not planted.
    let (_, body) = request(
        &app,
        Method::POST,
        "/api/maintenance",
        None,
        Some(json!({
            "plant_id": other_plant_id,
            "task": "pruning",
            "task_description": "trim",
            "week_of_month": "first",
            "month": 4,
        })),
    )
    .await;
    let task_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/gardens",
        Some(&owner_token),
        Some(json!({"name": "Back yard"})),
    )
    .await;
    let garden_id = body["data"]["id"].as_str().unwrap().to_owned();
    let (_, body) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/plantings"),
        Some(&owner_token),
        Some(json!({
            "plant_id": planted_id,
            "start_date": "2024-04-01",
            "location": "north bed",
        })),
    )
    .await;
    let planting_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/plantings/{planting_id}/schedules"),
        Some(&owner_token),
        Some(json!({"maintenance_id": task_id, "month": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_garden_sharing_grants_co_ownership() {
    let state = test_state().await;
    let (_, owner_token) = user_with_token(&state, "owner", false).await;
    let (_, helper_token) = user_with_token(&state, "helper", false).await;
    let app = app(state);

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/gardens",
        Some(&owner_token),
        Some(json!({"name": "Back yard"})),
    )
    .await;
    let garden_id = body["data"]["id"].as_str().unwrap().to_owned();

    // Before sharing the helper sees nothing and cannot rename.
    let (_, body) = request(&app, Method::GET, "/api/gardens", Some(&helper_token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (status, _) = request(
        &app,
        Method::PUT,
        &format!("/api/gardens/{garden_id}"),
        Some(&helper_token),
        Some(json!({"name": "Ours"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only an owner may share.
    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/owners"),
        Some(&helper_token),
        Some(json!({"username": "helper"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/owners"),
        Some(&owner_token),
        Some(json!({"username": "nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/gardens/{garden_id}/owners"),
        Some(&owner_token),
        Some(json!({"username": "helper"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, Method::GET, "/api/gardens", Some(&helper_token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (status, _) = request(
        &app,
        Method::PUT,
        &format!("/api/gardens/{garden_id}"),
        Some(&helper_token),
        Some(json!({"name": "Ours"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_comment_flow() {
    let state = test_state().await;
    let (_, admin_token) = user_with_token(&state, "admin", true).await;
    let (_, member_token) = user_with_token(&state, "member", false).await;
    let app = app(state);

    let (_, body) = request(
        &app,
        Method::POST,
        "/api/plants",
        Some(&admin_token),
        Some(a_plant_body("Rose")),
    )
    .await;
    let plant_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/plants/{plant_id}/comments"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("No comments for this plant yet."));

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/plants/{plant_id}/comments"),
        Some(&member_token),
        Some(json!({"comment": "Blooms beautifully in May."})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        Method::GET,
        &format!("/api/plants/{plant_id}/comments"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["username"], json!("member"));
    assert_eq!(body["data"][0]["comment"], json!("Blooms beautifully in May."));
}
