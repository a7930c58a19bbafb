mod common;

use anyhow::Result;
use axum::{middleware::from_fn, routing::get, Router};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{bearer, serve, spawn_app};
use fos_users_api::middleware::exception_middleware;

#[tokio::test]
async fn user_menus_for_authenticated_caller() -> Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app.get("/api/Home/GetUserMenus/1", Some(&bearer("1"))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Status"], "Success");
    assert_eq!(body["Message"][0]["MenuName"], "Dashboard");
    assert_eq!(body["Message"][1]["ParentMenuId"], 100);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_401_and_handler_not_run() -> Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app.get("/api/Home/GetUserMenus/1", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_null(), "401 has an empty body");

    let (status, _) = app
        .post(
            "/api/UserManagement/UserInsert",
            json!({ "UserName": "x", "Password": "y", "CompanyId": 1 }),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.directory.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn forged_token_is_401() -> Result<()> {
    let app = spawn_app().await?;

    let (status, _) = app.get("/api/Home/GetUserMenus/1", Some("not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": "1", "aud": common::API_NAME, "exp": chrono::Utc::now().timestamp() + 600 }),
        &jsonwebtoken::EncodingKey::from_secret(b"some-other-secret"),
    )?;
    let (status, _) = app.get("/api/Home/GetUserMenus/1", Some(&foreign)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.directory.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn user_menus_rejects_missing_or_non_numeric_id() -> Result<()> {
    let app = spawn_app().await?;
    let token = bearer("1");

    let (status, body) = app.get("/api/Home/GetUserMenus", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Error"]["Exception"]["Kind"], "MissingArgument");

    let (status, body) = app.get("/api/Home/GetUserMenus/abc", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Error"]["Exception"]["Kind"], "InvalidArgument");
    Ok(())
}

#[tokio::test]
async fn all_users_filters_by_company() -> Result<()> {
    let app = spawn_app().await?;
    let token = bearer("1");

    let (status, body) = app.get("/api/Users/GetAllUsers", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Message"].as_array().map(Vec::len), Some(2));

    let (status, body) = app.get("/api/Users/GetAllUsers?companyId=77", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Message"], json!([]));
    Ok(())
}

#[tokio::test]
async fn all_users_rejects_malformed_query_with_envelope() -> Result<()> {
    let app = spawn_app().await?;

    let response = app
        .client
        .get(format!("{}/api/Users/GetAllUsers?companyId=abc", app.base_url))
        .bearer_auth(bearer("1"))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{}", content_type);

    let body: Value = response.json().await?;
    assert_eq!(body["Status"], "Error");
    assert_eq!(body["StatusCode"], 400);
    assert_eq!(body["Error"]["Exception"]["Kind"], "InvalidQueryString");
    assert_eq!(app.directory.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn deactivate_user_reports_outcome() -> Result<()> {
    let app = spawn_app().await?;
    let token = bearer("1");

    let (status, body) = app
        .request(Method::DELETE, "/api/Users/DeactivateUser/2", None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Message"], "User deactivated successfully");

    app.directory.set_save_status(0);
    let (status, body) = app
        .request(Method::DELETE, "/api/Users/DeactivateUser/2", None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "An error occurred while deactivating the user");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404_not_401() -> Result<()> {
    let app = spawn_app().await?;

    let response = app
        .client
        .get(format!("{}/api/Nowhere", app.base_url))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_without_database_is_503() -> Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app.get("/health", None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["Message"]["Database"], "not configured");
    Ok(())
}

async fn explode() -> &'static str {
    panic!("lookup table corrupted")
}

#[tokio::test]
async fn panics_become_500_envelope() -> Result<()> {
    let router = Router::new()
        .route("/explode", get(explode))
        .layer(from_fn(exception_middleware));
    let base_url = serve(router).await?;

    let response = reqwest::get(format!("{}/explode", base_url)).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await?;
    assert_eq!(body["Status"], "Error");
    assert_eq!(body["StatusCode"], 500);
    assert_eq!(body["Error"]["Exception"]["Kind"], "Panic");
    assert_eq!(body["Error"]["Exception"]["Message"], "lookup table corrupted");
    Ok(())
}
