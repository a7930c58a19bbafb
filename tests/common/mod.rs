#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use fos_users_api::auth::TokenValidator;
use fos_users_api::database::models::{
    Lookup, NewUser, ReportingLevel, SaveStatus, User, UserDetails, UserMenu, UserTranslander,
};
use fos_users_api::database::{DatabaseError, UserManagementRepository, UserRepository};
use fos_users_api::identity::{IdentityClient, IdentityError, TokenGrant};
use fos_users_api::{app, services, AppState};

pub const TOKEN_SECRET: &str = "integration-test-secret";
pub const API_NAME: &str = "user_api";

/// Company whose lookups fail with a database error
pub const BROKEN_COMPANY: i64 = 999;

/// In-memory stand-in for the stored procedures
pub struct FakeDirectory {
    users: Vec<User>,
    save_status: AtomicI32,
    pub calls: AtomicUsize,
    pub inserted: Mutex<Vec<NewUser>>,
}

impl FakeDirectory {
    pub fn seeded() -> Self {
        Self {
            users: vec![user(1, "alice", true), user(2, "carol", false)],
            save_status: AtomicI32::new(SaveStatus::OK),
            calls: AtomicUsize::new(0),
            inserted: Mutex::new(Vec::new()),
        }
    }

    /// Code returned by the next insert/update/deactivate calls
    pub fn set_save_status(&self, code: i32) {
        self.save_status.store(code, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn status(&self) -> SaveStatus {
        SaveStatus::from_code(self.save_status.load(Ordering::SeqCst))
    }
}

fn user(user_id: i64, user_name: &str, is_active: bool) -> User {
    User {
        user_id,
        user_name: user_name.to_string(),
        password: String::new(),
        first_name: Some(user_name.to_uppercase()),
        last_name: None,
        email: Some(format!("{}@fos.test", user_name)),
        company_id: 10,
        user_level_id: Some(2),
        is_active,
        session_expire_date: None,
    }
}

#[async_trait]
impl UserRepository for FakeDirectory {
    async fn user_by_user_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        self.record_call();
        Ok(self.users.iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn user_menus(&self, user_id: i64) -> Result<Vec<UserMenu>, DatabaseError> {
        self.record_call();
        if user_id != 1 {
            return Ok(Vec::new());
        }
        Ok(vec![
            UserMenu {
                menu_id: 100,
                menu_name: "Dashboard".into(),
                parent_menu_id: None,
                url: Some("/dashboard".into()),
                icon: Some("home".into()),
                display_order: 1,
            },
            UserMenu {
                menu_id: 101,
                menu_name: "Users".into(),
                parent_menu_id: Some(100),
                url: Some("/users".into()),
                icon: None,
                display_order: 2,
            },
        ])
    }

    async fn all_users(&self, company_id: Option<i64>) -> Result<Vec<User>, DatabaseError> {
        self.record_call();
        Ok(self
            .users
            .iter()
            .filter(|u| company_id.map_or(true, |c| u.company_id == c))
            .cloned()
            .collect())
    }

    async fn deactivate_user(&self, _user_id: i64) -> Result<SaveStatus, DatabaseError> {
        self.record_call();
        Ok(self.status())
    }
}

#[async_trait]
impl UserManagementRepository for FakeDirectory {
    async fn user_levels(&self, _user_id: i64, company_id: i64) -> Result<Vec<Lookup>, DatabaseError> {
        self.record_call();
        if company_id == BROKEN_COMPANY {
            return Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(vec![
            Lookup { id: 1, name: "Administrator".into() },
            Lookup { id: 2, name: "Manager".into() },
        ])
    }

    async fn designations(&self, _company_id: i64, prefix: Option<&str>) -> Result<Vec<Lookup>, DatabaseError> {
        self.record_call();
        let all = [Lookup { id: 7, name: "Engineer".into() }, Lookup { id: 8, name: "Editor".into() }];
        Ok(all
            .into_iter()
            .filter(|l| prefix.map_or(true, |p| l.name.starts_with(p)))
            .collect())
    }

    async fn reporting_levels(
        &self,
        _company_id: i64,
        user_level_id: Option<i64>,
        _prefix: Option<&str>,
    ) -> Result<Vec<ReportingLevel>, DatabaseError> {
        self.record_call();
        Ok(vec![ReportingLevel {
            user_id: 1,
            user_name: "alice".into(),
            user_level_id,
            reports_to: None,
        }])
    }

    async fn existing_user_details(
        &self,
        user_id: i64,
        company_id: i64,
    ) -> Result<Option<UserDetails>, DatabaseError> {
        self.record_call();
        Ok(self
            .users
            .iter()
            .find(|u| u.user_id == user_id && u.company_id == company_id)
            .map(|u| UserDetails {
                user_id: u.user_id,
                user_name: u.user_name.clone(),
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
                email: u.email.clone(),
                mobile_no: None,
                company_id: u.company_id,
                user_level_id: u.user_level_id,
                designation_id: Some(7),
                reporting_to: None,
                is_active: u.is_active,
            }))
    }

    async fn user_translanders(
        &self,
        _company_id: i64,
        _prefix: Option<&str>,
    ) -> Result<Vec<UserTranslander>, DatabaseError> {
        self.record_call();
        Ok(vec![UserTranslander {
            user_id: 1,
            user_name: "alice".into(),
            full_name: Some("Alice Liddell".into()),
        }])
    }

    async fn insert_user(&self, user: &NewUser) -> Result<SaveStatus, DatabaseError> {
        self.record_call();
        self.inserted.lock().unwrap().push(user.clone());
        Ok(self.status())
    }

    async fn update_user(&self, _user_id: i64, user: &NewUser) -> Result<SaveStatus, DatabaseError> {
        self.record_call();
        self.inserted.lock().unwrap().push(user.clone());
        Ok(self.status())
    }
}

/// Identity server that knows one account, alice/secret
pub struct FakeIdentity;

pub const ACCESS_TOKEN: &str = "access-alice";
pub const REFRESH_TOKEN: &str = "refresh-alice";
pub const LOGIN_LIFETIME: i64 = 3600;
pub const REFRESH_LIFETIME: i64 = 1800;

#[async_trait]
impl IdentityClient for FakeIdentity {
    async fn login(&self, user_name: &str, password: &str) -> Result<TokenGrant, IdentityError> {
        if user_name == "alice" && password == "secret" {
            Ok(TokenGrant {
                access_token: ACCESS_TOKEN.into(),
                refresh_token: Some(REFRESH_TOKEN.into()),
                expires_in: LOGIN_LIFETIME,
            })
        } else {
            Err(IdentityError::Rejected { status: 400, error: "invalid_grant".into() })
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, IdentityError> {
        if refresh_token == REFRESH_TOKEN {
            // Reusable refresh tokens are left out of the response
            Ok(TokenGrant {
                access_token: "access-alice-2".into(),
                refresh_token: None,
                expires_in: REFRESH_LIFETIME,
            })
        } else {
            Err(IdentityError::Rejected { status: 400, error: "invalid_grant".into() })
        }
    }
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub directory: Arc<FakeDirectory>,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("non-JSON body: {}", text))?
        };
        Ok((status, body))
    }

    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, Some(body), token).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, None, token).await
    }
}

/// Serve the full router on an unused local port
pub async fn spawn_app() -> Result<TestApp> {
    let directory = Arc::new(FakeDirectory::seeded());
    let dispatcher = services::dispatcher(directory.clone(), directory.clone(), Arc::new(FakeIdentity))?;
    let state = AppState::new(dispatcher, TokenValidator::new(TOKEN_SECRET, API_NAME));

    let base_url = serve(app(state)).await?;
    Ok(TestApp {
        base_url,
        client: reqwest::Client::new(),
        directory,
    })
}

/// Bind a router to a picked port and return its base URL
pub async fn serve(router: axum::Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(format!("http://127.0.0.1:{}", port))
}

/// Access token as the identity server would sign it
pub fn bearer(subject: &str) -> String {
    let claims = json!({
        "sub": subject,
        "aud": API_NAME,
        "exp": Utc::now().timestamp() + 600,
        "client_id": "fos-web",
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TOKEN_SECRET.as_bytes()))
        .expect("sign test token")
}
