use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AccountError;
use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::TokenService;
use chrono::Duration;
use chrono::Utc;

pub const TOKEN_SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let token_service = Arc::new(TokenService::new(TOKEN_SECRET, Duration::seconds(3600)));
        let auth_service = Arc::new(AuthService::new(repository, Arc::clone(&token_service)));

        let router = create_router(auth_service, token_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Issue a token signed with the app's secret but an arbitrary lifetime.
    ///
    /// A negative lifetime produces an already-expired token.
    pub fn issue_token(&self, subject: &str, ttl_seconds: i64) -> String {
        TokenService::new(TOKEN_SECRET, Duration::seconds(ttl_seconds))
            .issue(subject)
            .expect("Failed to issue token")
    }

    /// Register an account and return its id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["account_id"].as_str().unwrap().to_string()
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

/// In-memory fake store enforcing the same email-uniqueness contract as the
/// Postgres adapter.
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<AccountId, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.iter().any(|account| account.email == *email) {
            return Err(AccountError::DuplicateEmail(email.as_str().to_string()));
        }

        let id = AccountId::new();
        accounts.push(Account {
            id,
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|account| account.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|account| account.id == *id).cloned())
    }

    async fn update_email(
        &self,
        id: &AccountId,
        new_email: &EmailAddress,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts
            .iter()
            .any(|account| account.email == *new_email && account.id != *id)
        {
            return Err(AccountError::DuplicateEmail(new_email.as_str().to_string()));
        }

        let account = accounts
            .iter_mut()
            .find(|account| account.id == *id)
            .ok_or(AccountError::NotFound(id.to_string()))?;
        account.email = new_email.clone();

        Ok(())
    }
}
