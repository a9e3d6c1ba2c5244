use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AuthServicePort;

/// Well-formed Argon2id hash that matches no password. Logins naming an
/// unknown email are verified against this hash, so a lookup miss performs
/// the same verification work as a mismatch against a real account.
const PLACEHOLDER_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Domain service implementing the registration, login, and profile flows.
///
/// All collaborators are injected at construction: the store behind its
/// port, the token service with its process-wide secret. Nothing is read
/// from ambient state.
pub struct AuthService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    token_service: Arc<TokenService>,
    password_hasher: PasswordHasher,
}

impl<R> AuthService<R>
where
    R: AccountRepository,
{
    /// Create a new service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `token_service` - Configured token issuer/verifier
    pub fn new(repository: Arc<R>, token_service: Arc<TokenService>) -> Self {
        Self {
            repository,
            token_service,
            password_hasher: PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AccountError> {
        // Hash before touching the store; the duplicate check is the insert
        // itself, so a taken email costs the same as a fresh one.
        let password_hash = self
            .password_hasher
            .hash(command.password.as_str())
            .map_err(|e| AccountError::Unavailable(format!("password hashing failed: {}", e)))?;

        let account_id = self.repository.insert(&command.email, &password_hash).await?;

        tracing::info!(account_id = %account_id, "account registered");

        Ok(account_id)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError> {
        let account = self.repository.find_by_email(&command.email).await?;

        let stored_hash = match &account {
            Some(account) => account.password_hash.as_str(),
            None => PLACEHOLDER_PASSWORD_HASH,
        };

        let password_matches = self
            .password_hasher
            .verify(command.password.as_str(), stored_hash);

        let account = match account {
            Some(account) if password_matches => account,
            _ => return Err(AccountError::InvalidCredentials),
        };

        let token = self
            .token_service
            .issue(&account.id.to_string())
            .map_err(|e| AccountError::Unavailable(format!("token issuance failed: {}", e)))?;

        tracing::info!(account_id = %account.id, "login succeeded");

        Ok(LoginOutcome { account, token })
    }

    async fn get_profile(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn change_email(
        &self,
        id: &AccountId,
        new_email: EmailAddress,
    ) -> Result<Account, AccountError> {
        self.repository.update_email(id, &new_email).await?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::account::models::Password;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn insert(&self, email: &EmailAddress, password_hash: &str) -> Result<AccountId, AccountError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn update_email(&self, id: &AccountId, new_email: &EmailAddress) -> Result<(), AccountError>;
        }
    }

    const TOKEN_SECRET: &[u8] = b"test-secret-key-for-token-signing-32b!";

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(TOKEN_SECRET, Duration::hours(1)))
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw.to_string()).unwrap()
    }

    fn password(raw: &str) -> Password {
        Password::new(raw.to_string()).unwrap()
    }

    fn stored_account(raw_email: &str, raw_password: &str) -> Account {
        Account {
            id: AccountId::new(),
            email: email(raw_email),
            password_hash: PasswordHasher::new().hash(raw_password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_before_insert() {
        let mut repository = MockTestAccountRepository::new();

        let assigned_id = AccountId::new();
        repository
            .expect_insert()
            .withf(|email, password_hash| {
                email.as_str() == "new@example.com"
                    && password_hash.starts_with("$argon2")
                    && password_hash != "Abcd1234!"
            })
            .times(1)
            .returning(move |_, _| Ok(assigned_id));

        let service = AuthService::new(Arc::new(repository), token_service());

        let command = RegisterCommand::new(email("new@example.com"), password("Abcd1234!"));
        let result = service.register(command).await;

        assert_eq!(result.unwrap(), assigned_id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_insert()
            .times(1)
            .returning(|email, _| Err(AccountError::DuplicateEmail(email.as_str().to_string())));

        let service = AuthService::new(Arc::new(repository), token_service());

        let command = RegisterCommand::new(email("taken@example.com"), password("Abcd1234!"));
        let result = service.register(command).await;

        assert!(matches!(
            result.unwrap_err(),
            AccountError::DuplicateEmail(_)
        ));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let mut repository = MockTestAccountRepository::new();

        let account = stored_account("user@example.com", "Abcd1234!");
        let account_id = account.id;
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "user@example.com")
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let tokens = token_service();
        let service = AuthService::new(Arc::new(repository), Arc::clone(&tokens));

        let command = LoginCommand::new(email("user@example.com"), password("Abcd1234!"));
        let outcome = service.login(command).await.unwrap();

        assert_eq!(outcome.account.id, account_id);
        assert_eq!(outcome.account.email.as_str(), "user@example.com");

        let claims = tokens.verify(&outcome.token).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestAccountRepository::new();

        let account = stored_account("user@example.com", "Correct_Password!");
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AuthService::new(Arc::new(repository), token_service());

        let command = LoginCommand::new(email("user@example.com"), password("Wrong_Password!"));
        let result = service.login(command).await;

        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_same_error() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), token_service());

        let command = LoginCommand::new(email("nobody@example.com"), password("Abcd1234!"));
        let result = service.login(command).await;

        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_unavailable() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AccountError::Unavailable("connection refused".to_string())));

        let service = AuthService::new(Arc::new(repository), token_service());

        let command = LoginCommand::new(email("user@example.com"), password("Abcd1234!"));
        let result = service.login(command).await;

        assert!(matches!(result.unwrap_err(), AccountError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_placeholder_hash_is_well_formed() {
        // The placeholder must take the full verification path, not the
        // malformed-hash short circuit.
        use argon2::password_hash::PasswordHash;

        assert!(PasswordHash::new(PLACEHOLDER_PASSWORD_HASH).is_ok());
        assert!(!PasswordHasher::new().verify("Abcd1234!", PLACEHOLDER_PASSWORD_HASH));
    }

    #[tokio::test]
    async fn test_get_profile_success() {
        let mut repository = MockTestAccountRepository::new();

        let account = stored_account("user@example.com", "Abcd1234!");
        let account_id = account.id;
        repository
            .expect_find_by_id()
            .withf(move |id| *id == account_id)
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AuthService::new(Arc::new(repository), token_service());

        let profile = service.get_profile(&account_id).await.unwrap();
        assert_eq!(profile.id, account_id);
        assert_eq!(profile.email.as_str(), "user@example.com");
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), token_service());

        let result = service.get_profile(&AccountId::new()).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_email_success() {
        let mut repository = MockTestAccountRepository::new();

        let mut account = stored_account("old@example.com", "Abcd1234!");
        account.email = email("new@example.com");
        let account_id = account.id;

        repository
            .expect_update_email()
            .withf(move |id, new_email| *id == account_id && new_email.as_str() == "new@example.com")
            .times(1)
            .returning(|_, _| Ok(()));
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AuthService::new(Arc::new(repository), token_service());

        let updated = service
            .change_email(&account_id, email("new@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_change_email_duplicate() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_update_email()
            .times(1)
            .returning(|_, new_email| {
                Err(AccountError::DuplicateEmail(new_email.as_str().to_string()))
            });

        let service = AuthService::new(Arc::new(repository), token_service());

        let result = service
            .change_email(&AccountId::new(), email("taken@example.com"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::DuplicateEmail(_)
        ));
    }
}
