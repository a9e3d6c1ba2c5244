use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::RegisterCommand;

/// Port for the authentication and profile flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account with validated credentials.
    ///
    /// The password is hashed before the store is touched; no token is
    /// issued on success.
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Identifier of the new account
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Unavailable` - Store or hashing failure
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AccountError>;

    /// Authenticate credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `command` - Presented email and password
    ///
    /// # Returns
    /// The account and a signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, undifferentiated
    /// * `Unavailable` - Store or token-signing failure
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError>;

    /// Retrieve the profile of an authenticated account.
    ///
    /// # Errors
    /// * `NotFound` - Account no longer exists
    /// * `Unavailable` - Store failure
    async fn get_profile(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// Change the email address of an authenticated account.
    ///
    /// # Errors
    /// * `NotFound` - Account no longer exists
    /// * `DuplicateEmail` - New email is already registered
    /// * `Unavailable` - Store failure
    async fn change_email(
        &self,
        id: &AccountId,
        new_email: EmailAddress,
    ) -> Result<Account, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Email uniqueness is the store's job: `insert` and `update_email` rely on
/// a storage-level uniqueness constraint, never on a prior read, so two
/// concurrent writers for the same email cannot both succeed.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account and assign its identifier.
    ///
    /// # Arguments
    /// * `email` - Unique email address
    /// * `password_hash` - Already-hashed password, stored opaquely
    ///
    /// # Returns
    /// Store-assigned account identifier
    ///
    /// # Errors
    /// * `DuplicateEmail` - Uniqueness constraint rejected the email
    /// * `Unavailable` - Store operation failed
    async fn insert(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<AccountId, AccountError>;

    /// Retrieve an account by email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Replace the email address of an existing account.
    ///
    /// # Errors
    /// * `NotFound` - No account with this identifier
    /// * `DuplicateEmail` - Uniqueness constraint rejected the email
    /// * `Unavailable` - Store operation failed
    async fn update_email(
        &self,
        id: &AccountId,
        new_email: &EmailAddress,
    ) -> Result<(), AccountError>;
}
