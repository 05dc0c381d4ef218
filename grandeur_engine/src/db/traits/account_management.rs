use crate::{
    db_types::{NewUser, User, UserCredentials, UserProfileUpdate},
    shop_api::{
        errors::AccountApiError,
        shop_objects::{UserQueryFilter, UserStats},
    },
};

#[allow(async_fn_in_trait)]
pub trait AccountManagement: Clone {
    /// Creates a new customer account. Fails with [`AccountApiError::UserAlreadyExists`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError>;

    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;

    /// Fetches the login credentials for an email address. Returns `None` for unknown emails; the caller is expected
    /// to fold that into the same error as a bad password.
    async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError>;

    /// Applies a partial profile update and returns the updated user.
    async fn update_profile(&self, user_id: i64, update: UserProfileUpdate) -> Result<User, AccountApiError>;

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError>;

    /// Paginated user listing with optional role and search filters. Admin surface.
    async fn search_users(&self, filter: UserQueryFilter) -> Result<(Vec<User>, i64), AccountApiError>;

    async fn user_stats(&self) -> Result<UserStats, AccountApiError>;
}
