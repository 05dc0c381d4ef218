use log::*;

use crate::{
    db_types::{Address, AddressUpdate, NewAddress, NewUser, User, UserCredentials, UserProfileUpdate},
    events::{EventProducers, UserRegisteredEvent},
    shop_api::{
        errors::AccountApiError,
        shop_objects::{UserQueryFilter, UserStats},
    },
    traits::{AccountManagement, AddressManagement},
};

/// User accounts and their saved addresses.
pub struct AccountApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> std::fmt::Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi")
    }
}

impl<B> AccountApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    /// Registers a new customer account. The password arrives here already hashed; this API never sees plaintext
    /// credentials.
    pub async fn register(&self, user: NewUser) -> Result<User, AccountApiError> {
        let user = self.db.create_user(user).await?;
        debug!("👤️ User {} registered", user.email);
        for emitter in &self.producers.user_registered_producer {
            emitter.publish_event(UserRegisteredEvent { user: user.clone() }).await;
        }
        Ok(user)
    }

    pub async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        self.db.fetch_user_by_id(user_id).await
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        self.db.fetch_user_by_email(email).await
    }

    pub async fn credentials(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError> {
        self.db.fetch_credentials(email).await
    }

    pub async fn update_profile(&self, user_id: i64, update: UserProfileUpdate) -> Result<User, AccountApiError> {
        self.db.update_profile(user_id, update).await
    }

    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError> {
        self.db.update_password(user_id, password_hash).await
    }

    pub async fn search_users(&self, filter: UserQueryFilter) -> Result<(Vec<User>, i64), AccountApiError> {
        self.db.search_users(filter).await
    }

    pub async fn user_stats(&self) -> Result<UserStats, AccountApiError> {
        self.db.user_stats().await
    }
}

impl<B> AccountApi<B>
where B: AddressManagement
{
    pub async fn addresses(&self, user_id: i64) -> Result<Vec<Address>, AccountApiError> {
        self.db.fetch_addresses(user_id).await
    }

    pub async fn create_address(&self, user_id: i64, address: NewAddress) -> Result<Address, AccountApiError> {
        self.db.create_address(user_id, address).await
    }

    pub async fn update_address(
        &self,
        user_id: i64,
        address_id: i64,
        update: AddressUpdate,
    ) -> Result<Address, AccountApiError> {
        self.db.update_address(user_id, address_id, update).await
    }

    pub async fn delete_address(&self, user_id: i64, address_id: i64) -> Result<(), AccountApiError> {
        self.db.delete_address(user_id, address_id).await
    }

    pub async fn set_default_address(&self, user_id: i64, address_id: i64) -> Result<Address, AccountApiError> {
        self.db.set_default_address(user_id, address_id).await
    }
}
