use crate::{
    db_types::{Address, AddressUpdate, NewAddress},
    shop_api::errors::AccountApiError,
};

#[allow(async_fn_in_trait)]
pub trait AddressManagement: Clone {
    /// All addresses for a user, default address first, then most recent.
    async fn fetch_addresses(&self, user_id: i64) -> Result<Vec<Address>, AccountApiError>;

    /// Creates an address. When `is_default` is set, any previous default for the user is cleared in the same
    /// transaction.
    async fn create_address(&self, user_id: i64, address: NewAddress) -> Result<Address, AccountApiError>;

    /// Partial update, scoped to the owning user.
    async fn update_address(
        &self,
        user_id: i64,
        address_id: i64,
        update: AddressUpdate,
    ) -> Result<Address, AccountApiError>;

    async fn delete_address(&self, user_id: i64, address_id: i64) -> Result<(), AccountApiError>;

    /// Makes the given address the user's only default.
    async fn set_default_address(&self, user_id: i64, address_id: i64) -> Result<Address, AccountApiError>;
}
