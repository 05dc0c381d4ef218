use flutterwave_tools::{ChargeData, FlutterwaveApiError, PaymentGateway, PaymentRequest};
use grandeur_engine::{
    db_types::{
        CartItem,
        ChargeConfirmation,
        NewUser,
        Order,
        OrderId,
        Receipt,
        ReceiptItem,
        Settlement,
        User,
        UserCredentials,
        UserProfileUpdate,
    },
    shop_objects::{UserQueryFilter, UserStats},
    AccountApiError,
    AccountManagement,
    CheckoutApiError,
    CheckoutDatabase,
};
use mockall::mock;

mock! {
    pub CheckoutDb {}
    impl Clone for CheckoutDb {
        fn clone(&self) -> Self;
    }
    impl CheckoutDatabase for CheckoutDb {
        fn url(&self) -> &str;
        async fn fetch_cart_for_checkout(&self, user_id: i64) -> Result<Vec<CartItem>, CheckoutApiError>;
        async fn fetch_order_by_reference(&self, reference: &OrderId) -> Result<Option<Order>, CheckoutApiError>;
        async fn complete_pending_order(&self, order: &Order, confirmation: &ChargeConfirmation) -> Result<Order, CheckoutApiError>;
        async fn settle_new_order(&self, confirmation: &ChargeConfirmation) -> Result<Option<Settlement>, CheckoutApiError>;
        async fn fetch_receipt_for_order(&self, reference: &OrderId) -> Result<Option<(Receipt, Vec<ReceiptItem>)>, CheckoutApiError>;
        async fn close(&mut self) -> Result<(), CheckoutApiError>;
    }
}

mock! {
    pub AccountManager {}
    impl Clone for AccountManager {
        fn clone(&self) -> Self;
    }
    impl AccountManagement for AccountManager {
        async fn create_user(&self, user: NewUser) -> Result<User, AccountApiError>;
        async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;
        async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AccountApiError>;
        async fn update_profile(&self, user_id: i64, update: UserProfileUpdate) -> Result<User, AccountApiError>;
        async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError>;
        async fn search_users(&self, filter: UserQueryFilter) -> Result<(Vec<User>, i64), AccountApiError>;
        async fn user_stats(&self) -> Result<UserStats, AccountApiError>;
    }
}

mock! {
    pub Gateway {}
    impl Clone for Gateway {
        fn clone(&self) -> Self;
    }
    impl PaymentGateway for Gateway {
        async fn create_payment_link(&self, request: PaymentRequest) -> Result<String, FlutterwaveApiError>;
        async fn verify_transaction(&self, transaction_id: &str) -> Result<ChargeData, FlutterwaveApiError>;
    }
}
