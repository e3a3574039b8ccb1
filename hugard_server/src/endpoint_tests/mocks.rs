use hugard_engine::{
    db_types::{ChargeRecord, NewChargeRecord, PayerTotal, SettledPayment},
    Cents,
    LedgerError,
    LedgerStore,
    PaymentProvider,
    ProviderError,
    ProviderStatus,
};
use mockall::mock;

mock! {
    pub Ledger {}
    impl Clone for Ledger {
        fn clone(&self) -> Self;
    }
    impl LedgerStore for Ledger {
        fn url(&self) -> &str;
        async fn create(&self, charge: NewChargeRecord) -> Result<ChargeRecord, LedgerError>;
        async fn list_pending(&self) -> Result<Vec<ChargeRecord>, LedgerError>;
        async fn mark_settled(&self, invoice_ref: &str) -> Result<bool, LedgerError>;
        async fn fetch_charge(&self, invoice_ref: &str) -> Result<Option<ChargeRecord>, LedgerError>;
        async fn history(&self, payer_id: &str) -> Result<Vec<SettledPayment>, LedgerError>;
        async fn leaderboard(&self) -> Result<Vec<PayerTotal>, LedgerError>;
    }
}

mock! {
    pub Provider {}
    impl PaymentProvider for Provider {
        async fn create_charge(&self, payer_id: &str, amount: Cents) -> Result<String, ProviderError>;
        async fn charge_status(&self, invoice_ref: &str) -> Result<ProviderStatus, ProviderError>;
        fn payment_url(&self, invoice_ref: &str) -> String;
    }
}
