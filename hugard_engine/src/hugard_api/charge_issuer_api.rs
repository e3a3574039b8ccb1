use hugard_common::{Cents, MINIMUM_CHARGE};
use log::*;

use crate::{
    db::traits::LedgerStore,
    db_types::NewChargeRecord,
    hugard_api::{
        charge_objects::{PayableReference, RequestedAmount},
        errors::ChargeIssuerError,
    },
    traits::{ChargeArtifacts, PaymentProvider},
};

/// `ChargeIssuerApi` turns a payment request into a provider charge, a pending ledger record and a payable reference.
///
/// Either both the provider charge and the ledger record exist when this API returns successfully, or no ledger
/// record was written at all.
#[derive(Debug)]
pub struct ChargeIssuerApi<B, P, A> {
    db: B,
    provider: P,
    artifacts: A,
}

impl<B, P, A> ChargeIssuerApi<B, P, A> {
    pub fn new(db: B, provider: P, artifacts: A) -> Self {
        Self { db, provider, artifacts }
    }
}

/// Normalizes an untrusted amount: absolute value, rounded half up to whole cents.
///
/// The amount is rejected if either the exact requested value or the rounded value is below `minimum`, so `0.999`
/// does not sneak past a `1.00` minimum by rounding up.
pub fn normalize_amount(requested: &RequestedAmount, minimum: Cents) -> Result<Cents, ChargeIssuerError> {
    let amount = requested.round_to_cents().map_err(|e| ChargeIssuerError::InvalidAmount(e.to_string()))?;
    if requested.is_below(minimum) || amount < minimum {
        return Err(ChargeIssuerError::BelowMinimum(minimum));
    }
    Ok(amount)
}

impl<B, P, A> ChargeIssuerApi<B, P, A>
where
    B: LedgerStore,
    P: PaymentProvider,
    A: ChargeArtifacts,
{
    /// Issues a new charge for `payer_id`.
    ///
    /// Validation failures have no side effects. Provider and ledger failures are logged in full here; callers should
    /// only show the requester a generic message.
    pub async fn issue_charge(
        &self,
        payer_id: &str,
        requested: RequestedAmount,
    ) -> Result<PayableReference, ChargeIssuerError> {
        let amount = normalize_amount(&requested, MINIMUM_CHARGE).map_err(|e| {
            debug!("💳️ Rejected payment request of {requested} from {payer_id}. {e}");
            e
        })?;
        trace!("💳️ Payment request from {payer_id} normalized from {requested} to {amount}");
        let invoice_ref = self.provider.create_charge(payer_id, amount).await.map_err(|e| {
            error!("💳️ Could not create a charge of {amount} for {payer_id}. {e}");
            ChargeIssuerError::from(e)
        })?;
        let payment_url = self.provider.payment_url(&invoice_ref);
        let reference = PayableReference { invoice_ref, amount, payment_url };
        // The artifact must exist before the record is visible to reconciliation, which removes it on settlement.
        if let Err(e) = self.artifacts.render(&reference.invoice_ref, reference.qr_payload()).await {
            warn!("💳️ Could not render the payment code for {}. {e}", reference.invoice_ref);
        }
        let new_record = NewChargeRecord::new(payer_id, amount, reference.invoice_ref.as_str());
        let record = match self.db.create(new_record).await {
            Ok(record) => record,
            Err(e) => {
                let e = ChargeIssuerError::from(e);
                match &e {
                    ChargeIssuerError::DuplicateInvoice(r) => {
                        error!("💳️ The provider reused invoice {r}, which is already in the ledger.");
                        // A pending record still needs its artifact. A settled one must not get it back.
                        let existing = self.db.fetch_charge(r).await.ok().flatten();
                        if existing.map(|c| c.is_settled()).unwrap_or(true) {
                            self.discard_artifact(r).await;
                        }
                    },
                    _ => {
                        error!("💳️ Charge {} was created but could not be recorded. {e}", reference.invoice_ref);
                        self.discard_artifact(&reference.invoice_ref).await;
                    },
                }
                return Err(e);
            },
        };
        info!("💳️ Charge {} of {} issued for {payer_id}", record.invoice_ref, record.amount);
        Ok(reference)
    }

    async fn discard_artifact(&self, invoice_ref: &str) {
        if let Err(e) = self.artifacts.remove(invoice_ref).await {
            warn!("💳️ Could not remove the payment code for {invoice_ref}. {e}");
        }
    }
}
