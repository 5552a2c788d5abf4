//! Headless checkout form.
//!
//! [`PaymentForm`] keeps the text the payer typed, per-field errors and a
//! `submitting` flag. Rendering is left to the caller; the demo CLI drives it
//! from terminal prompts.
//!
//! Submission runs in two stages:
//!
//! 1. Required-field checks. Failures become inline field errors and the
//!    facade is never called.
//! 2. The amount text is read as display units, converted to base units, and
//!    the payment is handed to [`PaymentFacade::initiate_payment`]. The busy
//!    flag is held for exactly the duration of that call.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::amount;
use crate::facade::{PaymentFacade, PaymentRequest};
use crate::{PaymentIntent, Result, StackPayError, TransactionId};

/// Shown when the amount field is empty.
pub const AMOUNT_REQUIRED: &str = "Amount is required";
/// Shown when the recipient field is empty.
pub const RECIPIENT_REQUIRED: &str = "Recipient address is required";
/// Shown when the amount text is not a usable number.
pub const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a valid number";

/// Raw field text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    /// Amount in display units, as typed.
    pub amount: String,
    /// Recipient address.
    pub recipient: String,
    /// Optional memo.
    pub memo: String,
}

/// Inline validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    /// Error under the amount field.
    pub amount: Option<String>,
    /// Error under the recipient field.
    pub recipient: Option<String>,
}

impl FieldErrors {
    /// Returns true when no field has an error.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.recipient.is_none()
    }
}

type SuccessHook = Arc<dyn Fn(&TransactionId) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&StackPayError) + Send + Sync>;

/// Callbacks for the page embedding the form.
///
/// Unlike [`PaymentHooks`](crate::PaymentHooks) there is no cancel hook here;
/// a cancelled transaction is reported through `on_error`.
#[derive(Clone, Default)]
pub struct CheckoutHooks {
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl CheckoutHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the transaction id after a successful submission.
    pub fn on_success(mut self, hook: impl Fn(&TransactionId) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Called when the facade rejects or the wallet fails.
    pub fn on_error(mut self, hook: impl Fn(&StackPayError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for CheckoutHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutHooks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Result of a submission that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation blocked the submission.
    Invalid(FieldErrors),
    /// The payment was broadcast.
    Submitted {
        /// Id reported by the wallet.
        tx_id: TransactionId,
        /// The intent handed to the facade, amount in base units.
        intent: PaymentIntent,
    },
}

/// Read-only view of a form's busy flag.
#[derive(Clone, Debug)]
pub struct BusyHandle(Arc<AtomicBool>);

impl BusyHandle {
    /// Returns true while a submission is waiting on the wallet.
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds the busy flag; clears it on drop.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Checkout form state.
#[derive(Debug, Default)]
pub struct PaymentForm {
    values: FormValues,
    errors: FieldErrors,
    submitting: Arc<AtomicBool>,
}

impl PaymentForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with `values`.
    pub fn with_values(values: FormValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Current field text.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current inline errors.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Set the amount text. Clears the amount error.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.values.amount = amount.into();
        self.errors.amount = None;
    }

    /// Set the recipient. Clears the recipient error.
    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.values.recipient = recipient.into();
        self.errors.recipient = None;
    }

    /// Set the memo.
    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.values.memo = memo.into();
    }

    /// Returns true while a submission is in progress.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// A handle a renderer can poll from another task.
    pub fn busy_handle(&self) -> BusyHandle {
        BusyHandle(Arc::clone(&self.submitting))
    }

    /// Required-field checks only. Address shape is left to the facade.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.values.amount.trim().is_empty() {
            errors.amount = Some(AMOUNT_REQUIRED.to_string());
        }
        if self.values.recipient.trim().is_empty() {
            errors.recipient = Some(RECIPIENT_REQUIRED.to_string());
        }
        errors
    }

    /// Validate and, if the fields are filled in, submit the payment.
    ///
    /// Field errors come back as [`SubmitOutcome::Invalid`] without touching
    /// the facade or the hooks. Anything the facade reports, cancellation
    /// included, fires `on_error` once and is returned as `Err`.
    pub async fn submit(
        &mut self,
        facade: &PaymentFacade,
        hooks: &CheckoutHooks,
    ) -> Result<SubmitOutcome> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        }

        let amount = match amount::parse_display_amount(&self.values.amount)
            .and_then(amount::to_base_units)
        {
            Ok(amount) => amount,
            Err(_) => {
                self.errors.amount = Some(AMOUNT_NOT_A_NUMBER.to_string());
                return Ok(SubmitOutcome::Invalid(self.errors.clone()));
            }
        };

        let mut intent = PaymentIntent::new(self.values.recipient.trim(), amount);
        let memo = self.values.memo.trim();
        if !memo.is_empty() {
            intent = intent.with_memo(memo);
        }

        let result = {
            let _busy = BusyGuard::acquire(&self.submitting);
            facade.initiate_payment(PaymentRequest::new(intent.clone())).await
        };

        match result {
            Ok(tx_id) => {
                if let Some(hook) = &hooks.on_success {
                    hook(&tx_id);
                }
                Ok(SubmitOutcome::Submitted { tx_id, intent })
            }
            Err(err) => {
                if let Some(hook) = &hooks.on_error {
                    hook(&err);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{
        async_trait, CapabilityResult, ContractCall, Outcome, TransactionBroadcaster,
    };
    use crate::clarity::ClarityValue;
    use crate::config::StackPayConfig;
    use crate::test_utils::{HookRecorder, MockBehavior, MockWallet, VALID_ADDRESS};

    async fn connected(wallet: &Arc<MockWallet>) -> PaymentFacade {
        let facade = PaymentFacade::with_wallet(StackPayConfig::default(), wallet.clone());
        facade.connect().await.unwrap();
        facade
    }

    fn filled(amount: &str, recipient: &str, memo: &str) -> PaymentForm {
        PaymentForm::with_values(FormValues {
            amount: amount.to_string(),
            recipient: recipient.to_string(),
            memo: memo.to_string(),
        })
    }

    #[tokio::test]
    async fn test_empty_fields_block_submission() {
        let wallet = Arc::new(MockWallet::new());
        let facade = connected(&wallet).await;
        let recorder = HookRecorder::new();
        let mut form = PaymentForm::new();

        let outcome = form.submit(&facade, &recorder.checkout_hooks()).await.unwrap();

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected field errors");
        };
        assert_eq!(errors.amount.as_deref(), Some(AMOUNT_REQUIRED));
        assert_eq!(errors.recipient.as_deref(), Some(RECIPIENT_REQUIRED));
        assert_eq!(form.errors(), &errors);
        assert_eq!(wallet.broadcast_calls(), 0);
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn test_editing_a_field_clears_its_error() {
        let wallet = Arc::new(MockWallet::new());
        let facade = connected(&wallet).await;
        let mut form = PaymentForm::new();
        form.submit(&facade, &CheckoutHooks::new()).await.unwrap();

        form.set_amount("1");
        assert_eq!(form.errors().amount, None);
        assert!(form.errors().recipient.is_some());
    }

    #[tokio::test]
    async fn test_non_numeric_amount_is_a_field_error() {
        let wallet = Arc::new(MockWallet::new());
        let facade = connected(&wallet).await;
        let mut form = filled("lots", VALID_ADDRESS, "");

        let outcome = form.submit(&facade, &CheckoutHooks::new()).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(FieldErrors {
                amount: Some(AMOUNT_NOT_A_NUMBER.to_string()),
                recipient: None,
            })
        );
        assert_eq!(wallet.broadcast_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_converts_display_units() {
        let wallet = Arc::new(MockWallet::new().with_tx_id("0x01"));
        let facade = connected(&wallet).await;
        let recorder = HookRecorder::new();
        let mut form = filled("1.5", VALID_ADDRESS, "Coffee");

        let outcome = form.submit(&facade, &recorder.checkout_hooks()).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                tx_id: TransactionId::new("0x01"),
                intent: PaymentIntent::new(VALID_ADDRESS, 150_000_000).with_memo("Coffee"),
            }
        );
        assert_eq!(recorder.successes(), vec![TransactionId::new("0x01")]);
        assert!(!form.is_submitting());

        let call = wallet.last_call().unwrap();
        assert_eq!(call.function_args[1], ClarityValue::UInt(150_000_000));
        assert_eq!(call.function_args[2], ClarityValue::StringUtf8("Coffee".into()));
    }

    #[tokio::test]
    async fn test_facade_errors_reach_on_error() {
        let wallet = Arc::new(MockWallet::new().with_broadcast(MockBehavior::Cancel));
        let facade = connected(&wallet).await;
        let recorder = HookRecorder::new();
        let mut form = filled("1", VALID_ADDRESS, "");

        let err = form
            .submit(&facade, &recorder.checkout_hooks())
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(recorder.errors(), vec![err]);
        assert!(!form.is_submitting());

        // zero passes the required check but not the facade
        let mut form = filled("0", VALID_ADDRESS, "");
        let err = form
            .submit(&facade, &recorder.checkout_hooks())
            .await
            .unwrap_err();
        assert!(matches!(err, StackPayError::InvalidAmount(_)));
    }

    struct ObservingBroadcaster {
        busy: BusyHandle,
        seen_busy: AtomicBool,
    }

    #[async_trait]
    impl TransactionBroadcaster for ObservingBroadcaster {
        async fn open_contract_call(
            &self,
            _call: ContractCall,
        ) -> CapabilityResult<Outcome<TransactionId>> {
            self.seen_busy.store(self.busy.is_busy(), Ordering::SeqCst);
            Err("node unreachable".into())
        }
    }

    #[tokio::test]
    async fn test_busy_while_in_flight_and_cleared_after_failure() {
        let mut form = filled("2", VALID_ADDRESS, "");
        let broadcaster = Arc::new(ObservingBroadcaster {
            busy: form.busy_handle(),
            seen_busy: AtomicBool::new(false),
        });
        let facade = PaymentFacade::new(
            StackPayConfig::default(),
            Arc::new(MockWallet::new()),
            broadcaster.clone(),
        );
        facade.connect().await.unwrap();

        let err = form.submit(&facade, &CheckoutHooks::new()).await.unwrap_err();

        assert!(matches!(err, StackPayError::ExternalCapability(_)));
        assert!(broadcaster.seen_busy.load(Ordering::SeqCst));
        assert!(!form.is_submitting());
        assert!(!form.busy_handle().is_busy());
    }
}
