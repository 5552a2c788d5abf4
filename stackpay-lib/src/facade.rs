//! The payment facade.
//!
//! [`PaymentFacade`] holds the configuration and, after [`connect`], the
//! user's wallet session. Payments are validated locally, turned into a
//! gateway [`ContractCall`] and handed to the injected wallet.
//!
//! Every payment that reaches the wallet produces exactly one
//! [`PaymentOutcome`]. That outcome is fanned out to the caller's
//! [`PaymentHooks`] and to the returned `Result`, so the two channels always
//! agree. Validation failures return early and fire no hooks.
//!
//! [`connect`]: PaymentFacade::connect

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::amount;
use crate::capability::{
    AuthRequest, ContractCall, Outcome, TransactionBroadcaster, UserData, Wallet,
    WalletAuthorizer,
};
use crate::config::StackPayConfig;
use crate::errors::CancelledFlow;
use crate::link::{build_payment_link, PaymentLinkOptions};
use crate::{PaymentIntent, Result, StackPayError, TransactionId};

type SuccessHook = Arc<dyn Fn(&TransactionId) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&StackPayError) + Send + Sync>;
type CancelHook = Arc<dyn Fn() + Send + Sync>;

/// Optional callbacks fired when a dispatched payment completes.
#[derive(Clone, Default)]
pub struct PaymentHooks {
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
    on_cancel: Option<CancelHook>,
}

impl PaymentHooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the transaction id when the wallet broadcast succeeds.
    pub fn on_success(mut self, hook: impl Fn(&TransactionId) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Called when the wallet fails.
    pub fn on_error(mut self, hook: impl Fn(&StackPayError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Called when the user dismisses the transaction prompt.
    pub fn on_cancel(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for PaymentHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentHooks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

/// A payment plus the hooks to notify.
#[derive(Clone, Debug)]
pub struct PaymentRequest {
    /// What to pay.
    pub intent: PaymentIntent,
    /// Who to tell.
    pub hooks: PaymentHooks,
}

impl PaymentRequest {
    /// Request with no hooks.
    pub fn new(intent: PaymentIntent) -> Self {
        Self {
            intent,
            hooks: PaymentHooks::default(),
        }
    }

    /// Attach hooks.
    pub fn with_hooks(mut self, hooks: PaymentHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

impl From<PaymentIntent> for PaymentRequest {
    fn from(intent: PaymentIntent) -> Self {
        Self::new(intent)
    }
}

/// The single completion event of a dispatched payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Broadcast succeeded.
    Finished(TransactionId),
    /// The user dismissed the prompt.
    Cancelled,
    /// The wallet failed.
    Failed(StackPayError),
}

impl PaymentOutcome {
    /// Fire the matching hook and turn the outcome into the caller's result.
    pub fn complete(self, hooks: &PaymentHooks) -> Result<TransactionId> {
        match self {
            Self::Finished(tx_id) => {
                if let Some(hook) = &hooks.on_success {
                    hook(&tx_id);
                }
                Ok(tx_id)
            }
            Self::Cancelled => {
                if let Some(hook) = &hooks.on_cancel {
                    hook();
                }
                Err(StackPayError::cancelled(CancelledFlow::Transaction))
            }
            Self::Failed(err) => {
                if let Some(hook) = &hooks.on_error {
                    hook(&err);
                }
                Err(err)
            }
        }
    }
}

impl From<Outcome<TransactionId>> for PaymentOutcome {
    fn from(outcome: Outcome<TransactionId>) -> Self {
        match outcome {
            Outcome::Finished(tx_id) => Self::Finished(tx_id),
            Outcome::Cancelled => Self::Cancelled,
        }
    }
}

/// A connected wallet identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Identity reported by the wallet.
    pub user: UserData,
    /// When the connection was made.
    pub connected_at: DateTime<Utc>,
}

impl Session {
    fn new(user: UserData) -> Self {
        Self {
            user,
            connected_at: Utc::now(),
        }
    }

    /// The connected account's address.
    pub fn address(&self) -> &str {
        &self.user.address
    }
}

/// Lifecycle of a single payment call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentPhase {
    /// Not running.
    Idle,
    /// Checking preconditions.
    Validating,
    /// Waiting on the wallet.
    Dispatched,
}

impl fmt::Display for PaymentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Dispatched => "dispatched",
        };
        f.write_str(name)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Connects a wallet and submits gateway payments through it.
///
/// Concurrent `connect` calls are not serialized; the last one to finish
/// wins the session.
pub struct PaymentFacade {
    config: StackPayConfig,
    authorizer: Arc<dyn WalletAuthorizer>,
    broadcaster: Arc<dyn TransactionBroadcaster>,
    session: RwLock<Option<Session>>,
    in_flight: AtomicUsize,
}

impl fmt::Debug for PaymentFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentFacade")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

impl PaymentFacade {
    /// Create a facade over separate capability implementations.
    pub fn new(
        config: StackPayConfig,
        authorizer: Arc<dyn WalletAuthorizer>,
        broadcaster: Arc<dyn TransactionBroadcaster>,
    ) -> Self {
        Self {
            config,
            authorizer,
            broadcaster,
            session: RwLock::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a facade over one wallet providing both capabilities.
    pub fn with_wallet<W: Wallet + 'static>(config: StackPayConfig, wallet: Arc<W>) -> Self {
        Self::new(config, wallet.clone(), wallet)
    }

    /// The configuration this facade was built with.
    pub fn config(&self) -> &StackPayConfig {
        &self.config
    }

    /// The current session, if connected.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns true once a wallet connection succeeded.
    pub fn is_connected(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Returns true while a payment is waiting on the wallet.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Run the wallet's connect flow and keep the resulting session.
    ///
    /// Connecting again re-runs the flow and replaces the session on success.
    /// A cancelled or failed attempt leaves an existing session untouched.
    #[tracing::instrument(skip(self), fields(app = %self.config.app_name))]
    pub async fn connect(&self) -> Result<Session> {
        let request = AuthRequest {
            app: self.config.app_details(),
            session: self.session().map(|session| session.user),
        };

        match self.authorizer.authenticate(&request).await {
            Ok(Outcome::Finished(user)) => {
                let session = Session::new(user);
                *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
                info!(address = %session.address(), "wallet connected");
                Ok(session)
            }
            Ok(Outcome::Cancelled) => {
                info!("wallet connection cancelled by user");
                Err(StackPayError::cancelled(CancelledFlow::WalletConnection))
            }
            Err(e) => {
                warn!(error = %e, "wallet authorization failed");
                Err(StackPayError::external(e))
            }
        }
    }

    /// Submit a payment to the gateway contract.
    ///
    /// Preconditions are checked in order before the wallet is involved:
    /// a session must exist, then the recipient must be well-formed, then
    /// the amount must be positive.
    #[tracing::instrument(
        skip(self, request),
        fields(recipient = %request.intent.recipient, amount = request.intent.amount)
    )]
    pub async fn initiate_payment(&self, request: PaymentRequest) -> Result<TransactionId> {
        let PaymentRequest { intent, hooks } = request;

        debug!(phase = %PaymentPhase::Validating);
        if let Err(e) = self.check_preconditions(&intent) {
            debug!(phase = %PaymentPhase::Idle, error = %e, "payment rejected");
            return Err(e);
        }

        let call = ContractCall::payment(&self.config, &intent);
        let outcome = {
            let _guard = InFlight::enter(&self.in_flight);
            debug!(phase = %PaymentPhase::Dispatched, contract = %call.contract_id());
            match self.broadcaster.open_contract_call(call).await {
                Ok(outcome) => PaymentOutcome::from(outcome),
                Err(e) => PaymentOutcome::Failed(StackPayError::external(e)),
            }
        };

        match &outcome {
            PaymentOutcome::Finished(tx_id) => info!(phase = %PaymentPhase::Idle, %tx_id, "payment submitted"),
            PaymentOutcome::Cancelled => info!(phase = %PaymentPhase::Idle, "payment cancelled by user"),
            PaymentOutcome::Failed(e) => warn!(phase = %PaymentPhase::Idle, error = %e, "payment failed"),
        }

        outcome.complete(&hooks)
    }

    fn check_preconditions(&self, intent: &PaymentIntent) -> Result<()> {
        if !self.is_connected() {
            return Err(StackPayError::NotConnected);
        }
        intent.validate()
    }

    /// Build a checkout link on the configured base URL.
    pub fn create_payment_link(&self, options: &PaymentLinkOptions) -> Result<String> {
        build_payment_link(&self.config.checkout_base_url, options).map(String::from)
    }

    /// Convert base units to display units.
    pub fn to_display_units(base: u64) -> Decimal {
        amount::to_display_units(base)
    }

    /// Convert display units to base units.
    pub fn to_base_units(display: Decimal) -> Result<u64> {
        amount::to_base_units(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{pending, Pending};
    use crate::capability::{async_trait, CapabilityResult};
    use crate::clarity::ClarityValue;
    use crate::test_utils::{test_intent, HookRecorder, MockBehavior, MockWallet, VALID_ADDRESS};
    use rust_decimal_macros::dec;

    fn facade(wallet: &Arc<MockWallet>) -> PaymentFacade {
        PaymentFacade::with_wallet(StackPayConfig::default(), wallet.clone())
    }

    #[tokio::test]
    async fn test_connect_stores_session() {
        let wallet = Arc::new(MockWallet::new());
        let facade = facade(&wallet);
        assert!(!facade.is_connected());

        let session = facade.connect().await.unwrap();
        assert_eq!(session.address(), wallet.user_address());
        assert!(facade.is_connected());
        assert_eq!(facade.session(), Some(session));

        let request = wallet.last_auth_request().unwrap();
        assert_eq!(request.app.name, "StackPay");
        assert_eq!(request.session, None);
    }

    #[tokio::test]
    async fn test_reconnect_passes_and_replaces_session() {
        let wallet = Arc::new(MockWallet::new());
        let facade = facade(&wallet);
        let first = facade.connect().await.unwrap();

        let second = facade.connect().await.unwrap();
        assert_eq!(wallet.auth_calls(), 2);
        assert_eq!(wallet.last_auth_request().unwrap().session, Some(first.user));
        assert_eq!(facade.session(), Some(second));
    }

    #[tokio::test]
    async fn test_connect_cancelled() {
        let wallet = Arc::new(MockWallet::new().with_auth(MockBehavior::Cancel));
        let facade = facade(&wallet);

        let err = facade.connect().await.unwrap_err();
        assert_eq!(
            err,
            StackPayError::UserCancelled {
                flow: CancelledFlow::WalletConnection
            }
        );
        assert!(!facade.is_connected());
    }

    #[tokio::test]
    async fn test_connect_failure_is_wrapped() {
        let wallet = Arc::new(MockWallet::new().with_auth(MockBehavior::Fail("no extension".into())));
        let err = facade(&wallet).connect().await.unwrap_err();
        assert!(matches!(err, StackPayError::ExternalCapability(ref msg) if msg == "no extension"));
    }

    #[tokio::test]
    async fn test_pay_before_connect() {
        let wallet = Arc::new(MockWallet::new());
        let facade = facade(&wallet);
        let recorder = HookRecorder::new();

        let err = facade
            .initiate_payment(PaymentRequest::new(test_intent()).with_hooks(recorder.hooks()))
            .await
            .unwrap_err();

        assert_eq!(err, StackPayError::NotConnected);
        assert_eq!(wallet.broadcast_calls(), 0);
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn test_not_connected_reported_before_bad_intent() {
        let wallet = Arc::new(MockWallet::new());
        let err = facade(&wallet)
            .initiate_payment(PaymentIntent::new("invalid-address", 0).into())
            .await
            .unwrap_err();
        assert_eq!(err, StackPayError::NotConnected);
    }

    #[tokio::test]
    async fn test_invalid_intent_never_dispatched() {
        let wallet = Arc::new(MockWallet::new());
        let facade = facade(&wallet);
        facade.connect().await.unwrap();
        let recorder = HookRecorder::new();

        let err = facade
            .initiate_payment(
                PaymentRequest::new(PaymentIntent::new("invalid-address", 0))
                    .with_hooks(recorder.hooks()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StackPayError::InvalidRecipient(_)));

        let err = facade
            .initiate_payment(
                PaymentRequest::new(PaymentIntent::new(VALID_ADDRESS, 0))
                    .with_hooks(recorder.hooks()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StackPayError::InvalidAmount(_)));

        assert_eq!(wallet.broadcast_calls(), 0);
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn test_successful_payment() {
        let wallet = Arc::new(MockWallet::new().with_tx_id("0xfeed"));
        let facade = facade(&wallet);
        facade.connect().await.unwrap();
        let recorder = HookRecorder::new();

        let intent = PaymentIntent::new(VALID_ADDRESS, 1_000_000).with_memo("Order #1");
        let tx_id = facade
            .initiate_payment(PaymentRequest::new(intent).with_hooks(recorder.hooks()))
            .await
            .unwrap();

        assert_eq!(tx_id.as_str(), "0xfeed");
        assert_eq!(recorder.successes(), vec![tx_id]);
        assert!(recorder.errors().is_empty());
        assert_eq!(recorder.cancels(), 0);
        assert!(!facade.is_in_flight());

        let call = wallet.last_call().unwrap();
        assert_eq!(call.function_name, "process-payment");
        assert_eq!(call.contract_name, "stackpay-gateway");
        assert_eq!(
            call.function_args[2],
            ClarityValue::StringUtf8("Order #1".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancelled_payment_fires_only_cancel_hook() {
        let wallet = Arc::new(MockWallet::new().with_broadcast(MockBehavior::Cancel));
        let facade = facade(&wallet);
        facade.connect().await.unwrap();
        let recorder = HookRecorder::new();

        let err = facade
            .initiate_payment(PaymentRequest::new(test_intent()).with_hooks(recorder.hooks()))
            .await
            .unwrap_err();

        assert!(err.is_cancellation());
        assert_eq!(recorder.cancels(), 1);
        assert!(recorder.successes().is_empty());
        assert!(recorder.errors().is_empty());
    }

    #[tokio::test]
    async fn test_failed_payment_fires_only_error_hook() {
        let wallet = Arc::new(MockWallet::new().with_broadcast(MockBehavior::Fail("rejected".into())));
        let facade = facade(&wallet);
        facade.connect().await.unwrap();
        let recorder = HookRecorder::new();

        let err = facade
            .initiate_payment(PaymentRequest::new(test_intent()).with_hooks(recorder.hooks()))
            .await
            .unwrap_err();

        assert_eq!(err, StackPayError::ExternalCapability("rejected".into()));
        assert_eq!(recorder.errors(), vec![err]);
        assert!(recorder.successes().is_empty());
        assert_eq!(recorder.cancels(), 0);
        assert!(!facade.is_in_flight());
    }

    #[test]
    fn test_create_payment_link_uses_configured_base() {
        let wallet = Arc::new(MockWallet::new());
        let facade = PaymentFacade::with_wallet(
            StackPayConfig::default().with_checkout_base_url("http://localhost:3000"),
            wallet,
        );

        let link = facade
            .create_payment_link(&PaymentIntent::new(VALID_ADDRESS, 1_000_000).into())
            .unwrap();
        assert!(link.starts_with("http://localhost:3000/checkout?"));

        let err = facade
            .create_payment_link(&PaymentIntent::new("invalid-address", 1).into())
            .unwrap_err();
        assert!(matches!(err, StackPayError::InvalidRecipient(_)));
    }

    /// Holds the contract call open until the test reports through `completer`.
    struct HeldBroadcaster {
        entered: tokio::sync::Notify,
        pending: std::sync::Mutex<Option<Pending<TransactionId>>>,
    }

    #[async_trait]
    impl TransactionBroadcaster for HeldBroadcaster {
        async fn open_contract_call(
            &self,
            _call: ContractCall,
        ) -> CapabilityResult<Outcome<TransactionId>> {
            let pending = self.pending.lock().unwrap().take();
            self.entered.notify_one();
            match pending {
                Some(pending) => pending.wait().await,
                None => Err("contract call opened twice".into()),
            }
        }
    }

    #[tokio::test]
    async fn test_in_flight_only_while_dispatched() {
        let (completer, pending) = pending::<TransactionId>();
        let broadcaster = Arc::new(HeldBroadcaster {
            entered: tokio::sync::Notify::new(),
            pending: std::sync::Mutex::new(Some(pending)),
        });
        let facade = PaymentFacade::new(
            StackPayConfig::default(),
            Arc::new(MockWallet::new()),
            broadcaster.clone(),
        );

        // rejected before dispatch
        facade
            .initiate_payment(test_intent().into())
            .await
            .unwrap_err();
        assert!(!facade.is_in_flight());

        facade.connect().await.unwrap();
        assert!(!facade.is_in_flight());

        let observe = async {
            broadcaster.entered.notified().await;
            let during = facade.is_in_flight();
            completer.finish(TransactionId::new("0x01"));
            during
        };
        let (result, during) = tokio::join!(facade.initiate_payment(test_intent().into()), observe);

        assert!(during);
        assert_eq!(result.unwrap(), TransactionId::new("0x01"));
        assert!(!facade.is_in_flight());
    }

    #[test]
    fn test_unit_helpers() {
        assert_eq!(PaymentFacade::to_display_units(100_000_000), dec!(1));
        assert_eq!(PaymentFacade::to_base_units(dec!(0.5)).unwrap(), 50_000_000);
    }
}
