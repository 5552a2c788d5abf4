//! Mock wallet with scripted outcomes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::fixtures::{test_tx_id, VALID_ADDRESS};
use crate::capability::{
    AuthRequest, CapabilityResult, ContractCall, Outcome, TransactionBroadcaster, UserData,
    WalletAuthorizer,
};
use crate::TransactionId;

/// How a mocked wallet flow ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MockBehavior {
    /// The user approves.
    #[default]
    Succeed,
    /// The user dismisses the prompt.
    Cancel,
    /// The wallet errors with this message.
    Fail(String),
}

/// A wallet implementing both capabilities without any user interaction.
///
/// Every call is counted and the last request is kept for inspection.
pub struct MockWallet {
    auth: Mutex<MockBehavior>,
    broadcast: Mutex<MockBehavior>,
    user: UserData,
    tx_id: TransactionId,
    auth_calls: AtomicUsize,
    broadcast_calls: AtomicUsize,
    last_auth: Mutex<Option<AuthRequest>>,
    last_call: Mutex<Option<ContractCall>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    /// A wallet that approves everything.
    pub fn new() -> Self {
        Self {
            auth: Mutex::new(MockBehavior::Succeed),
            broadcast: Mutex::new(MockBehavior::Succeed),
            user: UserData::new(VALID_ADDRESS),
            tx_id: test_tx_id(1),
            auth_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            last_auth: Mutex::new(None),
            last_call: Mutex::new(None),
        }
    }

    /// Script the connect flow.
    pub fn with_auth(self, behavior: MockBehavior) -> Self {
        *self.auth.lock().unwrap() = behavior;
        self
    }

    /// Script the transaction flow.
    pub fn with_broadcast(self, behavior: MockBehavior) -> Self {
        *self.broadcast.lock().unwrap() = behavior;
        self
    }

    /// Transaction id reported on broadcast.
    pub fn with_tx_id(mut self, tx_id: impl Into<TransactionId>) -> Self {
        self.tx_id = tx_id.into();
        self
    }

    /// Address reported on connect.
    pub fn user_address(&self) -> &str {
        &self.user.address
    }

    /// Number of connect flows started.
    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// Number of contract calls received.
    pub fn broadcast_calls(&self) -> usize {
        self.broadcast_calls.load(Ordering::SeqCst)
    }

    /// The most recent connect request.
    pub fn last_auth_request(&self) -> Option<AuthRequest> {
        self.last_auth.lock().unwrap().clone()
    }

    /// The most recent contract call.
    pub fn last_call(&self) -> Option<ContractCall> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletAuthorizer for MockWallet {
    async fn authenticate(&self, request: &AuthRequest) -> CapabilityResult<Outcome<UserData>> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_auth.lock().unwrap() = Some(request.clone());

        let behavior = self.auth.lock().unwrap().clone();
        match behavior {
            MockBehavior::Succeed => Ok(Outcome::Finished(self.user.clone())),
            MockBehavior::Cancel => Ok(Outcome::Cancelled),
            MockBehavior::Fail(msg) => Err(msg.into()),
        }
    }
}

#[async_trait]
impl TransactionBroadcaster for MockWallet {
    async fn open_contract_call(
        &self,
        call: ContractCall,
    ) -> CapabilityResult<Outcome<TransactionId>> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some(call);

        let behavior = self.broadcast.lock().unwrap().clone();
        match behavior {
            MockBehavior::Succeed => Ok(Outcome::Finished(self.tx_id.clone())),
            MockBehavior::Cancel => Ok(Outcome::Cancelled),
            MockBehavior::Fail(msg) => Err(msg.into()),
        }
    }
}
