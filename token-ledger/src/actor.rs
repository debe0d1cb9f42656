//! Submission channel for the ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One task owns the `TokenLedger`, so calls never interleave
//! - Callers get a pending handle back immediately and await the outcome
//! - Bounded mailbox for backpressure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │            TokenClient / any Signer holder            │
//! └─────────────────────┬────────────────────────────────┘
//!                       │ SignedCall
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               LedgerHandle (Clone)                    │
//! │   submit() -> PendingSubmission (oneshot receiver)    │
//! └─────────────────────┬────────────────────────────────┘
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              LedgerActor (Single Task)                │
//! │   verify signature → replay check → ledger.apply()   │
//! │                       │                               │
//! │                       ▼                               │
//! │     Receipt to caller, events to broadcast channel    │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Submissions are applied in mailbox order. Nothing else is promised about
//! the relative order of pending submissions.
//!
//! Submission ids are UUIDv7. An id is accepted only while its timestamp is
//! inside [`REPLAY_WINDOW_MS`] of the actor's clock, and spent ids are
//! forgotten once they leave that window.

use crate::{
    ledger::TokenLedger,
    metrics::Metrics,
    signer::SignedCall,
    types::{Address, Amount, Receipt, TokenEvent, TokenInfo},
    Error, Result,
};
use chrono::Utc;
use std::collections::BTreeSet;
use tokio::sync::{broadcast, mpsc, oneshot};
use uuid::Uuid;

/// How far a submission id's timestamp may drift from the actor's clock
pub const REPLAY_WINDOW_MS: u64 = 10 * 60 * 1000;

/// Message sent to the ledger actor
#[derive(Debug)]
pub enum LedgerMessage {
    /// Apply a signed call
    Submit {
        call: SignedCall,
        response: oneshot::Sender<Result<Receipt>>,
    },

    /// Get token info snapshot
    GetTokenInfo {
        response: oneshot::Sender<TokenInfo>,
    },

    /// Get balance of an account
    GetBalance {
        account: Address,
        response: oneshot::Sender<Amount>,
    },

    /// Get current owner
    GetOwner {
        response: oneshot::Sender<Address>,
    },

    /// Register an observer of committed events
    Subscribe {
        response: oneshot::Sender<broadcast::Receiver<TokenEvent>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the ledger and processes messages one at a time
#[derive(Debug)]
pub struct LedgerActor {
    /// The ledger itself
    ledger: TokenLedger,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,

    /// Committed events for observers; the only sender
    events: broadcast::Sender<TokenEvent>,

    /// Spent submission ids inside the replay window, oldest first
    seen: BTreeSet<(u64, Uuid)>,

    /// Metrics
    metrics: Metrics,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(
        ledger: TokenLedger,
        mailbox: mpsc::Receiver<LedgerMessage>,
        events: broadcast::Sender<TokenEvent>,
        metrics: Metrics,
    ) -> Self {
        metrics.set_holders(ledger.holder_count());
        Self {
            ledger,
            mailbox,
            events,
            seen: BTreeSet::new(),
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        tracing::info!(symbol = self.ledger.symbol(), "ledger actor started");

        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Shutdown => break,
                msg => self.handle_message(msg),
            }
        }

        tracing::info!(symbol = self.ledger.symbol(), "ledger actor stopped");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::Submit { call, response } => {
                let result = self.submit(call);
                let _ = response.send(result);
            }

            LedgerMessage::GetTokenInfo { response } => {
                let _ = response.send(self.ledger.token_info());
            }

            LedgerMessage::GetBalance { account, response } => {
                let _ = response.send(self.ledger.balance_of(account));
            }

            LedgerMessage::GetOwner { response } => {
                let _ = response.send(self.ledger.owner());
            }

            LedgerMessage::Subscribe { response } => {
                let _ = response.send(self.events.subscribe());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }

    /// Verify, de-duplicate and apply one submission
    fn submit(&mut self, signed: SignedCall) -> Result<Receipt> {
        let op = signed.call.kind();

        let result = self.verify_and_apply(&signed);
        match &result {
            Ok(events) => {
                self.metrics.record_commit(op, events.len());
                self.metrics.set_holders(self.ledger.holder_count());
                tracing::info!(
                    submission_id = %signed.submission_id,
                    caller = %signed.caller,
                    op,
                    "submission committed"
                );
                for event in events {
                    // No receivers is fine; observers are optional.
                    let _ = self.events.send(event.clone());
                }
            }
            Err(e) if !e.is_rejection() => {
                self.metrics.record_rejection(op);
                tracing::error!(
                    submission_id = %signed.submission_id,
                    op,
                    error = %e,
                    "submission failed"
                );
            }
            Err(e) => {
                self.metrics.record_rejection(op);
                tracing::warn!(
                    submission_id = %signed.submission_id,
                    caller = %signed.caller,
                    op,
                    error = %e,
                    "submission rejected"
                );
            }
        }

        result.map(|events| Receipt {
            submission_id: signed.submission_id,
            caller: signed.caller,
            events,
            committed_at: Utc::now(),
        })
    }

    fn verify_and_apply(&mut self, signed: &SignedCall) -> Result<Vec<TokenEvent>> {
        signed.verify()?;

        // The id is spent once authenticated, whether or not the call applies.
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.spend(signed.submission_id, now_ms)?;

        self.ledger.apply(signed.caller, &signed.call)
    }

    /// Mark `id` as spent at `now_ms`, forgetting ids that left the window
    fn spend(&mut self, id: Uuid, now_ms: u64) -> Result<()> {
        let issued_ms = issued_at_ms(id)
            .ok_or_else(|| Error::StaleSubmission(format!("{} carries no timestamp", id)))?;
        if issued_ms.saturating_add(REPLAY_WINDOW_MS) < now_ms
            || issued_ms > now_ms.saturating_add(REPLAY_WINDOW_MS)
        {
            return Err(Error::StaleSubmission(format!(
                "{} is outside the replay window",
                id
            )));
        }

        // Anything older than the cutoff would be refused above anyway.
        let cutoff = now_ms.saturating_sub(REPLAY_WINDOW_MS);
        while let Some(&(oldest, _)) = self.seen.first() {
            if oldest >= cutoff {
                break;
            }
            self.seen.pop_first();
        }

        if !self.seen.insert((issued_ms, id)) {
            return Err(Error::DuplicateSubmission(id.to_string()));
        }
        Ok(())
    }
}

fn issued_at_ms(id: Uuid) -> Option<u64> {
    let (secs, nanos) = id.get_timestamp()?.to_unix();
    Some(secs.saturating_mul(1000) + u64::from(nanos / 1_000_000))
}

/// Outcome of a submission that has not been finalized yet
#[derive(Debug)]
pub struct PendingSubmission {
    submission_id: Uuid,
    response: oneshot::Receiver<Result<Receipt>>,
}

impl PendingSubmission {
    /// Id of the pending submission
    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    /// Wait until the actor commits or rejects the call
    pub async fn wait(self) -> Result<Receipt> {
        self.response
            .await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
    metrics: Metrics,
}

impl LedgerHandle {
    /// Enqueue a signed call; resolves once the call is in the mailbox
    pub async fn submit(&self, call: SignedCall) -> Result<PendingSubmission> {
        let submission_id = call.submission_id;
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Submit { call, response: tx }).await?;

        Ok(PendingSubmission {
            submission_id,
            response: rx,
        })
    }

    /// Submit and wait for the receipt
    pub async fn submit_and_wait(&self, call: SignedCall) -> Result<Receipt> {
        self.submit(call).await?.wait().await
    }

    /// Get token info snapshot
    pub async fn token_info(&self) -> Result<TokenInfo> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::GetTokenInfo { response: tx }).await?;
        Self::recv(rx).await
    }

    /// Get balance of `account`
    pub async fn balance_of(&self, account: Address) -> Result<Amount> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::GetBalance {
            account,
            response: tx,
        })
        .await?;
        Self::recv(rx).await
    }

    /// Get current owner
    pub async fn owner(&self) -> Result<Address> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::GetOwner { response: tx }).await?;
        Self::recv(rx).await
    }

    /// Receive committed events from now on
    ///
    /// The receiver reports `Closed` once the actor has stopped.
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<TokenEvent>> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Subscribe { response: tx }).await?;
        Self::recv(rx).await
    }

    /// Metrics of the actor behind this handle
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.send(LedgerMessage::Shutdown).await
    }

    async fn send(&self, msg: LedgerMessage) -> Result<()> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))
    }

    async fn recv<T>(rx: oneshot::Receiver<T>) -> Result<T> {
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }
}

/// Spawn the ledger actor
///
/// Both capacities must be positive.
pub fn spawn_ledger_actor(
    ledger: TokenLedger,
    mailbox_capacity: usize,
    event_capacity: usize,
) -> Result<LedgerHandle> {
    if mailbox_capacity == 0 || event_capacity == 0 {
        return Err(Error::Config(
            "channel capacities must be positive".to_string(),
        ));
    }

    let metrics =
        Metrics::new().map_err(|e| Error::Config(format!("Failed to create metrics: {}", e)))?;
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let (events, _) = broadcast::channel(event_capacity);
    let actor = LedgerActor::new(ledger, rx, events, metrics.clone());

    tokio::spawn(async move {
        actor.run().await;
    });

    Ok(LedgerHandle {
        sender: tx,
        metrics,
    })
}
