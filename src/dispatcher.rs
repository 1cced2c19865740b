//! One dispatch tick: validate the form, resolve the amount, and fan out one
//! independent transfer task per valid recipient.

use crate::form::{FormState, ValidationError};
use crate::log_store::{LogEntry, LogId, LogUpdate};
use crate::token::TokenClient;
use crate::utils;
use crate::wallet::Session;
use ethers::types::{Address, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Failures that stop a whole tick before any transfer starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Wallet not connected")]
    NotConnected,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Could not fetch token decimals; is this a valid ERC20 contract? ({0})")]
    Decimals(String),
    #[error("Could not convert amount to token units: {0}")]
    AmountConversion(String),
}

/// Progress reported back to the GUI thread
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// A per-recipient attempt began
    Started(LogEntry),
    Updated { id: LogId, update: LogUpdate },
    /// Top-level failure for a whole tick
    Error(String),
}

#[derive(Clone)]
pub struct Dispatcher {
    events: UnboundedSender<DispatchEvent>,
    next_id: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end of its event channel
    pub fn new() -> (Self, UnboundedReceiver<DispatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_sender(tx), rx)
    }

    pub fn with_sender(events: UnboundedSender<DispatchEvent>) -> Self {
        Self {
            events,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_id(&self) -> LogId {
        LogId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn emit(&self, event: DispatchEvent) {
        // The receiver is gone only when the app is shutting down
        if self.events.send(event).is_err() {
            debug!("Dispatch event dropped: receiver closed");
        }
    }

    /// Run one tick.
    ///
    /// Returns the handles of the spawned per-recipient tasks. Top-level
    /// failures are returned and also emitted as `DispatchEvent::Error`.
    pub async fn dispatch(
        &self,
        session: Option<&Session>,
        form: &FormState,
    ) -> Result<Vec<JoinHandle<()>>, DispatchError> {
        match self.prepare(session, form).await {
            Ok((client, token, amount, recipients)) => Ok(recipients
                .into_iter()
                .map(|recipient| self.start_transfer(client.clone(), token, recipient, amount))
                .collect()),
            Err(e) => {
                warn!("Dispatch aborted: {}", e);
                self.emit(DispatchEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn prepare(
        &self,
        session: Option<&Session>,
        form: &FormState,
    ) -> Result<(Arc<dyn TokenClient>, Address, U256, Vec<Address>), DispatchError> {
        let session = session.ok_or(DispatchError::NotConnected)?;
        let request = form.validate()?;

        let decimals = session
            .client
            .decimals(request.token)
            .await
            .map_err(|e| DispatchError::Decimals(e.to_string()))?;

        let amount = utils::parse_token_amount(&request.amount, decimals)
            .map_err(|e| DispatchError::AmountConversion(e.to_string()))?;

        info!(
            "Dispatching {} ({} units, {} decimals) of {:?} to {} recipient(s)",
            utils::format_token_amount(amount, decimals),
            amount,
            decimals,
            request.token,
            request.recipients.len()
        );
        Ok((session.client.clone(), request.token, amount, request.recipients))
    }

    fn start_transfer(
        &self,
        client: Arc<dyn TokenClient>,
        token: Address,
        recipient: Address,
        amount: U256,
    ) -> JoinHandle<()> {
        let id = self.allocate_id();
        self.emit(DispatchEvent::Started(LogEntry::pending(id, recipient)));

        let dispatcher = self.clone();
        tokio::spawn(async move {
            let update = match run_transfer(&dispatcher, id, client.as_ref(), token, recipient, amount).await {
                Ok(()) => LogUpdate::Confirmed,
                Err(e) => {
                    warn!("Transfer {} to {:?} failed: {}", id, recipient, e);
                    LogUpdate::Failed { reason: e.to_string() }
                }
            };
            dispatcher.emit(DispatchEvent::Updated { id, update });
        })
    }
}

async fn run_transfer(
    dispatcher: &Dispatcher,
    id: LogId,
    client: &dyn TokenClient,
    token: Address,
    recipient: Address,
    amount: U256,
) -> anyhow::Result<()> {
    let tx_hash = client.submit_transfer(token, recipient, amount).await?;
    dispatcher.emit(DispatchEvent::Updated {
        id,
        update: LogUpdate::Submitted { tx_hash },
    });
    client.wait_for_confirmation(tx_hash).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_store::{LogStatus, LogStore};
    use crate::token::BoxFuture;
    use anyhow::{anyhow, Result};
    use ethers::types::TxHash;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const TOKEN: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

    #[derive(Default)]
    struct MockTokenClient {
        decimals: Option<u8>,
        rejected: HashSet<Address>,
        revert_all: bool,
        submissions: Mutex<Vec<(Address, U256)>>,
    }

    impl MockTokenClient {
        fn with_decimals(decimals: u8) -> Self {
            Self {
                decimals: Some(decimals),
                ..Default::default()
            }
        }
    }

    impl TokenClient for MockTokenClient {
        fn decimals(&self, _token: Address) -> BoxFuture<'_, Result<u8>> {
            Box::pin(async move { self.decimals.ok_or_else(|| anyhow!("execution reverted")) })
        }

        fn submit_transfer(&self, _token: Address, to: Address, amount: U256) -> BoxFuture<'_, Result<TxHash>> {
            Box::pin(async move {
                if self.rejected.contains(&to) {
                    return Err(anyhow!("user rejected transaction"));
                }
                let mut submissions = self.submissions.lock().unwrap();
                submissions.push((to, amount));
                Ok(TxHash::from_low_u64_be(submissions.len() as u64))
            })
        }

        fn wait_for_confirmation(&self, _tx_hash: TxHash) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                if self.revert_all {
                    Err(anyhow!("Transaction reverted in block 7"))
                } else {
                    Ok(())
                }
            })
        }
    }

    fn session(client: MockTokenClient) -> (Session, Arc<MockTokenClient>) {
        let client = Arc::new(client);
        let session = Session {
            account: Address::repeat_byte(0xab),
            chain_id: 1,
            client: client.clone(),
        };
        (session, client)
    }

    fn form(recipients: [&str; 3], amount: &str) -> FormState {
        FormState::new(recipients.map(String::from), TOKEN.to_string(), amount.to_string())
    }

    async fn run(
        dispatcher: &Dispatcher,
        session: Option<&Session>,
        form: &FormState,
    ) -> Result<(), DispatchError> {
        for handle in dispatcher.dispatch(session, form).await? {
            handle.await.unwrap();
        }
        Ok(())
    }

    fn drain(rx: &mut UnboundedReceiver<DispatchEvent>) -> (LogStore, Vec<String>) {
        let mut store = LogStore::new();
        let mut errors = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                DispatchEvent::Started(entry) => store.push(entry),
                DispatchEvent::Updated { id, update } => {
                    store.apply(id, update);
                }
                DispatchEvent::Error(message) => errors.push(message),
            }
        }
        (store, errors)
    }

    #[tokio::test]
    async fn test_not_connected() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let result = run(&dispatcher, None, &form([ALICE, "", ""], "1")).await;
        assert_eq!(result.unwrap_err(), DispatchError::NotConnected);

        let (store, errors) = drain(&mut rx);
        assert!(store.is_empty());
        assert_eq!(errors, vec!["Wallet not connected".to_string()]);
    }

    #[tokio::test]
    async fn test_only_valid_recipients_get_entries() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let (session, client) = session(MockTokenClient::with_decimals(6));

        run(&dispatcher, Some(&session), &form([ALICE, "not-an-address", BOB], "2"))
            .await
            .unwrap();

        let (store, errors) = drain(&mut rx);
        assert!(errors.is_empty());
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|e| e.status == LogStatus::Success && e.tx_hash.is_some()));
        assert_eq!(client.submissions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_all_recipients_invalid() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let (session, client) = session(MockTokenClient::with_decimals(18));

        let result = run(&dispatcher, Some(&session), &form(["", "0x12", "zzz"], "1")).await;
        assert_eq!(
            result.unwrap_err(),
            DispatchError::Invalid(ValidationError::NoValidRecipients)
        );

        let (store, errors) = drain(&mut rx);
        assert!(store.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(client.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decimals_failure_creates_no_entries() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let (session, _client) = session(MockTokenClient::default());

        let result = run(&dispatcher, Some(&session), &form([ALICE, BOB, ""], "1")).await;
        assert!(matches!(result, Err(DispatchError::Decimals(_))));

        let (store, errors) = drain(&mut rx);
        assert!(store.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Could not fetch token decimals"));
    }

    #[tokio::test]
    async fn test_amount_scaled_by_decimals() {
        let (dispatcher, _rx) = Dispatcher::new();
        let (session, client) = session(MockTokenClient::with_decimals(18));

        run(&dispatcher, Some(&session), &form([ALICE, "", ""], "5")).await.unwrap();

        let submissions = client.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].1, U256::from(5u64) * U256::exp10(18));
    }

    #[tokio::test]
    async fn test_unrepresentable_amount_creates_no_entries() {
        // 80 digits overflow 256 bits even before scaling by 10^6
        let huge = "9".repeat(80);
        for amount in ["0.0000001", huge.as_str()] {
            let (dispatcher, mut rx) = Dispatcher::new();
            let (session, client) = session(MockTokenClient::with_decimals(6));

            let result = run(&dispatcher, Some(&session), &form([ALICE, BOB, ""], amount)).await;
            assert!(matches!(result, Err(DispatchError::AmountConversion(_))), "amount {}", amount);

            let (store, errors) = drain(&mut rx);
            assert!(store.is_empty());
            assert_eq!(errors.len(), 1);
            assert!(client.submissions.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_sibling_failure_is_isolated() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let bob: Address = BOB.parse().unwrap();
        let (session, _client) = session(MockTokenClient {
            decimals: Some(18),
            rejected: HashSet::from([bob]),
            ..Default::default()
        });

        run(&dispatcher, Some(&session), &form([ALICE, BOB, ""], "1")).await.unwrap();

        let (store, _) = drain(&mut rx);
        let failed: Vec<_> = store.iter().filter(|e| e.status == LogStatus::Error).collect();
        let confirmed: Vec<_> = store.iter().filter(|e| e.status == LogStatus::Success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].recipient, bob);
        assert!(failed[0].tx_hash.is_none());
        assert_eq!(failed[0].message, "user rejected transaction");
        assert_eq!(confirmed.len(), 1);
    }

    #[tokio::test]
    async fn test_reverted_transfer_keeps_hash() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let (session, _client) = session(MockTokenClient {
            decimals: Some(18),
            revert_all: true,
            ..Default::default()
        });

        run(&dispatcher, Some(&session), &form([ALICE, "", ""], "1")).await.unwrap();

        let (store, _) = drain(&mut rx);
        let entry = store.iter().next().unwrap();
        assert_eq!(entry.status, LogStatus::Error);
        assert!(entry.tx_hash.is_some());
        assert!(entry.message.contains("reverted"));
    }

    #[tokio::test]
    async fn test_overlapping_ticks_have_disjoint_entries() {
        let (dispatcher, mut rx) = Dispatcher::new();
        let (session, _client) = session(MockTokenClient::with_decimals(18));
        let same = form([ALICE, "", ""], "1");

        let first = dispatcher.dispatch(Some(&session), &same).await.unwrap();
        let second = dispatcher.dispatch(Some(&session), &same).await.unwrap();
        for handle in first.into_iter().chain(second) {
            handle.await.unwrap();
        }

        let (store, _) = drain(&mut rx);
        assert_eq!(store.len(), 2);
        let ids: HashSet<LogId> = store.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(store.iter().all(|e| e.status == LogStatus::Success));
    }
}
