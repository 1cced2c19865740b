//! Wallet backends: connect to a signer and hand out a token client for it.
//!
//! `request_accounts` is the user-initiated connect (may prompt on a hardware
//! device); `authorized_session` is the silent startup check.

use crate::config::{Config, WalletKind};
use crate::token::{BoxFuture, EthersTokenClient, TokenClient};
use anyhow::{anyhow, Context, Result};
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::signers::{HDPath, Ledger};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Connected account plus the signer-backed client used to send transfers
#[derive(Clone)]
pub struct Session {
    pub account: Address,
    pub chain_id: u64,
    pub client: Arc<dyn TokenClient>,
}

impl Session {
    /// Build a session from a provider and signer.
    ///
    /// The signer is wrapped in a nonce manager so concurrent transfers from
    /// one account each get their own nonce.
    pub fn from_signer<S: Signer + 'static>(provider: Provider<Http>, signer: S, chain_id: u64) -> Self {
        let account = signer.address();
        let middleware = NonceManagerMiddleware::new(SignerMiddleware::new(provider, signer), account);
        Self {
            account,
            chain_id,
            client: Arc::new(EthersTokenClient::new(middleware)),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

pub trait WalletProvider: Send + Sync {
    /// Display name of the backend
    fn label(&self) -> &'static str;

    /// Ask the wallet for account access; may prompt the user
    fn request_accounts(&self) -> BoxFuture<'_, Result<Session>>;

    /// Accounts already authorized, without prompting
    fn authorized_session(&self) -> BoxFuture<'_, Result<Option<Session>>>;
}

/// Create the wallet backend selected in the config
pub fn from_config(config: &Config) -> Result<Arc<dyn WalletProvider>> {
    let wallet: Arc<dyn WalletProvider> = match config.wallet_kind {
        WalletKind::PrivateKey => Arc::new(LocalKeyWallet::new(config.clone())?),
        WalletKind::Ledger => Arc::new(LedgerWallet::new(config.clone())),
    };
    info!("Using {} wallet backend with RPC {}", wallet.label(), config.rpc_url);
    Ok(wallet)
}

/// Chain ID from config, or queried from the node when not configured
async fn resolve_chain_id(provider: &Provider<Http>, configured: Option<u64>) -> Result<u64> {
    match configured {
        Some(chain_id) => Ok(chain_id),
        None => {
            let chain_id = provider
                .get_chainid()
                .await
                .context("Could not reach the RPC endpoint to read the chain ID")?;
            Ok(chain_id.as_u64())
        }
    }
}

/// Parse a hex private key (with or without `0x`) into a wallet
pub fn parse_private_key(key: &str) -> Result<LocalWallet> {
    let trimmed = key.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(hex_part).map_err(|_| anyhow!("PRIVATE_KEY is not valid hex"))?;
    if bytes.len() != 32 {
        return Err(anyhow!("PRIVATE_KEY must be 32 bytes, got {}", bytes.len()));
    }
    LocalWallet::from_bytes(&bytes).map_err(|e| anyhow!("PRIVATE_KEY is not a valid secp256k1 key: {}", e))
}

/// Wallet backed by a private key from the environment
pub struct LocalKeyWallet {
    config: Config,
    wallet: Option<LocalWallet>,
}

impl LocalKeyWallet {
    pub fn new(config: Config) -> Result<Self> {
        let wallet = config.private_key.as_deref().map(parse_private_key).transpose()?;
        Ok(Self { config, wallet })
    }

    async fn open_session(&self) -> Result<Session> {
        let wallet = self
            .wallet
            .clone()
            .ok_or_else(|| anyhow!("No wallet found. Set PRIVATE_KEY in your environment or .env file."))?;
        let provider = self.config.get_provider()?;
        let chain_id = resolve_chain_id(&provider, self.config.chain_id).await?;
        let signer = wallet.with_chain_id(chain_id);
        info!("Connected key wallet {:?} on chain {}", signer.address(), chain_id);
        Ok(Session::from_signer(provider, signer, chain_id))
    }
}

impl WalletProvider for LocalKeyWallet {
    fn label(&self) -> &'static str {
        WalletKind::PrivateKey.label()
    }

    fn request_accounts(&self) -> BoxFuture<'_, Result<Session>> {
        Box::pin(self.open_session())
    }

    fn authorized_session(&self) -> BoxFuture<'_, Result<Option<Session>>> {
        Box::pin(async move {
            if self.wallet.is_none() {
                return Ok(None);
            }
            self.open_session().await.map(Some)
        })
    }
}

/// Ledger hardware wallet using native ethers-rs support
pub struct LedgerWallet {
    config: Config,
}

impl LedgerWallet {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn open_session(&self) -> Result<Session> {
        let provider = self.config.get_provider()?;
        let chain_id = resolve_chain_id(&provider, self.config.chain_id).await?;
        let hd_path = self.config.ledger_derivation_path();

        info!("Opening Ledger at path {} for chain {}...", hd_path, chain_id);
        let ledger = Ledger::new(HDPath::Other(hd_path.clone()), chain_id)
            .await
            .map_err(map_ledger_error)?;
        info!("Ledger connected: {:?} ({})", ledger.address(), hd_path);

        Ok(Session::from_signer(provider, ledger, chain_id))
    }
}

impl WalletProvider for LedgerWallet {
    fn label(&self) -> &'static str {
        WalletKind::Ledger.label()
    }

    fn request_accounts(&self) -> BoxFuture<'_, Result<Session>> {
        Box::pin(self.open_session())
    }

    fn authorized_session(&self) -> BoxFuture<'_, Result<Option<Session>>> {
        Box::pin(async move {
            // The device has to be unlocked and opened on an explicit connect
            debug!("Ledger backend has no pre-authorized accounts");
            Ok(None)
        })
    }
}

/// Map raw Ledger transport errors to short user-facing messages
pub fn map_ledger_error<E: fmt::Display>(e: E) -> anyhow::Error {
    let err_str = e.to_string();
    error!("Ledger error: {}", err_str);

    let lower = err_str.to_lowercase();
    if lower.contains("device not found") || lower.contains("no device") || lower.contains("hidapi") {
        anyhow!("Ledger device not found. Please ensure it's connected and unlocked.")
    } else if lower.contains("locked") || lower.contains("6983") || lower.contains("6985") {
        anyhow!("Ledger is locked or the Ethereum app is not open.")
    } else if lower.contains("denied") || lower.contains("rejected") {
        anyhow!("Request was rejected on the Ledger device.")
    } else if lower.contains("timeout") {
        anyhow!("Ledger operation timed out. Please try again.")
    } else if lower.contains("busy") {
        anyhow!("Ledger device is busy. Please wait and try again.")
    } else {
        anyhow!("Ledger error: {}", err_str)
    }
}
