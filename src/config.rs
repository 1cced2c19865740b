use anyhow::{anyhow, Context, Result};
use ethers::providers::{Http, Provider};
use std::env;
use url::Url;

use crate::form::RECIPIENT_COUNT;

/// Default RPC endpoint (Ethereum mainnet, matching the fixed Etherscan explorer links)
pub const DEFAULT_RPC_URL: &str = "https://ethereum-rpc.publicnode.com";

/// Default delay between repeated dispatches while the hold button is down
pub const DEFAULT_HOLD_INTERVAL_MS: u64 = 2000;

/// Default BIP-44 coin type for Ethereum
pub const DEFAULT_COIN_TYPE: u32 = 60;

/// Which wallet backend signs transfers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WalletKind {
    /// Local private key from `PRIVATE_KEY`
    #[default]
    PrivateKey,
    /// Ledger hardware wallet via native ethers-rs support
    Ledger,
}

impl WalletKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "key" | "private_key" | "privatekey" => Ok(WalletKind::PrivateKey),
            "ledger" => Ok(WalletKind::Ledger),
            other => Err(anyhow!("Unknown WALLET '{}': expected 'key' or 'ledger'", other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WalletKind::PrivateKey => "Private key",
            WalletKind::Ledger => "Ledger",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    /// Chain ID override; when unset it is queried from the RPC at connect time
    pub chain_id: Option<u64>,
    pub wallet_kind: WalletKind,
    pub private_key: Option<String>,
    pub ledger_account_index: u32,
    pub hold_interval_ms: u64,
    // Form prefill
    pub recipients: [String; RECIPIENT_COUNT],
    pub token_address: String,
    pub amount: String,
}

impl Config {
    pub fn new(rpc_url: String) -> Self {
        Self {
            rpc_url,
            chain_id: None,
            wallet_kind: WalletKind::default(),
            private_key: None,
            ledger_account_index: 0,
            hold_interval_ms: DEFAULT_HOLD_INTERVAL_MS,
            recipients: Default::default(),
            token_address: String::new(),
            amount: String::new(),
        }
    }

    /// Build the config from process environment (call `dotenvy::dotenv()` first to pick up `.env`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Url::parse(&rpc_url).with_context(|| format!("Invalid RPC_URL '{}'", rpc_url))?;

        let mut config = Self::new(rpc_url);

        if let Some(chain_id) = get("CHAIN_ID") {
            config.chain_id = Some(
                chain_id
                    .parse()
                    .with_context(|| format!("Invalid CHAIN_ID '{}'", chain_id))?,
            );
        }
        if let Some(kind) = get("WALLET") {
            config.wallet_kind = WalletKind::parse(&kind)?;
        }
        config.private_key = get("PRIVATE_KEY");
        if let Some(index) = get("LEDGER_ACCOUNT_INDEX") {
            config.ledger_account_index = index
                .parse()
                .with_context(|| format!("Invalid LEDGER_ACCOUNT_INDEX '{}'", index))?;
        }
        if let Some(interval) = get("HOLD_INTERVAL_MS") {
            let ms: u64 = interval
                .parse()
                .with_context(|| format!("Invalid HOLD_INTERVAL_MS '{}'", interval))?;
            if ms == 0 {
                return Err(anyhow!("HOLD_INTERVAL_MS must be greater than zero"));
            }
            config.hold_interval_ms = ms;
        }
        if let Some(list) = get("RECIPIENTS") {
            config.recipients = parse_recipient_list(&list);
        }
        config.token_address = get("TOKEN_ADDRESS").unwrap_or_default();
        config.amount = get("TRANSFER_AMOUNT").unwrap_or_default();

        Ok(config)
    }

    /// Ledger derivation path: m/44'/60'/i'/0/0 (Ledger Live style account index)
    pub fn ledger_derivation_path(&self) -> String {
        format!("m/44'/{}'/{}'/0/0", DEFAULT_COIN_TYPE, self.ledger_account_index)
    }

    pub fn get_provider(&self) -> Result<Provider<Http>> {
        let url = Url::parse(&self.rpc_url)?;
        let provider = Provider::<Http>::try_from(url.as_str())?;
        Ok(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_URL.to_string())
    }
}

/// Split a comma/whitespace separated list into the fixed recipient slots.
/// Extra entries are ignored, missing ones stay empty.
pub fn parse_recipient_list(list: &str) -> [String; RECIPIENT_COUNT] {
    let mut slots: [String; RECIPIENT_COUNT] = Default::default();
    let entries = list
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    for (slot, entry) in slots.iter_mut().zip(entries) {
        *slot = entry.to_string();
    }
    slots
}
