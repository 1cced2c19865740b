//! ERC20 contract binding behind the `TokenClient` seam.
//!
//! The dispatcher only sees `TokenClient`, so the signer backend (local key or
//! Ledger) and test doubles plug in the same way.

use anyhow::{anyhow, Result};
use ethers::contract::abigen;
use ethers::prelude::*;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

abigen!(
    Erc20Token,
    r#"[
        function decimals() view returns (uint8)
        function transfer(address to, uint256 amount) returns (bool)
    ]"#
);

/// Boxed, sendable future returned by the wallet and token seams
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Token operations needed to run a transfer attempt
pub trait TokenClient: Send + Sync {
    /// Read `decimals()` from the token contract
    fn decimals(&self, token: Address) -> BoxFuture<'_, Result<u8>>;

    /// Submit `transfer(to, amount)` and return the transaction hash once accepted
    fn submit_transfer(&self, token: Address, to: Address, amount: U256) -> BoxFuture<'_, Result<TxHash>>;

    /// Wait until the transaction is mined; errors if it reverted or was dropped
    fn wait_for_confirmation(&self, tx_hash: TxHash) -> BoxFuture<'_, Result<()>>;
}

/// `TokenClient` backed by an ethers middleware stack with a signer
pub struct EthersTokenClient<M> {
    client: Arc<M>,
}

impl<M: Middleware + 'static> EthersTokenClient<M> {
    pub fn new(client: M) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl<M: Middleware + 'static> TokenClient for EthersTokenClient<M> {
    fn decimals(&self, token: Address) -> BoxFuture<'_, Result<u8>> {
        Box::pin(async move {
            let contract = Erc20Token::new(token, self.client.clone());
            let decimals = contract
                .decimals()
                .call()
                .await
                .map_err(|e| anyhow!("decimals() call failed: {}", e))?;
            debug!("Token {:?} reports {} decimals", token, decimals);
            Ok(decimals)
        })
    }

    fn submit_transfer(&self, token: Address, to: Address, amount: U256) -> BoxFuture<'_, Result<TxHash>> {
        Box::pin(async move {
            let contract = Erc20Token::new(token, self.client.clone());
            let call = contract.transfer(to, amount);
            let pending = call.send().await.map_err(|e| anyhow!("{}", e))?;
            let tx_hash = pending.tx_hash();
            info!("Transfer of {} to {:?} submitted: {:?}", amount, to, tx_hash);
            Ok(tx_hash)
        })
    }

    fn wait_for_confirmation(&self, tx_hash: TxHash) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let receipt = PendingTransaction::new(tx_hash, self.client.provider())
                .await
                .map_err(|e| anyhow!("Failed while waiting for confirmation: {}", e))?;
            check_receipt(tx_hash, receipt)
        })
    }
}

/// Interpret the receipt returned once a pending transaction resolves
pub fn check_receipt(tx_hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<()> {
    match receipt {
        Some(rcpt) if rcpt.status == Some(U64::from(1u64)) => {
            info!(
                "Transaction {:?} confirmed in block {}",
                tx_hash,
                rcpt.block_number.unwrap_or_default()
            );
            Ok(())
        }
        Some(rcpt) => Err(anyhow!(
            "Transaction reverted in block {}",
            rcpt.block_number.unwrap_or_default()
        )),
        None => Err(anyhow!("Transaction was dropped before confirmation")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: Option<u64>, block: u64) -> TransactionReceipt {
        TransactionReceipt {
            status: status.map(U64::from),
            block_number: Some(U64::from(block)),
            ..Default::default()
        }
    }

    #[test]
    fn test_check_receipt_success() {
        assert!(check_receipt(TxHash::zero(), Some(receipt(Some(1), 10))).is_ok());
    }

    #[test]
    fn test_check_receipt_reverted() {
        let err = check_receipt(TxHash::zero(), Some(receipt(Some(0), 12))).unwrap_err();
        assert!(err.to_string().contains("reverted in block 12"));
    }

    #[test]
    fn test_check_receipt_missing_status_is_failure() {
        assert!(check_receipt(TxHash::zero(), Some(receipt(None, 1))).is_err());
    }

    #[test]
    fn test_check_receipt_dropped() {
        let err = check_receipt(TxHash::zero(), None).unwrap_err();
        assert!(err.to_string().contains("dropped"));
    }

    #[test]
    fn test_transfer_selector() {
        // transfer(address,uint256) = 0xa9059cbb
        let call = TransferCall {
            to: Address::zero(),
            amount: U256::one(),
        };
        let encoded = ethers::abi::AbiEncode::encode(call);
        assert_eq!(&encoded[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(encoded.len(), 4 + 32 * 2);
    }
}
