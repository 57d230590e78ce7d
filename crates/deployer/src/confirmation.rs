use {
    crate::{
        Error,
        node::{MinedTransaction, Node},
    },
    alloy::primitives::B256,
    std::{future::Future, time::Duration},
    tokio_util::sync::CancellationToken,
};

/// How long and how often to look for a submitted transaction's receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Confirmation {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Polls for the receipt of `hash` until the transaction is mined, the
/// timeout elapses or `cancel` fires. The transaction may still get mined
/// after this returns an error.
pub async fn wait_for_inclusion(
    node: &dyn Node,
    hash: B256,
    confirmation: &Confirmation,
    cancel: &CancellationToken,
) -> Result<MinedTransaction, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled { tx_hash: Some(hash) }),
        result = tokio::time::timeout(
            confirmation.timeout,
            poll_receipt(node, hash, confirmation.poll_interval),
        ) => match result {
            Ok(result) => result,
            Err(_) => Err(Error::DeploymentTimeout {
                tx_hash: hash,
                waited: confirmation.timeout,
            }),
        },
    }
}

/// Runs `submission` unless `cancel` fires first. Covers everything the node
/// does before it hands out a transaction hash, like nonce and fee lookups.
pub async fn submit<T>(
    cancel: &CancellationToken,
    submission: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled { tx_hash: None }),
        result = submission => result,
    }
}

async fn poll_receipt(
    node: &dyn Node,
    hash: B256,
    interval: Duration,
) -> Result<MinedTransaction, Error> {
    let mut attempts = 0_u32;
    loop {
        attempts += 1;
        if let Some(mined) = node.transaction_receipt(hash).await? {
            tracing::debug!(?hash, attempts, block = ?mined.block_number, "transaction mined");
            return Ok(mined);
        }
        tracing::trace!(?hash, attempts, "transaction pending");
        tokio::time::sleep(interval).await;
    }
}
