//! The operations the deployment pipeline needs from an Ethereum node.
//!
//! Everything talks to the node through the [`Node`] trait so the pipeline can
//! be tested against mocks. [`AlloyNode`] is the implementation backed by a
//! real JSON-RPC provider.

use {
    alloy::{
        network::ReceiptResponse,
        primitives::{Address, B256, Bytes},
        providers::Provider,
        rpc::types::TransactionRequest,
        transports::TransportError,
    },
    ethrpc::{AlloyProvider, alloy::errors::TransportErrorExt},
};

/// A transaction that was included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedTransaction {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Whether execution succeeded.
    pub status: bool,
    /// Set for contract creation transactions.
    pub contract_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("node rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("unexpected response from node: {0}")]
    Malformed(String),
}

impl From<TransportError> for NodeError {
    fn from(err: TransportError) -> Self {
        if err.is_transport_failure() {
            return Self::Unreachable(err.to_string());
        }
        match err.node_error() {
            Some(payload) => Self::Rejected {
                code: payload.code,
                message: payload.message.to_string(),
            },
            None => Self::Malformed(err.to_string()),
        }
    }
}

/// Abstracts the node's JSON-RPC surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Node: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, NodeError>;

    /// Accounts the node can sign for (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<Address>, NodeError>;

    /// Compiles solidity source code on the node (`eth_compileSolidity`).
    /// The raw response is returned since its shape differs between nodes.
    async fn compile_solidity(&self, source: &str) -> Result<serde_json::Value, NodeError>;

    /// Submits a transaction and returns its hash without waiting for it to
    /// be mined.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, NodeError>;

    /// Returns `None` while the transaction is still pending.
    async fn transaction_receipt(&self, hash: B256)
    -> Result<Option<MinedTransaction>, NodeError>;

    /// Executes a call against the latest block without creating a
    /// transaction (`eth_call`).
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, NodeError>;
}

#[derive(Debug, Clone)]
pub struct AlloyNode(pub AlloyProvider);

#[async_trait::async_trait]
impl Node for AlloyNode {
    async fn chain_id(&self) -> Result<u64, NodeError> {
        Ok(self.0.get_chain_id().await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>, NodeError> {
        Ok(self.0.get_accounts().await?)
    }

    async fn compile_solidity(&self, source: &str) -> Result<serde_json::Value, NodeError> {
        Ok(self
            .0
            .raw_request("eth_compileSolidity".into(), (source.to_owned(),))
            .await?)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, NodeError> {
        let pending = self.0.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<MinedTransaction>, NodeError> {
        let receipt = self.0.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|receipt| MinedTransaction {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: ReceiptResponse::status(&receipt),
            contract_address: receipt.contract_address,
        }))
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, NodeError> {
        Ok(self.0.call(tx).await?)
    }
}
