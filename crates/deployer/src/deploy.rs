use {
    crate::{
        Error,
        abi,
        compile::CompiledArtifact,
        confirmation::{self, Confirmation},
        node::{Node, NodeError},
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, B256},
        rpc::types::TransactionRequest,
    },
    std::sync::Arc,
    tokio_util::sync::CancellationToken,
    tracing::instrument,
};

/// Intrinsic gas of a contract creation transaction. Anything below can never
/// be mined.
pub const MIN_CREATION_GAS: u64 = 53_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    pub from: Address,
    pub gas: u64,
}

/// Proof of a mined, successful contract creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub contract_address: Address,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

pub struct Deployer {
    node: Arc<dyn Node>,
    confirmation: Confirmation,
}

impl Deployer {
    pub fn new(node: Arc<dyn Node>, confirmation: Confirmation) -> Self {
        Self { node, confirmation }
    }

    /// Deploys `artifact`, passing `args` to its constructor, and waits until
    /// the creation transaction is mined.
    #[instrument(skip_all, fields(contract = %artifact.name))]
    pub async fn deploy(
        &self,
        artifact: &CompiledArtifact,
        args: &[String],
        options: &DeployOptions,
        cancel: &CancellationToken,
    ) -> Result<DeploymentReceipt, Error> {
        if artifact.bytecode.is_empty() {
            return Err(Error::Deployment(format!(
                "{} has no bytecode, it is abstract or an interface",
                artifact.name
            )));
        }
        let args = abi::constructor_arguments(&artifact.abi, args)?;
        let encoded_args = abi::encode_constructor(&artifact.abi, &args)?;
        if options.gas < MIN_CREATION_GAS {
            return Err(Error::Deployment(format!(
                "gas limit {} is below the {MIN_CREATION_GAS} a contract creation costs",
                options.gas
            )));
        }

        let code = [artifact.bytecode.as_ref(), encoded_args.as_slice()].concat();
        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_deploy_code(code)
            .with_gas_limit(options.gas);
        let hash = confirmation::submit(cancel, async {
            self.node
                .send_transaction(tx)
                .await
                .map_err(|err| match err {
                    NodeError::Rejected { message, .. } => Error::Deployment(message),
                    err => err.into(),
                })
        })
        .await?;
        tracing::info!(?hash, from = ?options.from, gas = options.gas, "submitted contract creation");

        let mined =
            confirmation::wait_for_inclusion(self.node.as_ref(), hash, &self.confirmation, cancel)
                .await?;
        if !mined.status {
            return Err(Error::Deployment(format!(
                "creation transaction {hash} reverted"
            )));
        }
        let contract_address = mined.contract_address.ok_or_else(|| {
            Error::Deployment(format!("receipt of {hash} has no contract address"))
        })?;
        tracing::info!(%contract_address, block = ?mined.block_number, gas_used = mined.gas_used, "contract deployed");

        Ok(DeploymentReceipt {
            contract_address,
            transaction_hash: hash,
            block_number: mined.block_number,
            gas_used: mined.gas_used,
        })
    }
}
