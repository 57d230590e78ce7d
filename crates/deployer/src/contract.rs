//! Handles to deployed contract instances.

use {
    crate::{
        ArgumentError,
        Error,
        abi,
        confirmation::{self, Confirmation},
        deploy::DeployOptions,
        node::{MinedTransaction, Node, NodeError},
    },
    alloy::{
        dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
        json_abi::{Function, JsonAbi},
        network::TransactionBuilder,
        primitives::Address,
        rpc::types::TransactionRequest,
    },
    std::{fmt, sync::Arc},
    tokio_util::sync::CancellationToken,
};

/// Binds the ABI to a deployed address. Purely local: whether code actually
/// lives at `address` only shows once a method is called.
pub fn bind(address: Address, abi: JsonAbi, node: Arc<dyn Node>) -> ContractHandle {
    ContractHandle {
        address,
        abi: Arc::new(abi),
        node,
    }
}

#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    abi: Arc<JsonAbi>,
    node: Arc<dyn Node>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl ContractHandle {
    pub fn address(&self) -> Address {
        self.address
    }

    /// Calls a method without creating a transaction and returns its decoded
    /// outputs.
    pub async fn call(
        &self,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, Error> {
        let function = abi::resolve_function(&self.abi, method, args.len())?;
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(encode_input(function, args)?);
        let output = self
            .node
            .call(tx)
            .await
            .map_err(|err| call_error(method, err))?;
        let values = function
            .abi_decode_output(&output)
            .map_err(|err| Error::Call {
                method: method.to_string(),
                message: format!("could not decode {} output bytes: {err}", output.len()),
            })?;
        tracing::debug!(%method, address = %self.address, outputs = values.len(), "called contract");
        Ok(values)
    }

    /// Like [`Self::call`] but coerces string arguments to the method's
    /// parameter types first.
    pub async fn call_with_strings(
        &self,
        method: &str,
        args: &[String],
    ) -> Result<Vec<DynSolValue>, Error> {
        let function = abi::resolve_function(&self.abi, method, args.len())?;
        let args = abi::coerce_arguments(method, &function.inputs, args)?;
        self.call(method, &args).await
    }

    /// Sends a state changing transaction to a method and waits until it is
    /// mined. A reverted transaction is a [`Error::Call`].
    pub async fn send(
        &self,
        method: &str,
        args: &[DynSolValue],
        options: &DeployOptions,
        confirmation: &Confirmation,
        cancel: &CancellationToken,
    ) -> Result<MinedTransaction, Error> {
        let function = abi::resolve_function(&self.abi, method, args.len())?;
        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_to(self.address)
            .with_input(encode_input(function, args)?)
            .with_gas_limit(options.gas);
        let hash = confirmation::submit(cancel, async {
            self.node
                .send_transaction(tx)
                .await
                .map_err(|err| call_error(method, err))
        })
        .await?;
        tracing::info!(%method, ?hash, "submitted transaction");

        let mined =
            confirmation::wait_for_inclusion(self.node.as_ref(), hash, confirmation, cancel)
                .await?;
        if !mined.status {
            return Err(Error::Call {
                method: method.to_string(),
                message: format!("transaction {hash} reverted"),
            });
        }
        Ok(mined)
    }
}

fn encode_input(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>, ArgumentError> {
    function
        .abi_encode_input(args)
        .map_err(|err| ArgumentError::Encoding {
            target: function.name.clone(),
            reason: err.to_string(),
        })
}

fn call_error(method: &str, err: NodeError) -> Error {
    match err {
        NodeError::Rejected { message, .. } => Error::Call {
            method: method.to_string(),
            message,
        },
        err => err.into(),
    }
}
