//! Deployment records that let later runs find deployed instances.
//!
//! Every contract gets a `<dir>/<Contract>.json` file holding its ABI and the
//! address it was deployed at on each chain:
//!
//! ```json
//! {
//!   "contractName": "Hotel",
//!   "abi": [...],
//!   "networks": {
//!     "1337": { "address": "0x...", "transactionHash": "0x...", "blockNumber": 1 }
//!   }
//! }
//! ```

use {
    crate::{Error, deploy::DeploymentReceipt},
    alloy::{
        json_abi::JsonAbi,
        primitives::{Address, B256},
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        io,
        path::PathBuf,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub abi: JsonAbi,
    /// Keyed by chain id.
    #[serde(default)]
    pub networks: BTreeMap<u64, NetworkDeployment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub address: Address,
    pub transaction_hash: B256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl From<&DeploymentReceipt> for NetworkDeployment {
    fn from(receipt: &DeploymentReceipt) -> Self {
        Self {
            address: receipt.contract_address,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, contract: &str) -> PathBuf {
        self.dir.join(format!("{contract}.json"))
    }

    /// Returns `None` if `contract` was never deployed.
    pub async fn load(&self, contract: &str) -> Result<Option<DeploymentRecord>, Error> {
        let path = self.path(contract);
        let json = match tokio::fs::read(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::Artifact(format!("failed to read {path:?}: {err}"))),
        };
        serde_json::from_slice(&json)
            .map(Some)
            .map_err(|err| Error::Artifact(format!("{path:?} is not a deployment record: {err}")))
    }

    /// Records a deployment on `chain_id`, keeping deployments on other
    /// chains. Returns the path of the record.
    pub async fn save(
        &self,
        contract: &str,
        abi: &JsonAbi,
        chain_id: u64,
        deployment: NetworkDeployment,
    ) -> Result<PathBuf, Error> {
        let mut record = self
            .load(contract)
            .await?
            .unwrap_or_else(|| DeploymentRecord {
                contract_name: contract.to_string(),
                abi: abi.clone(),
                networks: Default::default(),
            });
        record.abi = abi.clone();
        record.networks.insert(chain_id, deployment);

        let write_error = |err: io::Error| Error::Artifact(format!("failed to write record: {err}"));
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|err| Error::Artifact(format!("failed to serialize record: {err}")))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_error)?;
        let path = self.path(contract);
        tokio::fs::write(&path, json).await.map_err(write_error)?;
        tracing::debug!(?path, chain_id, address = %deployment.address, "stored deployment record");
        Ok(path)
    }

    /// Address and ABI of the instance of `contract` deployed on `chain_id`.
    pub async fn deployed(&self, contract: &str, chain_id: u64) -> Result<(Address, JsonAbi), Error> {
        let record = self.load(contract).await?.ok_or_else(|| {
            Error::Artifact(format!(
                "no deployment record for {contract} in {:?}",
                self.dir
            ))
        })?;
        let deployment = record.networks.get(&chain_id).ok_or_else(|| {
            Error::Artifact(format!("{contract} is not deployed on chain {chain_id}"))
        })?;
        Ok((deployment.address, record.abi))
    }
}
