use {
    alloy::{primitives::U256, providers::ext::AnvilApi},
    ethrpc::AlloyProvider,
};

pub const NODE_HOST: &str = "http://127.0.0.1:8545";

/// Restores the chain to the state it had when the resetter was created.
pub struct Resetter {
    provider: AlloyProvider,
    snapshot_id: U256,
}

impl Resetter {
    pub async fn new(provider: &AlloyProvider) -> Self {
        let snapshot_id = provider
            .anvil_snapshot()
            .await
            .expect("Test network must support evm_snapshot");
        Self {
            provider: provider.clone(),
            snapshot_id,
        }
    }

    pub async fn reset(&self) {
        let reverted = self
            .provider
            .anvil_revert(self.snapshot_id)
            .await
            .expect("Test network must support evm_revert");
        assert!(reverted, "unknown snapshot {}", self.snapshot_id);
    }
}
