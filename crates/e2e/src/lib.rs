//! Helpers for running the deployment pipeline against a local test node
//! (anvil or hardhat) listening on [`local_node::NODE_HOST`]. The tests
//! themselves live in `tests/e2e` and are `#[ignore]`d by default.

pub mod local_node;
pub mod setup;
