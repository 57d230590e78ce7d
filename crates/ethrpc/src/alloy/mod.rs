pub mod errors;
mod instrumentation;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock;
use {
    crate::{AlloyProvider, Config},
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{Provider, ProviderBuilder},
        rpc::client::{ClientBuilder, RpcClient},
        transports::{
            http::{Http, reqwest},
            utils::guess_local_url,
        },
    },
    anyhow::Context,
    instrumentation::{InstrumentationLayer, LabelingLayer},
    url::Url,
};

fn rpc_client(url: &Url, config: &Config) -> anyhow::Result<RpcClient> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("failed to build http client")?;
    let transport = Http::with_client(http, url.clone());
    Ok(ClientBuilder::default()
        .layer(LabelingLayer {
            label: config.label.clone(),
        })
        .layer(InstrumentationLayer)
        .transport(transport, guess_local_url(url.as_str())))
}

/// Creates a provider that relies on the node to sign transactions with one
/// of the accounts it manages.
pub fn provider(url: &Url, config: &Config) -> anyhow::Result<AlloyProvider> {
    let rpc = rpc_client(url, config)?;
    Ok(ProviderBuilder::new().connect_client(rpc).erased())
}

/// Creates a provider that signs transactions locally with `signer`.
pub fn provider_with_signer<S>(
    url: &Url,
    config: &Config,
    signer: S,
) -> anyhow::Result<AlloyProvider>
where
    S: TxSigner<Signature> + Send + Sync + 'static,
{
    let rpc = rpc_client(url, config)?;
    let wallet = EthereumWallet::new(signer);

    Ok(ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased())
}

/// Provider answering requests with the responses queued on `asserter`.
#[cfg(any(test, feature = "test-util"))]
pub fn mock_provider(asserter: mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}
