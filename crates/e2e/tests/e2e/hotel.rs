use {
    alloy::{dyn_abi::DynSolValue, primitives::U256, providers::Provider},
    deployer::{
        ArgumentError,
        Error,
        abi,
        contract,
        source::ContractSource,
        verify::{self, Expectation},
    },
    e2e::setup::{GAS_LIMIT, Onchain, hotel_args, run_test},
    tokio_util::sync::CancellationToken,
};

#[tokio::test]
#[ignore]
async fn local_node_deploy_and_verify_name() {
    run_test(deploy_and_verify_name).await;
}

async fn deploy_and_verify_name(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;
    assert_eq!(artifact.name, "Hotel");

    let receipt = onchain
        .deploy(&artifact, &hotel_args(), GAS_LIMIT)
        .await
        .unwrap();
    let code = onchain
        .provider
        .get_code_at(receipt.contract_address)
        .await
        .unwrap();
    assert!(!code.is_empty());

    let hotel = contract::bind(receipt.contract_address, artifact.abi, onchain.node.clone());
    for (method, expected) in [
        ("name", "Ethereum Hotel"),
        ("description", "Book rooms with ease"),
        ("latitude", "12.9716"),
        ("longitude", "77.5946"),
        ("utcOffset", "19800"),
    ] {
        verify::verify(&hotel, &Expectation::new(method, expected))
            .await
            .unwrap();
    }
    let owner = hotel.call("owner", &[]).await.unwrap();
    assert_eq!(owner, vec![DynSolValue::Address(onchain.owner())]);
}

#[tokio::test]
#[ignore]
async fn local_node_verify_detects_mismatch() {
    run_test(verify_detects_mismatch).await;
}

async fn verify_detects_mismatch(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;
    let receipt = onchain
        .deploy(&artifact, &hotel_args(), GAS_LIMIT)
        .await
        .unwrap();
    let hotel = contract::bind(receipt.contract_address, artifact.abi, onchain.node.clone());

    // `name()` returns the name, not the description.
    let err = verify::verify(&hotel, &Expectation::new("name", "Book rooms with ease"))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, Error::Assertion { actual, .. } if actual == "Ethereum Hotel"),
        "{err:?}"
    );
}

#[tokio::test]
#[ignore]
async fn local_node_malformed_source_fails_to_compile() {
    run_test(malformed_source_fails_to_compile).await;
}

async fn malformed_source_fails_to_compile(onchain: Onchain) {
    let before = onchain.provider.get_block_number().await.unwrap();
    let source = ContractSource {
        path: "Hotel.sol".into(),
        text: "pragma solidity ^0.8.0; contract Hotel { string public name = \"x\" }"
            .to_string(),
    };

    let err = onchain.compile(&source).await.unwrap_err();

    assert!(matches!(err, Error::Compilation(_)), "{err:?}");
    assert_eq!(onchain.provider.get_block_number().await.unwrap(), before);
}

#[tokio::test]
#[ignore]
async fn local_node_zero_gas_fails_to_deploy() {
    run_test(zero_gas_fails_to_deploy).await;
}

async fn zero_gas_fails_to_deploy(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;
    let before = onchain.provider.get_block_number().await.unwrap();

    let err = onchain
        .deploy(&artifact, &hotel_args(), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Deployment(_)), "{err:?}");
    assert_eq!(onchain.provider.get_block_number().await.unwrap(), before);
}

#[tokio::test]
#[ignore]
async fn local_node_insufficient_gas_fails_to_deploy() {
    run_test(insufficient_gas_fails_to_deploy).await;
}

async fn insufficient_gas_fails_to_deploy(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;

    // Covers the intrinsic cost but not storing the contract.
    let err = onchain
        .deploy(&artifact, &hotel_args(), 100_000)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Deployment(_)), "{err:?}");
}

#[tokio::test]
#[ignore]
async fn local_node_wrong_constructor_arguments() {
    run_test(wrong_constructor_arguments).await;
}

async fn wrong_constructor_arguments(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;

    let mut args = hotel_args();
    args.pop();
    let err = onchain.deploy(&artifact, &args, GAS_LIMIT).await.unwrap_err();
    assert!(
        matches!(err, Error::Argument(ArgumentError::Count { .. })),
        "{err:?}"
    );

    let mut args = hotel_args();
    args[4] = "UTC+5:30".to_string();
    let err = onchain.deploy(&artifact, &args, GAS_LIMIT).await.unwrap_err();
    assert!(
        matches!(err, Error::Argument(ArgumentError::Type { index: 4, .. })),
        "{err:?}"
    );
}

#[tokio::test]
#[ignore]
async fn local_node_unknown_method() {
    run_test(unknown_method).await;
}

async fn unknown_method(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;
    let receipt = onchain
        .deploy(&artifact, &hotel_args(), GAS_LIMIT)
        .await
        .unwrap();
    let hotel = contract::bind(receipt.contract_address, artifact.abi, onchain.node.clone());

    let err = hotel.call("rating", &[]).await.unwrap_err();

    assert!(
        matches!(&err, Error::Argument(ArgumentError::UnknownMethod(method)) if method == "rating"),
        "{err:?}"
    );
}

#[tokio::test]
#[ignore]
async fn local_node_deployments_get_distinct_addresses() {
    run_test(deployments_get_distinct_addresses).await;
}

async fn deployments_get_distinct_addresses(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;

    let first = onchain
        .deploy(&artifact, &hotel_args(), GAS_LIMIT)
        .await
        .unwrap();
    let mut args = hotel_args();
    args[0] = "Blockchain Hotel".to_string();
    let second = onchain.deploy(&artifact, &args, GAS_LIMIT).await.unwrap();

    assert_ne!(first.contract_address, second.contract_address);
    let first = contract::bind(first.contract_address, artifact.abi.clone(), onchain.node.clone());
    let second = contract::bind(second.contract_address, artifact.abi, onchain.node.clone());
    assert_eq!(
        abi::render(&first.call("name", &[]).await.unwrap()),
        "Ethereum Hotel"
    );
    assert_eq!(
        abi::render(&second.call("name", &[]).await.unwrap()),
        "Blockchain Hotel"
    );
}

#[tokio::test]
#[ignore]
async fn local_node_owner_adds_rooms() {
    run_test(owner_adds_rooms).await;
}

async fn owner_adds_rooms(onchain: Onchain) {
    let artifact = onchain.compile_hotel().await;
    let receipt = onchain
        .deploy(&artifact, &hotel_args(), GAS_LIMIT)
        .await
        .unwrap();
    let hotel = contract::bind(receipt.contract_address, artifact.abi, onchain.node.clone());
    let room = [
        DynSolValue::String("AC_SINGLE".into()),
        DynSolValue::String("Single AC Room".into()),
        DynSolValue::Uint(U256::from(2), 256),
        DynSolValue::Uint(U256::from(100), 256),
        DynSolValue::Bool(true),
    ];

    hotel
        .send(
            "addRoom",
            &room,
            &onchain.options(GAS_LIMIT),
            &onchain.confirmation(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        hotel.call("roomCount", &[]).await.unwrap(),
        vec![DynSolValue::Uint(U256::from(1), 256)]
    );
    let stored = hotel
        .call_with_strings("rooms", &["0".to_string()])
        .await
        .unwrap();
    assert_eq!(stored, room);

    // Only the owner manages rooms.
    if let Some(guest) = onchain.accounts.get(1) {
        let err = hotel
            .send(
                "addRoom",
                &room,
                &deployer::deploy::DeployOptions {
                    from: *guest,
                    gas: GAS_LIMIT,
                },
                &onchain.confirmation(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Call { .. }), "{err:?}");
    }
}
