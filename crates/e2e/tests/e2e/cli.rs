//! Runs the command line entry point, the way a migration followed by a
//! separate test run would use it.

use {
    clap::Parser,
    deployer::{Error, arguments::Arguments, artifacts::ArtifactStore},
    e2e::{
        local_node::NODE_HOST,
        setup::{HOTEL_SOURCE, Onchain, hotel_args, run_test},
    },
    std::path::Path,
    tokio_util::sync::CancellationToken,
};

fn arguments(artifacts_dir: &Path, command: &[&str]) -> Arguments {
    let global = [
        "deployer",
        "--node-url",
        NODE_HOST,
        "--poll-interval",
        "100ms",
        "--artifacts-dir",
        artifacts_dir.to_str().unwrap(),
    ];
    Arguments::try_parse_from(global.iter().chain(command)).unwrap()
}

fn deploy_command() -> Vec<String> {
    let mut command = vec!["deploy".to_string(), "--source".into(), HOTEL_SOURCE.into()];
    for arg in hotel_args() {
        command.extend(["--arg".to_string(), arg]);
    }
    command
}

#[tokio::test]
#[ignore]
async fn local_node_deploy_then_verify_recorded_instance() {
    run_test(deploy_then_verify_recorded_instance).await;
}

async fn deploy_then_verify_recorded_instance(onchain: Onchain) {
    let dir = tempfile::tempdir().unwrap();
    let deploy = deploy_command();
    let deploy: Vec<_> = deploy.iter().map(String::as_str).collect();

    let printed = deployer::run(arguments(dir.path(), &deploy), CancellationToken::new())
        .await
        .unwrap();

    let (address, _) = ArtifactStore::new(dir.path())
        .deployed("Hotel", onchain.chain_id)
        .await
        .unwrap();
    assert!(!address.is_zero());
    assert_eq!(printed, address.to_string());

    deployer::run(
        arguments(
            dir.path(),
            &[
                "verify",
                "--contract",
                "Hotel",
                "name",
                "--expected",
                "Ethereum Hotel",
            ],
        ),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let err = deployer::run(
        arguments(
            dir.path(),
            &["verify", "--contract", "Hotel", "name", "--expected", "Hotel"],
        ),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(deployer::exit_code(&err), 7);
}

#[tokio::test]
#[ignore]
async fn local_node_call_recorded_instance() {
    run_test(call_recorded_instance).await;
}

async fn call_recorded_instance(_: Onchain) {
    let dir = tempfile::tempdir().unwrap();
    let deploy = deploy_command();
    let deploy: Vec<_> = deploy.iter().map(String::as_str).collect();
    deployer::run(arguments(dir.path(), &deploy), CancellationToken::new())
        .await
        .unwrap();

    let output = deployer::run(
        arguments(dir.path(), &["call", "--contract", "Hotel", "utcOffset"]),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(output, "19800");

    let output = deployer::run(
        arguments(dir.path(), &["call", "--contract", "Hotel", "roomCount"]),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(output, "0");
}

#[tokio::test]
#[ignore]
async fn local_node_deploy_with_expectation() {
    run_test(deploy_with_expectation).await;
}

async fn deploy_with_expectation(_: Onchain) {
    let dir = tempfile::tempdir().unwrap();
    let mut deploy = deploy_command();
    deploy.extend(
        ["--expect-method", "description", "--expect", "Book rooms with ease"].map(String::from),
    );
    let deploy: Vec<_> = deploy.iter().map(String::as_str).collect();

    deployer::run(arguments(dir.path(), &deploy), CancellationToken::new())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn local_node_verify_without_record() {
    run_test(verify_without_record).await;
}

async fn verify_without_record(_: Onchain) {
    let dir = tempfile::tempdir().unwrap();

    let err = deployer::run(
        arguments(
            dir.path(),
            &["verify", "--contract", "Hotel", "name", "--expected", "Ethereum Hotel"],
        ),
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err.downcast_ref::<Error>(), Some(Error::Artifact(_))),
        "{err:?}"
    );
}
