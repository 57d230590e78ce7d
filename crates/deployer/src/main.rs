use {clap::Parser, deployer::arguments::Arguments, tokio_util::sync::CancellationToken};

#[tokio::main]
async fn main() {
    let args = Arguments::parse();
    observe::tracing::initialize(&deployer::config::observe(&args));
    tracing::info!("running deployer with validated arguments:\n{}", args);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, stopping");
                cancel.cancel();
            }
        }
    });

    match deployer::run(args, cancel).await {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(deployer::exit_code(&err));
        }
    }
}
