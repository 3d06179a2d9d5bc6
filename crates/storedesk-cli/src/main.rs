//! Binary entrypoint for the Storedesk admin CLI.

#[tokio::main]
async fn main() {
    let code = storedesk_cli::run().await;
    std::process::exit(code);
}
