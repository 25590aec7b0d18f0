use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = hledger_plaid::args::parse();
    hledger_plaid::cli::main(args).await
}
