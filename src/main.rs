use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads CHAT_SHIELD_* variables.
    dotenvy::dotenv().ok();
    let cli = chat_shield_lib::cli::Cli::parse();
    chat_shield_lib::run(cli).await
}
