use clap::Parser;

use shortly::cli::{Cli, CliHandler};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("shortly={}", log_level));
    subscriber.init();

    let mut handler = CliHandler::new(None);

    if let Err(e) = handler.execute(cli.command).await {
        if e.is_session_expired() {
            eprintln!("Error: Session expired. Run 'shortly login' to sign in again.");
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
