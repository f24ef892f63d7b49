use clap::Parser;
use server::network::{Server, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "0.0.0.0")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "9002")]
    port: u16,
    /// Maximum number of concurrent connections
    #[clap(short, long, default_value = "64")]
    max_connections: usize,
    /// Seconds a queued connection waits before queue-timeout eviction
    #[clap(long, default_value = "60")]
    queue_timeout: u64,
    /// Grace period in seconds for a disconnected participant
    #[clap(long, default_value = "60")]
    forfeit_timeout: u64,
    /// Seconds of transport silence treated as a disconnect
    #[clap(long, default_value = "10")]
    liveness_timeout: u64,
    /// Path of the game snapshot file
    #[clap(long, default_value = "/tmp/chess_arena/games.json")]
    snapshot_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = ServerConfig {
        max_connections: args.max_connections,
        queue_timeout: Duration::from_secs(args.queue_timeout),
        forfeit_timeout: Duration::from_secs(args.forfeit_timeout),
        liveness_timeout: Duration::from_secs(args.liveness_timeout),
        snapshot_path: args.snapshot_path,
    };

    let address = format!("{}:{}", args.host, args.port);
    let mut server = Server::new(&address, config).await?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
            Ok(())
        }
    }
}
