use clap::builder::TypedValueParser;
use clap::Parser;
use linedis::codec::DEFAULT_MAX_LINE_LENGTH;
use linedis::config::{Config, DEFAULT_HOST, DEFAULT_QUEUE_CAPACITY};
use linedis::{server, Error};
use tracing::{debug, Level};

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    port: u16,

    /// The address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// How many requests may wait for the store before clients are held back
    #[arg(
        long,
        default_value_t = DEFAULT_QUEUE_CAPACITY,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    queue_capacity: usize,

    /// The longest request line accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Maximum log level
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let config = Config {
        host: args.host,
        port: args.port,
        queue_capacity: args.queue_capacity,
        max_line_length: args.max_line_length,
    };

    server::run(config).await
}
