//! CLI for PopSub Telemetry
//!
//! Subcommands:
//! - `broadcast`: publish a counter record at a fixed rate
//! - `subscribe`: poll a broadcaster and print what arrives

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use popsub_telemetry::utils::logging;
use popsub_telemetry::{Broadcaster, Outcome, Settings, Subscriber, Topic, load_config};
use serde_json::json;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "popsub", about = "Broadcast or observe topic-tagged telemetry")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish a record every interval
    Broadcast {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        topic: Option<Topic>,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Stop after this many records (0 runs until killed)
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
    /// Poll a broadcaster every interval
    Subscribe {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        topic: Option<Topic>,
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
        /// Stop after this many polls (0 runs until killed)
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_config(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    logging::init(&settings.logging.level);

    let result = match cli.command {
        Command::Broadcast {
            port,
            topic,
            interval_ms,
            count,
        } => run_broadcast(settings, port, topic, Duration::from_millis(interval_ms), count),
        Command::Subscribe {
            address,
            port,
            topic,
            interval_ms,
            count,
        } => run_subscribe(
            settings,
            address,
            port,
            topic,
            Duration::from_millis(interval_ms),
            count,
        ),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run_broadcast(
    settings: Settings,
    port: Option<u16>,
    topic: Option<Topic>,
    interval: Duration,
    count: u64,
) -> popsub_telemetry::Result<()> {
    let port = port.unwrap_or(settings.broadcaster.port);
    let topic = topic.unwrap_or(settings.broadcaster.topic);
    let mut broadcaster = Broadcaster::open(port, topic)?;
    let started = Instant::now();

    let mut seq = 0u64;
    while count == 0 || seq < count {
        broadcaster.send_value(&json!({
            "seq": seq,
            "uptime_secs": started.elapsed().as_secs_f64(),
        }))?;
        if let Some(last) = broadcaster.last_sent() {
            info!("{last}");
        }
        seq += 1;
        thread::sleep(interval);
    }

    broadcaster.close();
    Ok(())
}

fn run_subscribe(
    settings: Settings,
    address: Option<String>,
    port: Option<u16>,
    topic: Option<Topic>,
    interval: Duration,
    count: u64,
) -> popsub_telemetry::Result<()> {
    let mut connection = settings.subscriber;
    if let Some(address) = address {
        connection.address = address;
    }
    if let Some(port) = port {
        connection.port = port;
    }
    if let Some(topic) = topic {
        connection.topic = topic;
    }

    info!("Subscribing to {:?} on {}", connection.topic.as_str(), connection.endpoint());
    let mut subscriber = Subscriber::with_settings(connection)?;

    let mut polls = 0u64;
    while count == 0 || polls < count {
        match subscriber.try_receive() {
            Ok(Outcome::Received(msg)) => println!("{msg}"),
            Ok(_) => {}
            Err(e) => error!("Receive failed: {e}"),
        }
        polls += 1;
        thread::sleep(interval);
    }

    subscriber.close();
    Ok(())
}
