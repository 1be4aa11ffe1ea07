use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ultralight_apdu_transport_pcsc::PcscDeviceManager;
use ultralight_c::{
    FramerConfig, Session, SharedKey,
    constants::{FACTORY_KEY1, FACTORY_KEY2, reader::DEFAULT_RESPONSE_HEADER_LEN},
    discovery,
};

mod commands;
mod utils;

use commands::*;
use utils::{parse_block_address, parse_block_data, reader};

#[derive(Parser)]
#[command(version, about = "Authenticate to and access MIFARE Ultralight-C cards")]
struct Cli {
    /// Optional reader name to use (any reader is accepted if not specified)
    #[arg(short, long)]
    reader: Option<String>,

    /// First key half (K1) in hex
    #[arg(long, default_value = FACTORY_KEY1)]
    key1: String,

    /// Second key half (K2) in hex
    #[arg(long, default_value = FACTORY_KEY2)]
    key2: String,

    /// Seconds to wait for a card
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Length of the reader preamble in front of each card answer
    #[arg(long, default_value_t = DEFAULT_RESPONSE_HEADER_LEN)]
    header_len: usize,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Authenticate to the card and report the outcome
    Auth,

    /// Read one block
    Read {
        /// Block address, hex (0x20) or decimal
        #[arg(value_parser = parse_block_address)]
        addr: u8,
    },

    /// Write one block and read it back
    Write {
        /// Block address, hex (0x20) or decimal
        #[arg(value_parser = parse_block_address)]
        addr: u8,

        /// Four bytes as 8 hex digits
        #[arg(value_parser = parse_block_data)]
        data: [u8; 4],
    },

    /// Read every readable block
    Dump,

    /// Authenticate, write DEADBEEF to block 0x20, read it back and dump the card
    Demo,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Create a PC/SC device manager
    let manager = PcscDeviceManager::new()?;

    if let Commands::List = cli.command {
        reader::list_readers(&manager)?;
        return Ok(());
    }

    let key = SharedKey::from_hex(&cli.key1, &cli.key2)?;
    if key.is_factory_default() {
        info!("Using factory default key");
    }

    let mut request = discovery::ultralight_c_request(Duration::from_secs(cli.timeout));
    if let Some(name) = &cli.reader {
        request = request.with_reader(name.as_str());
    }
    println!("Present an Ultralight-C card...");
    let transport = discovery::connect(&manager, &request)?;

    let config = FramerConfig::default().with_response_header_len(cli.header_len);
    let mut session = Session::open_new(transport, key, config)?;

    match cli.command {
        Commands::List => unreachable!(), // Already handled above
        Commands::Auth => auth_command(&mut session)?,
        Commands::Read { addr } => read_command(&mut session, addr)?,
        Commands::Write { addr, data } => write_command(&mut session, addr, &data)?,
        Commands::Dump => dump_command(&mut session)?,
        Commands::Demo => demo_command(&mut session)?,
    }

    session.close()?;
    Ok(())
}

fn setup_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_ansi(true)
        .init();
}

/// `RUST_LOG` directives on top of a default level picked by `--verbose`
fn log_filter(verbose: bool) -> EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}
