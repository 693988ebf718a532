use clap::Parser;
use readypool::{DefaultPool, PoolConfig, PoolError, SpinHooks};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[clap(name = "threaded")]
#[clap(about = "Producer and consumer threads sharing one ready pool", long_about = None)]
struct Args {
    /// TOML file with the pool configuration.
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(short, long, default_value_t = 10_000)]
    messages: u64,

    #[clap(short, long, default_value_t = 1000)]
    print_interval: u64,
}

fn produce(pool: &DefaultPool<SpinHooks>, messages: u64) -> Result<(), PoolError> {
    let mut sequence = 0u64;
    while sequence < messages {
        let mut lease = match pool.checkout() {
            Ok(lease) => lease,
            Err(PoolError::NoBufferAvailable) => {
                thread::yield_now();
                continue;
            }
            Err(e) => return Err(e),
        };

        let payload = &mut *lease;
        let written = payload.append(&sequence.to_le_bytes());
        let fill = vec![b'a'; payload.remaining()];
        payload.append(&fill);
        debug!(slot = lease.id(), sequence, written, "message staged");

        lease.notify()?;
        sequence += 1;
    }
    Ok(())
}

fn consume(
    pool: &DefaultPool<SpinHooks>,
    messages: u64,
    print_interval: u64,
) -> Result<u64, PoolError> {
    let mut received = 0u64;
    let mut bytes = 0u64;
    let start_time = Instant::now();

    while received < messages {
        let mut lease = match pool.dequeue_ready() {
            Ok(lease) => lease,
            Err(PoolError::NoBufferAvailable) | Err(PoolError::SlotBusy(_)) => {
                thread::sleep(Duration::from_micros(50));
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut header = [0u8; 8];
        if lease.read_exact(&mut header).is_err() {
            warn!(slot = lease.id(), "short message");
        }
        let sequence = u64::from_le_bytes(header);
        if sequence != received {
            warn!(expected = received, got = sequence, "out of order message");
        }
        bytes += 8 + lease.len() as u64;
        lease.return_slot()?;

        received += 1;
        if received % print_interval == 0 {
            info!(
                messages_received = received,
                bytes,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "progress update"
            );
        }
    }
    Ok(bytes)
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    debug!(?args, "configuration");

    let config = match &args.config {
        Some(path) => PoolConfig::load(path)?,
        None => PoolConfig::default(),
    };
    let pool = Arc::new(DefaultPool::<SpinHooks>::from_config(&config, SpinHooks::new())?);
    info!(
        capacity = pool.capacity(),
        payload_size = config.payload_size,
        messages = args.messages,
        "starting"
    );

    let producer = {
        let pool = Arc::clone(&pool);
        let messages = args.messages;
        thread::spawn(move || produce(&pool, messages))
    };
    let print_interval = args.print_interval.max(1);
    let bytes = consume(&pool, args.messages, print_interval)?;

    producer
        .join()
        .map_err(|_| eyre::eyre!("producer thread panicked"))??;

    info!(bytes, free = pool.free_count(), "done");
    Ok(())
}
