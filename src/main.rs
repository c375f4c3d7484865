use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fuda::repo::json::JsonFileTaskRepo;
use fuda::repo::memory::InMemoryTaskRepo;
use fuda::web;
use fuda::{AppState, BoxedRepo};

#[derive(Parser, Debug)]
#[command(author, version, about = "fuda — minimal task list served over local HTTP", long_about = None)]
struct Args {
    /// Port to listen on (always bound to 127.0.0.1)
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Keep tasks in memory only; they are lost when the process exits
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Path to the task file (default: OS data dir)
    #[arg(long)]
    data_file: Option<std::path::PathBuf>,

    /// Start with demo tasks in an in-memory store
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Open the task list in the default browser after startup
    #[arg(long, default_value_t = false)]
    open: bool,

    /// Log filter (e.g. info, debug, fuda=debug)
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let repo: BoxedRepo = if args.demo {
        info!("demo store: seeded tasks, session-only");
        Box::new(InMemoryTaskRepo::with_seed(seed_tasks()))
    } else if args.memory {
        info!("in-memory store: tasks are lost when the process exits");
        Box::new(InMemoryTaskRepo::default())
    } else if let Some(path) = args.data_file.as_ref() {
        let repo = JsonFileTaskRepo::open(path)?;
        info!("persisting tasks to {}", repo.path().display());
        Box::new(repo)
    } else {
        let repo = JsonFileTaskRepo::open_default()?;
        info!("persisting tasks to {}", repo.path().display());
        Box::new(repo)
    };
    info!("loaded {} tasks", repo.all().len());

    let addr: SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    web::serve(AppState::new(repo), addr, args.open).await
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn seed_tasks() -> [&'static str; 3] {
    [
        "Finish the sprint report",
        "Book a dentist appointment",
        "Water the plants",
    ]
}
