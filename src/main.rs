use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use snipbin::config::{AppState, Config};
use snipbin::handler::build_router;
use snipbin::logger;
use snipbin::server::{self, Shutdown};
use snipbin::snippet::IdAlphabet;
use snipbin::store::FileStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config path as the first argument
    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    logger::init(&cfg)?;

    // Build the Tokio runtime, honouring the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let store = FileStore::open(&cfg.storage.dir)?;
    if cfg.storage.alphabet == IdAlphabet::Letters && !store.is_case_sensitive()? {
        logger::log_warning(&format!(
            "storage.alphabet = \"letters\" but {} is case-insensitive; ids differing only in case will share a file",
            cfg.storage.dir.display()
        ));
    }
    let state = Arc::new(AppState::new(&cfg, build_router(), Arc::new(store)));

    let listener = server::create_reusable_listener(addr)?;
    let shutdown = Arc::new(Shutdown::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&addr, &cfg, &state.generator);

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server_loop(
            listener,
            state,
            Arc::new(AtomicUsize::new(0)),
            shutdown,
        ))
        .await;

    logger::log_info("Server stopped");
    Ok(())
}
