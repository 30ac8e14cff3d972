use std::sync::Arc;

use image_gallery::cli::Args;
use image_gallery::config::{AppState, Config};
use image_gallery::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse_normalized();
    let cfg = Config::load_from(&args.config, args.port.as_deref())?;
    logger::init(&cfg)?;

    // Worker thread count follows `server.workers`, defaulting to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&cfg));

    // Uploads report the failure themselves if the directory stays missing
    if let Err(e) = state.store.ensure_dir().await {
        logger::log_warning(&format!(
            "Could not create image directory '{}': {e}",
            state.store.dir().display()
        ));
    }

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&listener.local_addr()?, &cfg);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, Arc::clone(&signals.shutdown)).await?;
    Ok(())
}
