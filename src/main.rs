use std::io;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    // Bind before anything else: port exhaustion is the only expected
    // fatal condition
    let (listener, port) = match server::bind_first_available(&cfg.server) {
        Ok(bound) => bound,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            logger::log_error(&e.to_string());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let state = Arc::new(config::AppState::new(&cfg));
    let shutdown = server::ShutdownSignal::new();
    server::signal::install(&shutdown);

    logger::log_server_start(port, &cfg);

    server::run(listener, state, shutdown).await?;

    Ok(())
}
