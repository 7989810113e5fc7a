use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env first so RUST_LOG from the file is honoured.
    dotenv().ok();
    init_logging_default();
    info!(service = "accounts_api", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "accounts_api",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    info!(
        service = "accounts_api",
        event = "start",
        %service_id,
        pid,
        version,
        "accounts api starting"
    );

    let cfg = configs::AppConfig::load_and_validate()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.server.worker_threads.unwrap_or(4))
        .enable_all()
        .build()?;

    rt.block_on(async {
        tokio::select! {
            res = server::run(cfg) => res,
            _ = tokio::signal::ctrl_c() => {
                info!(
                    service = "accounts_api",
                    event = "stop",
                    %service_id,
                    pid,
                    "shutdown signal received"
                );
                Ok(())
            }
        }
    })
}
