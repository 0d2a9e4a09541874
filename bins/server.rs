use common::utils::logging::{init_logging, init_logging_default, LogFormat};
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // .env is loaded inside load_config, before RUST_LOG is read below
    let cfg = match server::startup::load_config() {
        Ok(cfg) => {
            init_logging(LogFormat::parse(&cfg.logging.format));
            cfg
        }
        Err(e) => {
            init_logging_default();
            error!(service = "employee_registry", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "employee_registry",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "employee_registry", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "employee_registry",
        event = "start",
        %service_id,
        pid,
        version,
        data_file = %cfg.storage.data_file.display(),
        "employee registry starting"
    );

    // server::run returns once Ctrl+C has drained in-flight requests
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "employee_registry", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "employee_registry", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
