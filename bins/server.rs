use std::process::ExitCode;

use configs::ServerConfig;
use tracing::{error, info};
use uuid::Uuid;

// 环境变量优先于配置文件，便于容器内临时调整线程数
fn worker_threads(server: &ServerConfig) -> Option<usize> {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .or(server.worker_threads)
}

fn install_panic_hook(instance: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(event = "panic", %instance, message = %info, "unhandled panic");
    }));
}

fn main() -> ExitCode {
    // .env 必须先于日志初始化加载，RUST_LOG / LOG_FORMAT 才会生效
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    install_panic_hook(instance);

    // 配置只读取一次，线程数与 HTTP 服务共用同一份
    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            let reason = format!("{e:#}");
            error!(event = "config_invalid", error = %reason, "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let threads = worker_threads(&cfg.server);
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = threads {
        builder.worker_threads(n);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %instance,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        threads = threads.unwrap_or_default(),
        "user admin server starting"
    );

    // run 内部监听 Ctrl+C 并优雅停机，返回即表示服务已结束
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(event = "stop", %instance, "server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let reason = format!("{e:#}");
            error!(event = "run_failed", error = %reason, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
