//! Session runtime for `sysmon`.
//!
//! Owns the single cooperative scheduler and wires the core together:
//! - sampling tick: sampler → history → export sink
//! - render tick: history → window → text frame
//! - shutdown: Ctrl-C / SIGTERM, closing the export sink on the way out

pub mod session;

pub use session::{Session, SessionSettings};

use tracing::warn;

/// Resolve when the process is asked to stop (Ctrl-C, or SIGTERM on Unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
