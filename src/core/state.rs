//! Process lifecycle state.
//!
//! - `init()`: one-time process setup, safe to call repeatedly
//! - `SHUTDOWN`: has shutdown been requested? (Ctrl+C received)
//! - `SERVER`: the HTTP server to unblock on shutdown

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Outcome of the one-time setup, cached for later callers
static INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Number of times the setup body actually ran (observable in tests)
static INIT_RUNS: AtomicUsize = AtomicUsize::new(0);

// =============================================================================
// Initialization
// =============================================================================

/// One-time process setup: installs the Ctrl+C handler.
///
/// Every call after the first returns the first call's outcome without
/// touching the handler again. Concurrent first calls block until the
/// winning call finishes.
pub fn init() -> anyhow::Result<()> {
    let outcome = INIT.get_or_init(|| {
        INIT_RUNS.fetch_add(1, Ordering::SeqCst);
        install_shutdown_handler()
    });
    outcome.clone().map_err(anyhow::Error::msg)
}

/// Install the Ctrl+C handler.
///
/// - Before `register_server()`: exit immediately, nothing to wind down
/// - After `register_server()`: set SHUTDOWN and unblock the request loop
fn install_shutdown_handler() -> Result<(), String> {
    ctrlc::set_handler(|| {
        if !request_shutdown() {
            std::process::exit(130);
        }
    })
    .map_err(|e| format!("failed to set Ctrl+C handler: {e}"))
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Flag shutdown and unblock the server.
///
/// Returns `false` when no server is registered.
pub fn request_shutdown() -> bool {
    SHUTDOWN.store(true, Ordering::SeqCst);
    match SERVER.get() {
        Some(server) => {
            server.unblock();
            true
        }
        None => false,
    }
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================
