//! Ledger event logging.
//!
//! The orchestrator reports a small set of [`LedgerEvent`]s through the
//! [`Logger`] configured on [`LedgerConfig`](crate::config::LedgerConfig).
//! [`TracingLogger`] emits them as structured `tracing` events.

use std::fmt;
use std::sync::Arc;

use crate::error::LedgerError;
use crate::types::HttpMethod;

/// Events emitted by the ledger orchestrator.
#[derive(Debug)]
pub enum LedgerEvent<'a> {
    /// The ledger finished building and every plugin initialized.
    Ready {
        app_name: &'a str,
        plugins: &'a [&'a str],
    },
    /// A request failed with a server-side (5xx) error.
    RequestFailed {
        method: &'a HttpMethod,
        path: &'a str,
        error: &'a LedgerError,
    },
}

/// Sink for [`LedgerEvent`]s.
pub trait Logger: Send + Sync {
    fn log(&self, event: &LedgerEvent<'_>);
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Logger")
    }
}

#[derive(Debug, Clone)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, event: &LedgerEvent<'_>) {
        match event {
            LedgerEvent::Ready { app_name, plugins } => {
                tracing::info!(
                    target: "carbon_ledger",
                    app_name,
                    plugins = %plugins.join(","),
                    "Ledger ready"
                );
            }
            LedgerEvent::RequestFailed {
                method,
                path,
                error,
            } => {
                tracing::error!(
                    target: "carbon_ledger",
                    method = ?method,
                    path,
                    status = error.status_code(),
                    error = %error,
                    "Request failed"
                );
            }
        }
    }
}

pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
