//! # Logging
//! src/logging.rs
//!
//! La librería solo emite eventos `tracing`; instalar un subscriber es
//! decisión del binario que la usa.

use tracing_subscriber::EnvFilter;

/// Inicializa el subscriber de `tracing` para el proceso
///
/// `RUST_LOG` tiene prioridad sobre `default_level`. Llamadas posteriores no
/// hacen nada.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}
