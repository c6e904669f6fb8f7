//! # Configuración del Demo
//! src/config.rs
//!
//! Configuración del programa de demostración con soporte para argumentos
//! CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./job_processor --jobs 20 --timeout-ms 500 --queue-capacity 64 --json
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! JOBS=20 POLL_TIMEOUT_MS=500 LOG_LEVEL=debug ./job_processor
//! ```

use clap::Parser;

/// Configuración del demo
#[derive(Debug, Clone, Parser)]
#[command(name = "job_processor")]
#[command(about = "Demo del procesador asíncrono de jobs aritméticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Cantidad de jobs Add(1, i + 10) a encolar
    #[arg(short, long, default_value = "10", env = "JOBS")]
    pub jobs: u32,

    /// Timeout de cada poll en milisegundos
    #[arg(long = "timeout-ms", default_value = "1000", env = "POLL_TIMEOUT_MS")]
    pub poll_timeout_ms: u64,

    /// Capacidad máxima de la cola de jobs
    #[arg(
        long = "queue-capacity",
        default_value = "1024",
        env = "JOB_PROCESSOR_QUEUE_CAPACITY"
    )]
    pub queue_capacity: usize,

    /// Nivel de log (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Imprime un reporte JSON al final
    #[arg(long, env = "JSON_REPORT")]
    pub json: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI y entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.queue_capacity > u32::MAX as usize {
            return Err(format!("Queue capacity must be <= {}", u32::MAX));
        }
        if self.jobs > i32::MAX as u32 - 11 {
            return Err("Jobs count is too large".to_string());
        }
        if self.log_level.trim().is_empty() {
            return Err("Log level must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("⚙️  Configuración:");
        println!("   Jobs:         {}", self.jobs);
        println!("   Poll timeout: {} ms", self.poll_timeout_ms);
        println!("   Queue cap:    {}", self.queue_capacity);
        println!("   Log level:    {}", self.log_level);
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            jobs: 10,
            poll_timeout_ms: 1000,
            queue_capacity: 1024,
            log_level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.jobs, 10);
        assert_eq!(config.poll_timeout_ms, 1000);
        assert_eq!(config.queue_capacity, 1024);
        assert!(!config.json);
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_queue_capacity() {
        let mut config = Config::default();
        config.queue_capacity = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Queue capacity"));
    }

    #[test]
    fn test_validate_too_many_jobs() {
        let mut config = Config::default();
        config.jobs = u32::MAX;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Jobs count"));
    }

    #[test]
    fn test_validate_empty_log_level() {
        let mut config = Config::default();
        config.log_level = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("Log level"));
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "job_processor",
            "--jobs",
            "3",
            "--timeout-ms",
            "250",
            "--queue-capacity",
            "8",
            "--json",
        ])
        .unwrap();

        assert_eq!(config.jobs, 3);
        assert_eq!(config.poll_timeout_ms, 250);
        assert_eq!(config.queue_capacity, 8);
        assert!(config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
