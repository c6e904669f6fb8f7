//! # Job Processor
//! src/lib.rs
//!
//! Procesador asíncrono de jobs aritméticos (suma y resta de `i32`) expuesto
//! a C mediante handles opacos. El llamador encola jobs, un worker en segundo
//! plano los ejecuta en orden y el llamador recoge los resultados con un poll
//! con timeout.
//!
//! ## Arquitectura
//!
//! - `jobs`: cola acotada, worker, canal de resultados y el `Processor`
//! - `handle`: tabla de handles con generación (evita use-after-free)
//! - `ffi`: funciones `extern "C"` de `include/job_processor.h`
//! - `config`: configuración CLI/entorno del binario demo
//! - `logging`: inicialización de `tracing` para binarios
//!
//! ## Ejemplo de uso
//!
//! ```rust
//! use job_processor::jobs::{Processor, ProcessorConfig};
//! use std::time::Duration;
//!
//! let processor = Processor::new(ProcessorConfig::default()).unwrap();
//! processor.enque_add(1, 10).unwrap();
//! assert_eq!(processor.poll_result(Duration::from_secs(1)).unwrap(), 11);
//! processor.shutdown();
//! ```

pub mod config;
pub mod ffi;
pub mod handle;
pub mod jobs;
pub mod logging;

pub use ffi::{
    do_add, processor_create, processor_create_with_capacity, processor_enque_add,
    processor_enque_sub, processor_free, processor_poll_result, processor_stats, ProcessorHandle,
};
pub use jobs::{Job, Operation, ProcessingStatus, Processor, ProcessorConfig, ProcessorError};
