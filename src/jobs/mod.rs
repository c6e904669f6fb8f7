//! # Sistema de Jobs
//!
//! Pipeline asíncrono de jobs aritméticos:
//!
//! ```text
//! enqueue -> JobQueue -> worker -> ResultChannel -> poll
//! ```
//!
//! - `types`: Job, operación, resultado y `ProcessingStatus`
//! - `queue`: cola FIFO acotada
//! - `worker`: hilo que calcula los resultados
//! - `results`: canal de resultados con poll bloqueante
//! - `processor`: fachada dueña de todo lo anterior

pub mod error;
pub mod processor;
pub mod queue;
pub mod results;
pub mod types;
pub mod worker;

pub use error::ProcessorError;
pub use processor::{Processor, ProcessorConfig};
pub use types::{Job, JobResult, Operation, ProcessingStatus, ProcessorStats};
