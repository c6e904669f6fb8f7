//! # Worker
//! src/jobs/worker.rs
//!
//! Hilo en segundo plano que consume la cola de jobs en orden FIFO y publica
//! los resultados en el canal.
//!
//! Hay un único worker por processor: es lo que garantiza que el i-ésimo
//! resultado corresponde al i-ésimo job aceptado. Un pool de workers
//! necesitaría números de secuencia y reordenar en el canal.

use crate::jobs::error::ProcessorError;
use crate::jobs::queue::JobQueue;
use crate::jobs::results::ResultChannel;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

pub const WORKER_THREAD_NAME: &str = "job-processor-worker";

/// Lanza el worker en un hilo con nombre
pub fn spawn(queue: JobQueue, results: ResultChannel) -> Result<JoinHandle<()>, ProcessorError> {
    let handle = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || worker_loop(queue, results))?;
    Ok(handle)
}

/// Loop principal del worker
///
/// Termina solo cuando la cola está cerrada y vacía, o si el canal de
/// resultados ya no acepta más.
pub fn worker_loop(queue: JobQueue, results: ResultChannel) {
    debug!("worker started");
    let mut processed: u64 = 0;

    loop {
        let job = match queue.dequeue() {
            Ok(Some(job)) => job,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "worker stopping: queue unavailable");
                break;
            }
        };

        let result = job.compute();
        trace!(
            operation = ?job.operation(),
            left = job.left(),
            right = job.right(),
            value = result.value,
            "job computed"
        );

        if let Err(e) = results.push(result) {
            warn!(error = %e, "worker stopping: result channel unavailable");
            break;
        }
        processed += 1;
    }

    debug!(processed, "worker stopped");
}
