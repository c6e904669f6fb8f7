//! # Processor
//! src/jobs/processor.rs
//!
//! Fachada que es dueña de la cola, el worker y el canal de resultados y
//! coordina su ciclo de vida: creación, encolado, polling y cierre.

use crate::jobs::error::ProcessorError;
use crate::jobs::queue::JobQueue;
use crate::jobs::results::ResultChannel;
use crate::jobs::types::{Job, ProcessorStats};
use crate::jobs::worker;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// Variable de entorno leída por `ProcessorConfig::from_env`
pub const QUEUE_CAPACITY_ENV: &str = "JOB_PROCESSOR_QUEUE_CAPACITY";

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Configuración del Processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Capacidad máxima de la cola de jobs pendientes
    pub queue_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ProcessorConfig {
    /// Crea una configuración desde el Config principal
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            queue_capacity: config.queue_capacity,
        }
    }

    /// Lee la capacidad desde el entorno; valores ausentes o inválidos usan
    /// el default
    pub fn from_env() -> Self {
        let queue_capacity = std::env::var(QUEUE_CAPACITY_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|capacity| *capacity > 0)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        Self { queue_capacity }
    }
}

/// Pipeline completo: cola -> worker -> canal de resultados
pub struct Processor {
    queue: JobQueue,
    results: ResultChannel,

    /// `None` una vez que el worker fue joineado
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Processor {
    /// Crea el processor y lanza su worker
    pub fn new(config: ProcessorConfig) -> Result<Self, ProcessorError> {
        let queue = JobQueue::new(config.queue_capacity);
        let results = ResultChannel::new();
        let handle = worker::spawn(queue.clone(), results.clone())?;

        debug!(queue_capacity = queue.max_capacity(), "processor created");

        Ok(Self {
            queue,
            results,
            worker: Mutex::new(Some(handle)),
        })
    }

    pub fn enqueue(&self, job: Job) -> Result<(), ProcessorError> {
        self.queue.enqueue(job)
    }

    pub fn enque_add(&self, left: i32, right: i32) -> Result<(), ProcessorError> {
        self.enqueue(Job::add(left, right))
    }

    pub fn enque_sub(&self, left: i32, right: i32) -> Result<(), ProcessorError> {
        self.enqueue(Job::sub(left, right))
    }

    /// Espera el siguiente resultado hasta `timeout`
    pub fn poll_result(&self, timeout: Duration) -> Result<i32, ProcessorError> {
        self.results.poll(timeout).map(|result| result.value)
    }

    /// Cierre síncrono
    ///
    /// 1. Cierra la cola (los enqueue siguientes fallan)
    /// 2. El worker procesa lo pendiente y se joinea
    /// 3. Cierra el canal y espera a que los polls bloqueados salgan con error
    ///
    /// Es idempotente: llamadas posteriores no hacen nada.
    pub fn shutdown(&self) {
        self.queue.close();

        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
            debug!(
                discarded_results = self.results.len(),
                "processor worker joined"
            );
        }

        self.results.close();
        self.results.wait_idle();
    }

    pub fn stats(&self) -> ProcessorStats {
        let queue = self.queue.stats();
        let (completed, delivered) = self.results.counters();

        ProcessorStats {
            queue_capacity: queue.capacity,
            pending_jobs: queue.total,
            accepted: queue.accepted,
            rejected: queue.rejected,
            completed,
            delivered,
            pending_results: self.results.len(),
        }
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
