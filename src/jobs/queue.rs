//! # Cola Acotada de Jobs
//! src/jobs/queue.rs
//!
//! Implementa una cola FIFO thread-safe con capacidad máxima.
//! Cuando está llena rechaza el job (backpressure) en vez de bloquear.

use crate::jobs::error::ProcessorError;
use crate::jobs::types::Job;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Estado protegido por el mutex
struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
    accepted: u64,
    rejected: u64,
}

/// Cola FIFO acotada y thread-safe
pub struct JobQueue {
    /// Estado interno
    state: Arc<Mutex<QueueState>>,

    /// Condvar para despertar al worker cuando hay jobs o se cierra la cola
    condvar: Arc<Condvar>,

    /// Capacidad máxima de la cola
    max_capacity: usize,
}

impl JobQueue {
    /// Crea una nueva cola con capacidad máxima (mínimo 1)
    pub fn new(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(1);
        Self {
            state: Arc::new(Mutex::new(QueueState {
                jobs: VecDeque::with_capacity(max_capacity.min(1024)),
                closed: false,
                accepted: 0,
                rejected: 0,
            })),
            condvar: Arc::new(Condvar::new()),
            max_capacity,
        }
    }

    /// Encola un job
    ///
    /// Falla con `QueueFull` si la cola está llena (el estado no cambia) y con
    /// `QueueClosed` si ya se cerró.
    pub fn enqueue(&self, job: Job) -> Result<(), ProcessorError> {
        let mut state = self.state.lock()?;

        if state.closed {
            return Err(ProcessorError::QueueClosed);
        }

        if state.jobs.len() >= self.max_capacity {
            state.rejected += 1;
            return Err(ProcessorError::QueueFull {
                capacity: self.max_capacity,
            });
        }

        state.jobs.push_back(job);
        state.accepted += 1;

        // Notificar al worker
        self.condvar.notify_one();

        Ok(())
    }

    /// Desencola el job más antiguo
    ///
    /// Bloquea hasta que haya un job disponible. Retorna `Ok(None)` solo cuando
    /// la cola está cerrada y vacía.
    pub fn dequeue(&self) -> Result<Option<Job>, ProcessorError> {
        let mut state = self.state.lock()?;

        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Ok(Some(job));
            }

            if state.closed {
                return Ok(None);
            }

            state = self.condvar.wait(state)?;
        }
    }

    /// Intenta desencolar sin bloquear
    #[cfg(test)]
    pub fn try_dequeue(&self) -> Result<Option<Job>, ProcessorError> {
        let mut state = self.state.lock()?;
        Ok(state.jobs.pop_front())
    }

    /// Cierra la cola: no acepta más jobs, pero los pendientes se siguen
    /// entregando
    pub fn close(&self) {
        // Con el lock envenenado igual marcamos cerrado
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.closed = true;
        self.condvar.notify_all();
    }

    /// Retorna el tamaño actual de la cola
    pub(crate) fn len(&self) -> usize {
        self.state.lock().map(|s| s.jobs.len()).unwrap_or(0)
    }

    /// Retorna la capacidad máxima
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Obtiene estadísticas de la cola
    pub fn stats(&self) -> QueueStats {
        match self.state.lock() {
            Ok(state) => QueueStats {
                total: state.jobs.len(),
                capacity: self.max_capacity,
                accepted: state.accepted,
                rejected: state.rejected,
            },
            Err(_) => QueueStats {
                capacity: self.max_capacity,
                ..QueueStats::default()
            },
        }
    }
}

/// Estadísticas de una cola
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    pub total: usize,
    pub capacity: usize,
    pub accepted: u64,
    pub rejected: u64,
}

impl Clone for JobQueue {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            condvar: Arc::clone(&self.condvar),
            max_capacity: self.max_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_queue_fifo_ordering() {
        let queue = JobQueue::new(100);

        queue.enqueue(Job::add(1, 1)).unwrap();
        queue.enqueue(Job::sub(2, 2)).unwrap();
        queue.enqueue(Job::add(3, 3)).unwrap();

        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::add(1, 1)));
        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::sub(2, 2)));
        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::add(3, 3)));
        assert_eq!(queue.try_dequeue().unwrap(), None);
    }

    #[test]
    fn test_queue_capacity() {
        let queue = JobQueue::new(2);

        assert!(queue.enqueue(Job::add(1, 0)).is_ok());
        assert!(queue.enqueue(Job::add(2, 0)).is_ok());
        assert_eq!(queue.len(), queue.max_capacity());

        let err = queue.enqueue(Job::add(3, 0)).unwrap_err();
        assert!(matches!(err, ProcessorError::QueueFull { capacity: 2 }));

        // El rechazo no altera el contenido
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::add(1, 0)));

        // Con espacio libre vuelve a aceptar
        assert!(queue.enqueue(Job::add(4, 0)).is_ok());
        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::add(2, 0)));
        assert_eq!(queue.try_dequeue().unwrap(), Some(Job::add(4, 0)));

        let stats = queue.stats();
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let queue = JobQueue::new(0);
        assert_eq!(queue.max_capacity(), 1);
        assert!(queue.enqueue(Job::add(1, 1)).is_ok());
    }

    #[test]
    fn test_closed_queue_rejects_but_drains() {
        let queue = JobQueue::new(4);
        queue.enqueue(Job::add(1, 2)).unwrap();
        queue.close();

        assert!(matches!(
            queue.enqueue(Job::add(5, 5)),
            Err(ProcessorError::QueueClosed)
        ));

        // Lo pendiente se entrega antes de señalar fin
        assert_eq!(queue.dequeue().unwrap(), Some(Job::add(1, 2)));
        assert_eq!(queue.dequeue().unwrap(), None);
    }

    #[test]
    fn test_close_wakes_blocked_dequeue() {
        let queue = JobQueue::new(4);
        let consumer = queue.clone();

        let handle = thread::spawn(move || consumer.dequeue().unwrap());

        thread::sleep(Duration::from_millis(50));
        queue.close();

        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn test_dequeue_blocks_until_enqueue() {
        let queue = JobQueue::new(4);
        let consumer = queue.clone();

        let handle = thread::spawn(move || consumer.dequeue().unwrap());

        thread::sleep(Duration::from_millis(50));
        queue.enqueue(Job::sub(9, 4)).unwrap();

        assert_eq!(handle.join().unwrap(), Some(Job::sub(9, 4)));
    }
}
