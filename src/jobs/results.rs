//! # Canal de Resultados
//! src/jobs/results.rs
//!
//! FIFO thread-safe de resultados completados con lectura bloqueante
//! con timeout.
//!
//! El timeout se mide con reloj monotónico (`Instant`) desde la llamada a
//! `poll`, y un timeout no consume nada: el siguiente `poll` sigue esperando
//! el mismo resultado.

use crate::jobs::error::ProcessorError;
use crate::jobs::types::JobResult;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

struct ChannelState {
    results: VecDeque<JobResult>,
    closed: bool,

    /// Pollers actualmente bloqueados dentro del canal
    waiters: usize,

    completed: u64,
    delivered: u64,
}

/// Canal de resultados
pub struct ResultChannel {
    state: Arc<Mutex<ChannelState>>,

    /// Señala nuevos resultados, cierre y salida de pollers
    condvar: Arc<Condvar>,
}

impl ResultChannel {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState {
                results: VecDeque::new(),
                closed: false,
                waiters: 0,
                completed: 0,
                delivered: 0,
            })),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Publica un resultado
    ///
    /// Falla con `ChannelClosed` si el canal ya se cerró.
    pub fn push(&self, result: JobResult) -> Result<(), ProcessorError> {
        let mut state = self.state.lock()?;

        if state.closed {
            return Err(ProcessorError::ChannelClosed);
        }

        state.results.push_back(result);
        state.completed += 1;
        self.condvar.notify_all();

        Ok(())
    }

    /// Espera el siguiente resultado hasta `timeout`
    pub fn poll(&self, timeout: Duration) -> Result<JobResult, ProcessorError> {
        let started = Instant::now();
        let mut state = self.state.lock()?;

        state.waiters += 1;
        let outcome = loop {
            if state.closed {
                break Err(ProcessorError::ChannelClosed);
            }

            if let Some(result) = state.results.pop_front() {
                state.delivered += 1;
                break Ok(result);
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                break Err(ProcessorError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            // wait_timeout puede despertar antes (spurious), se recalcula
            // el tiempo restante en cada vuelta
            state = match self.condvar.wait_timeout(state, timeout - elapsed) {
                Ok((guard, _)) => guard,
                Err(poisoned) => {
                    let (mut guard, _) = poisoned.into_inner();
                    guard.waiters -= 1;
                    self.condvar.notify_all();
                    return Err(ProcessorError::LockPoisoned);
                }
            };
        };
        state.waiters -= 1;

        // Quien espera en wait_idle necesita saber que salimos
        if state.closed {
            self.condvar.notify_all();
        }

        outcome
    }

    /// Cierra el canal y despierta a todos los pollers bloqueados
    pub fn close(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.closed = true;
        self.condvar.notify_all();
    }

    /// Bloquea hasta que ningún poller quede dentro del canal
    ///
    /// Solo termina si el canal está cerrado; si no, un poller con timeout
    /// largo podría retenerlo indefinidamente.
    pub fn wait_idle(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        while state.closed && state.waiters > 0 {
            state = match self.condvar.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Resultados esperando a ser consumidos
    pub(crate) fn len(&self) -> usize {
        self.state.lock().map(|s| s.results.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn waiters(&self) -> usize {
        self.state.lock().map(|s| s.waiters).unwrap_or(0)
    }

    /// (completados, entregados)
    pub fn counters(&self) -> (u64, u64) {
        self.state
            .lock()
            .map(|s| (s.completed, s.delivered))
            .unwrap_or((0, 0))
    }
}

impl Default for ResultChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ResultChannel {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            condvar: Arc::clone(&self.condvar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_poll_returns_in_fifo_order() {
        let channel = ResultChannel::new();
        channel.push(JobResult { value: 1 }).unwrap();
        channel.push(JobResult { value: 2 }).unwrap();

        let timeout = Duration::from_millis(10);
        assert_eq!(channel.poll(timeout).unwrap().value, 1);
        assert_eq!(channel.poll(timeout).unwrap().value, 2);
        assert_eq!(channel.counters(), (2, 2));
    }

    #[test]
    fn test_poll_times_out_on_empty_channel() {
        let channel = ResultChannel::new();
        let started = Instant::now();

        let err = channel.poll(Duration::from_millis(30)).unwrap_err();

        assert!(matches!(err, ProcessorError::Timeout { timeout_ms: 30 }));
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(channel.waiters(), 0);
    }

    #[test]
    fn test_zero_timeout_does_not_block() {
        let channel = ResultChannel::new();
        assert!(matches!(
            channel.poll(Duration::ZERO),
            Err(ProcessorError::Timeout { .. })
        ));

        channel.push(JobResult { value: 7 }).unwrap();
        assert_eq!(channel.poll(Duration::ZERO).unwrap().value, 7);
    }

    #[test]
    fn test_timeout_does_not_consume() {
        let channel = ResultChannel::new();
        let producer = channel.clone();

        assert!(channel.poll(Duration::from_millis(10)).is_err());

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.push(JobResult { value: 42 }).unwrap();
        });

        assert_eq!(channel.poll(Duration::from_secs(5)).unwrap().value, 42);
        handle.join().unwrap();
    }

    #[test]
    fn test_close_wakes_blocked_poller() {
        let channel = ResultChannel::new();
        let poller = channel.clone();

        let handle = thread::spawn(move || poller.poll(Duration::from_secs(30)));

        // Esperar a que el poller esté bloqueado
        while channel.waiters() == 0 {
            thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        channel.close();
        channel.wait_idle();

        assert_eq!(channel.waiters(), 0);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            handle.join().unwrap(),
            Err(ProcessorError::ChannelClosed)
        ));
    }

    #[test]
    fn test_push_after_close_fails() {
        let channel = ResultChannel::new();
        channel.close();
        assert!(matches!(
            channel.push(JobResult { value: 1 }),
            Err(ProcessorError::ChannelClosed)
        ));
    }
}
