//! # Tipos y Estructuras para el Sistema de Jobs
//! src/jobs/types.rs
//!
//! Define los tipos fundamentales que viajan por el pipeline:
//! operación, job, resultado y el estado que cruza la frontera C.

use serde::Serialize;

/// Operación aritmética de un job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Sub,
}

/// Unidad de trabajo inmutable: operación + dos operandos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Job {
    operation: Operation,
    left: i32,
    right: i32,
}

impl Job {
    pub fn new(operation: Operation, left: i32, right: i32) -> Self {
        Self { operation, left, right }
    }

    pub fn add(left: i32, right: i32) -> Self {
        Self::new(Operation::Add, left, right)
    }

    pub fn sub(left: i32, right: i32) -> Self {
        Self::new(Operation::Sub, left, right)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    /// Calcula el resultado del job
    ///
    /// El desbordamiento aritmético es wraparound en complemento a dos,
    /// nunca un error.
    pub fn compute(&self) -> JobResult {
        let value = match self.operation {
            Operation::Add => self.left.wrapping_add(self.right),
            Operation::Sub => self.left.wrapping_sub(self.right),
        };
        JobResult { value }
    }
}

/// Resultado de un job completado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobResult {
    pub value: i32,
}

/// Estado de cualquier operación falible
///
/// Los ordinales son estables a través de la ABI C, no reordenar.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessingStatus {
    Ok = 0,
    Timeout = 1,
    Overflow = 2,
    EnqueFailed = 3,
    OtherError = 4,
}

impl ProcessingStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProcessingStatus::Ok)
    }

    /// `Overflow` y `Timeout` se pueden reintentar sobre el mismo handle
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProcessingStatus::Timeout | ProcessingStatus::Overflow)
    }
}

/// Instantánea de las estadísticas de un processor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// Capacidad máxima de la cola de jobs
    pub queue_capacity: usize,

    /// Jobs encolados que el worker aún no tomó
    pub pending_jobs: usize,

    /// Jobs aceptados por enqueue
    pub accepted: u64,

    /// Jobs rechazados por cola llena
    pub rejected: u64,

    /// Resultados producidos por el worker
    pub completed: u64,

    /// Resultados entregados por poll
    pub delivered: u64,

    /// Resultados esperando a ser consumidos
    pub pending_results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_serialization() {
        let json = serde_json::to_string(&Operation::Sub).unwrap();
        assert_eq!(json, "\"sub\"");
    }

    #[test]
    fn test_job_serialization() {
        let json = serde_json::to_string(&Job::add(1, -2)).unwrap();
        assert_eq!(json, r#"{"operation":"add","left":1,"right":-2}"#);
    }

    #[test]
    fn test_job_compute() {
        assert_eq!(Job::add(1, 10).compute().value, 11);
        assert_eq!(Job::sub(3, 10).compute().value, -7);
    }

    #[test]
    fn test_job_compute_wraps() {
        assert_eq!(Job::add(i32::MAX, 1).compute().value, i32::MIN);
        assert_eq!(Job::sub(i32::MIN, 1).compute().value, i32::MAX);
    }

    #[test]
    fn test_status_ordinals_are_stable() {
        assert_eq!(ProcessingStatus::Ok as i32, 0);
        assert_eq!(ProcessingStatus::Timeout as i32, 1);
        assert_eq!(ProcessingStatus::Overflow as i32, 2);
        assert_eq!(ProcessingStatus::EnqueFailed as i32, 3);
        assert_eq!(ProcessingStatus::OtherError as i32, 4);
    }

    #[test]
    fn test_status_retryable() {
        assert!(ProcessingStatus::Timeout.is_retryable());
        assert!(ProcessingStatus::Overflow.is_retryable());
        assert!(!ProcessingStatus::EnqueFailed.is_retryable());
        assert!(!ProcessingStatus::OtherError.is_retryable());
        assert!(ProcessingStatus::Ok.is_ok());
    }
}
