//! # ABI C
//! src/ffi.rs
//!
//! Funciones `extern "C"` declaradas en `include/job_processor.h`.
//!
//! Los processors viven en una tabla de handles global; al C solo se le
//! entrega un `u64` opaco. Ningún pánico ni error de Rust cruza la frontera:
//! todo se traduce a `ProcessingStatus`.
//!
//! ## Contrato de uso incorrecto
//!
//! Usar un handle después de `processor_free` es un error del llamador. Se
//! detecta por la generación del handle y responde `EnqueFailed` (enqueue),
//! `OtherError` (poll) o se ignora (free), pero no hay que depender de eso.

use crate::handle::{HandleTable, RawHandle, NULL_HANDLE};
use crate::jobs::error::ProcessorError;
use crate::jobs::processor::{Processor, ProcessorConfig};
use crate::jobs::types::{Job, ProcessingStatus, ProcessorStats};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Handle opaco de un processor (`0` = inválido)
pub type ProcessorHandle = RawHandle;

static PROCESSORS: Mutex<HandleTable<Processor>> = Mutex::new(HandleTable::new());

fn registry() -> MutexGuard<'static, HandleTable<Processor>> {
    // La tabla solo se modifica con operaciones que no entran en pánico a
    // mitad de camino, así que un lock envenenado sigue siendo consistente
    match PROCESSORS.lock() {
        Ok(table) => table,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Busca un processor vivo; el lock de la tabla se suelta antes de usarlo
fn lookup(handle: ProcessorHandle) -> Result<Arc<Processor>, ProcessorError> {
    registry().get(handle).ok_or_else(|| {
        warn!(handle, "use of invalid or freed processor handle");
        ProcessorError::InvalidHandle
    })
}

fn register(config: ProcessorConfig) -> ProcessorHandle {
    let result = panic::catch_unwind(|| Processor::new(config));

    match result {
        Ok(Ok(processor)) => {
            let mut table = registry();
            let handle = table.insert(Arc::new(processor));
            debug!(handle, live = table.len(), "processor registered");
            handle
        }
        Ok(Err(e)) => {
            error!(error = %e, "failed to create processor");
            NULL_HANDLE
        }
        Err(_) => {
            error!("panic while creating processor");
            NULL_HANDLE
        }
    }
}

/// Espera a que los demás `Arc` (enqueue o poll que hicieron `lookup` antes
/// del free) se suelten y retorna el valor, para liberarlo en este hilo
fn into_sole_owner<T>(mut shared: Arc<T>) -> T {
    loop {
        match Arc::try_unwrap(shared) {
            Ok(value) => return value,
            Err(still_shared) => {
                shared = still_shared;
                thread::sleep(Duration::from_millis(1));
            }
        }
    }
}

fn enqueue(handle: ProcessorHandle, job: Job) -> ProcessingStatus {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        lookup(handle)?.enqueue(job)
    }));

    match result {
        Ok(Ok(())) => ProcessingStatus::Ok,
        Ok(Err(e)) => e.enqueue_status(),
        Err(_) => ProcessingStatus::OtherError,
    }
}

/// Crea un processor con la capacidad de `JOB_PROCESSOR_QUEUE_CAPACITY`
///
/// Retorna `0` solo si el sistema no pudo lanzar el hilo del worker.
#[no_mangle]
pub extern "C" fn processor_create() -> ProcessorHandle {
    register(ProcessorConfig::from_env())
}

/// Crea un processor con una capacidad de cola explícita (0 se trata como 1)
#[no_mangle]
pub extern "C" fn processor_create_with_capacity(capacity: u32) -> ProcessorHandle {
    register(ProcessorConfig {
        queue_capacity: (capacity as usize).max(1),
    })
}

/// Cierra y libera el processor
///
/// Bloquea hasta que el worker terminó, todo poll en curso salió y la cola y
/// el canal se liberaron. Un handle inválido o ya liberado se ignora.
#[no_mangle]
pub extern "C" fn processor_free(processor: ProcessorHandle) {
    let result = panic::catch_unwind(|| {
        // Sacarlo de la tabla antes del shutdown para no bloquear a los demás
        let removed = registry().remove(processor);
        let Some(processor_ref) = removed else {
            warn!(handle = processor, "free of invalid or already freed handle");
            return;
        };

        // Tras el shutdown los enqueue/poll en vuelo retornan enseguida, así
        // que la espera es corta
        processor_ref.shutdown();
        drop(into_sole_owner(processor_ref));
        debug!(handle = processor, "processor freed");
    });

    if result.is_err() {
        error!(handle = processor, "panic while freeing processor");
    }
}

#[no_mangle]
pub extern "C" fn processor_enque_add(
    processor: ProcessorHandle,
    left: i32,
    right: i32,
) -> ProcessingStatus {
    enqueue(processor, Job::add(left, right))
}

#[no_mangle]
pub extern "C" fn processor_enque_sub(
    processor: ProcessorHandle,
    left: i32,
    right: i32,
) -> ProcessingStatus {
    enqueue(processor, Job::sub(left, right))
}

/// Espera el siguiente resultado hasta `timeout_millis`
///
/// `result_value` solo se escribe cuando el estado es `Ok`.
///
/// # Safety
///
/// `result_value` debe ser null o apuntar a un `int32_t` escribible.
#[no_mangle]
pub unsafe extern "C" fn processor_poll_result(
    processor: ProcessorHandle,
    result_value: *mut i32,
    timeout_millis: u64,
) -> ProcessingStatus {
    if result_value.is_null() {
        warn!(handle = processor, "poll with null result pointer");
        return ProcessingStatus::from(ProcessorError::NullPointer);
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        lookup(processor)?.poll_result(Duration::from_millis(timeout_millis))
    }));

    match result {
        Ok(Ok(value)) => {
            // SAFETY: puntero no nulo y escribible según el contrato
            unsafe { result_value.write(value) };
            ProcessingStatus::Ok
        }
        Ok(Err(e)) => ProcessingStatus::from(e),
        Err(_) => ProcessingStatus::OtherError,
    }
}

/// Estadísticas de un processor vivo (solo desde Rust, no forma parte de la
/// ABI C)
pub fn processor_stats(processor: ProcessorHandle) -> Result<ProcessorStats, ProcessorError> {
    Ok(lookup(processor)?.stats())
}

/// Suma síncrona trivial; desborda con wraparound
#[no_mangle]
pub extern "C" fn do_add(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}
