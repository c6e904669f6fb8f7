//! # Tabla de Handles
//! src/handle.rs
//!
//! Arena de valores vivos direccionados por un handle opaco `u64`.
//!
//! El handle codifica `(generación << 32) | (índice + 1)`, así que nunca es 0.
//! Al liberar un slot su generación avanza: un handle viejo (use-after-free o
//! double-free) deja de coincidir y se rechaza en vez de apuntar a otro valor.

use std::sync::Arc;

/// Handle opaco; `0` nunca es válido
pub type RawHandle = u64;

pub const NULL_HANDLE: RawHandle = 0;

struct Slot<T> {
    generation: u32,
    value: Option<Arc<T>>,
}

pub struct HandleTable<T> {
    slots: Vec<Slot<T>>,

    /// Índices de slots libres para reutilizar
    free: Vec<usize>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Inserta un valor y retorna su handle
    pub fn insert(&mut self, value: Arc<T>) -> RawHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: None,
                });
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.value = Some(value);
        encode(index, slot.generation)
    }

    /// Obtiene una referencia compartida al valor, si el handle sigue vivo
    pub fn get(&self, handle: RawHandle) -> Option<Arc<T>> {
        let (index, generation) = decode(handle)?;
        let slot = self.slots.get(index)?;

        if slot.generation != generation {
            return None;
        }
        slot.value.clone()
    }

    /// Quita el valor e invalida el handle
    pub fn remove(&mut self, handle: RawHandle) -> Option<Arc<T>> {
        let (index, generation) = decode(handle)?;
        let slot = self.slots.get_mut(index)?;

        if slot.generation != generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(value)
    }

    /// Cantidad de valores vivos
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(index: usize, generation: u32) -> RawHandle {
    ((generation as u64) << 32) | (index as u64 + 1)
}

fn decode(handle: RawHandle) -> Option<(usize, u32)> {
    let low = handle & 0xFFFF_FFFF;
    if low == 0 {
        return None;
    }
    Some(((low - 1) as usize, (handle >> 32) as u32))
}
