// (FASE2) src/lib.rs
//! Vitral - Pilha de Display/Input.
//!
//! Ponto central de exportação dos módulos.
//! Drivers residentes no kernel (framebuffer e teclado serial) e o
//! compositor de janelas que roda em userspace por cima deles.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Infraestrutura ---
pub mod core; // Logging, Boot, Self-test
pub mod config; // Constantes globais
pub mod klib; // Framework de testes
pub mod mm; // Cópia de/para espaço de usuário
pub mod sync; // WaitQueue + colaborador de agendamento
pub mod sys; // Códigos de erro

// --- Drivers (kernel) ---
pub mod drivers; // Serial (log), Input (teclado), Video (framebuffer)
pub mod fs; // DevFS: superfície de registro de dispositivos

// --- Userspace ---
pub mod wm; // Compositor de janelas

pub use crate::sys::error::{SysError, SysResult};
