//! # Synchronization Primitives
//!
//! Os dados compartilhados dos drivers usam `spin::Mutex` (seções curtas,
//! nunca mantidas durante o sono). O bloqueio longo é feito via `WaitQueue`,
//! que delega a suspensão ao agendador externo.
//!
//! ## Regras
//!
//! - **Mutex**: nunca segurar através de `WaitQueue::wait`
//! - **WaitQueue**: sempre re-verificar a condição ao acordar

pub mod waitqueue;

pub use waitqueue::{Scheduler, TaskContext, WaitQueue};
