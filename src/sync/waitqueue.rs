//! Wait queues para bloqueio e sincronização
//!
//! Permite que contextos durmam aguardando eventos e sejam acordados
//! posteriormente. A suspensão propriamente dita é do agendador (colaborador
//! externo); aqui fica apenas o contador de eventos que fecha a janela entre
//! "soltar o lock" e "dormir".
//!
//! # Padrão de espera guardada
//!
//! ```text
//! lock
//! while !condição {
//!     if task.killed() { unlock; return Err }
//!     seen = wq.generation()
//!     unlock
//!     wq.wait(seen)          // pode retornar espuriamente
//!     lock                   // e re-verificar a condição
//! }
//! ```

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// Contexto de execução que pode ser cancelado enquanto bloqueado.
pub trait TaskContext {
    /// O processo foi marcado para terminar.
    fn killed(&self) -> bool;
}

/// Primitivas de sleep/wakeup do agendador.
pub trait Scheduler: Send + Sync {
    /// Suspende o contexto atual até `queue` avançar além de `seen`.
    ///
    /// Retornos espúrios são permitidos: o chamador sempre re-verifica.
    fn sleep(&self, queue: &WaitQueue, seen: u64);

    /// Torna executáveis os contextos dormindo em `queue`.
    fn wakeup(&self, queue: &WaitQueue);
}

/// Wait queue - canal de sleep/wakeup com contador de eventos.
pub struct WaitQueue {
    generation: AtomicU64,
    sched: Arc<dyn Scheduler>,
}

impl WaitQueue {
    /// Cria nova waitqueue vazia
    pub fn new(sched: Arc<dyn Scheduler>) -> Self {
        Self {
            generation: AtomicU64::new(0),
            sched,
        }
    }

    /// Número de wakeups emitidos até agora.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Bloqueia até um wakeup posterior a `seen` (ou retorno espúrio).
    pub fn wait(&self, seen: u64) {
        if self.generation() != seen {
            return;
        }
        self.sched.sleep(self, seen);
    }

    /// Acorda todos os contextos desta fila.
    pub fn wake_all(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.sched.wakeup(self);
    }

    /// Identificador estável do canal (endereço), útil para o agendador.
    #[inline]
    pub fn channel_id(&self) -> usize {
        self as *const Self as usize
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_advances_generation() {
        let wq = WaitQueue::new(fake::scheduler());
        let seen = wq.generation();
        wq.wake_all();
        assert_eq!(wq.generation(), seen + 1);
    }

    #[test]
    fn test_wait_returns_immediately_on_stale_generation() {
        let wq = WaitQueue::new(fake::scheduler());
        let seen = wq.generation();
        wq.wake_all();
        // O wakeup já aconteceu: não pode dormir.
        wq.wait(seen);
    }
}
