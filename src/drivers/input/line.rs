//! Disciplina de Linha do teclado serial
//!
//! Recebe bytes crus do transporte (interrupção da UART ou polling),
//! aplica a edição de linha e libera linhas completas para o leitor
//! bloqueado em `read_line`.
//!
//! # Concorrência
//!
//! - Produtor (`feed`/`interrupt`) e consumidor (`read_line`) dividem o
//!   `InputRing` sob um `spin::Mutex`, mantido apenas durante um `feed` ou
//!   uma iteração de cópia do leitor, NUNCA durante o sono.
//! - Efeitos colaterais (eco, apagar, procdump) rodam com o lock solto.

use alloc::boxed::Box;
use alloc::sync::Arc;
use spin::Mutex;

use super::ring::InputRing;
use crate::config::{KEY_BACKSPACE, KEY_DELETE, KEY_EOT, KEY_KILL_LINE, KEY_PROC_DUMP};
use crate::sync::{Scheduler, TaskContext, WaitQueue};
use crate::sys::error::{SysError, SysResult};

/// Fonte de bytes crus (UART, polling). `None` = nada disponível agora.
pub trait ByteSource {
    fn next_byte(&mut self) -> Option<u8>;
}

/// Efeitos colaterais da edição de linha.
pub trait InputHooks: Send + Sync {
    /// Byte aceito no anel
    fn echo(&self, _byte: u8) {}

    /// Um caractere da linha em edição foi apagado
    fn erase(&self) {}

    /// ^P: diagnóstico da tabela de processos
    fn process_dump(&self) {}
}

/// Diagnóstico da tabela de processos (colaborador externo)
pub trait ProcessDump: Send + Sync {
    fn dump(&self);
}

/// Sem eco nem diagnóstico
pub struct NoHooks;

impl InputHooks for NoHooks {}

/// O que um `feed` causou, decidido sob o lock e executado fora dele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedOutcome {
    Ignored,
    Erased(usize),
    Dump,
    Accepted { byte: u8, committed: bool },
}

/// Copia bytes comprometidos para `dst[*copied..]`.
///
/// Retorna true quando a leitura terminou (destino cheio, '\n' ou EOT) e
/// false quando os bytes comprometidos acabaram antes disso.
fn drain_committed(ring: &mut InputRing, dst: &mut [u8], copied: &mut usize) -> bool {
    while *copied < dst.len() {
        let Some(c) = ring.pop() else {
            return false;
        };

        if c == KEY_EOT {
            if *copied > 0 {
                ring.unpop();
            }
            return true;
        }

        dst[*copied] = c;
        *copied += 1;

        if c == b'\n' {
            return true;
        }
    }
    true
}

/// Disciplina de linha: dono exclusivo do anel de entrada.
pub struct LineDiscipline {
    ring: Mutex<InputRing>,
    readers: WaitQueue,
    hooks: Box<dyn InputHooks>,
}

impl LineDiscipline {
    /// Cria a disciplina (uma vez, na inicialização do driver)
    pub fn new(sched: Arc<dyn Scheduler>, hooks: Box<dyn InputHooks>) -> Self {
        Self {
            ring: Mutex::new(InputRing::new()),
            readers: WaitQueue::new(sched),
            hooks,
        }
    }

    /// Processa um byte cru. Chamado só pelo produtor.
    pub fn feed(&self, byte: u8) {
        let outcome = {
            let mut ring = self.ring.lock();
            match byte {
                KEY_PROC_DUMP => FeedOutcome::Dump,
                KEY_KILL_LINE => FeedOutcome::Erased(ring.kill_line()),
                KEY_BACKSPACE | KEY_DELETE => {
                    FeedOutcome::Erased(usize::from(ring.rewind_char()))
                }
                0 => FeedOutcome::Ignored,
                _ => {
                    let byte = if byte == b'\r' { b'\n' } else { byte };
                    if ring.push(byte) {
                        let committed = byte == b'\n' || byte == KEY_EOT || ring.is_full();
                        if committed {
                            ring.commit();
                        }
                        FeedOutcome::Accepted { byte, committed }
                    } else {
                        FeedOutcome::Ignored
                    }
                }
            }
        };

        match outcome {
            FeedOutcome::Ignored => {
                crate::ktrace!("(KBD) Byte descartado=", byte);
            }
            FeedOutcome::Erased(count) => {
                for _ in 0..count {
                    self.hooks.erase();
                }
            }
            FeedOutcome::Dump => self.hooks.process_dump(),
            FeedOutcome::Accepted { byte, committed } => {
                self.hooks.echo(byte);
                if committed {
                    self.readers.wake_all();
                }
            }
        }
    }

    /// Handler de interrupção: drena tudo que o transporte tem agora.
    ///
    /// Retorna quantos bytes foram consumidos da fonte.
    pub fn interrupt(&self, src: &mut dyn ByteSource) -> usize {
        let mut consumed = 0;
        while let Some(byte) = src.next_byte() {
            self.feed(byte);
            consumed += 1;
        }
        consumed
    }

    /// Lê até `dst.len()` bytes, bloqueando até existir uma linha completa.
    ///
    /// - '\n' encerra a leitura DEPOIS de ser copiado.
    /// - EOT encerra a leitura sem ser copiado; se algum byte já foi
    ///   copiado ele fica no anel, para que a próxima leitura retorne 0.
    /// - Processo morto enquanto bloqueado → `Interrupted` (não repetir).
    pub fn read_line(&self, task: &dyn TaskContext, dst: &mut [u8]) -> SysResult<usize> {
        if dst.is_empty() {
            return Ok(0);
        }
        let mut copied = 0;

        let mut ring = self.ring.lock();
        loop {
            while !ring.has_committed() {
                if task.killed() {
                    crate::kdebug!("(KBD) Leitura cancelada, copiados=", copied);
                    return Err(SysError::Interrupted);
                }
                let seen = self.readers.generation();
                drop(ring);
                self.readers.wait(seen);
                ring = self.ring.lock();
            }

            if drain_committed(&mut ring, dst, &mut copied) {
                return Ok(copied);
            }
        }
    }

    /// Como `read_line`, mas sem bloquear: `WouldBlock` se não há nada
    /// comprometido, senão copia apenas o que já está disponível.
    pub fn try_read_line(&self, dst: &mut [u8]) -> SysResult<usize> {
        let mut ring = self.ring.lock();
        if !ring.has_committed() {
            return Err(SysError::WouldBlock);
        }
        let mut copied = 0;
        drain_committed(&mut ring, dst, &mut copied);
        Ok(copied)
    }

    /// Bytes liberados e ainda não lidos
    pub fn committed(&self) -> usize {
        self.ring.lock().committed()
    }

    /// Bytes da linha em edição
    pub fn pending(&self) -> usize {
        self.ring.lock().pending()
    }
}
