//! Superfície de syscalls consumida pelo compositor
//!
//! O compositor roda em userspace: processos, pipes e descritores são do
//! kernel (colaborador externo). Tudo passa por este trait para que o laço
//! possa rodar sobre o kernel real ou sobre um fake em testes.

use crate::fs::devfs::OpenFlags;
use crate::sys::error::{SysError, SysResult};
use crate::sys::{Fd, Pid};

/// Resultado de `fork`, do ponto de vista de quem retorna
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkResult {
    /// Estamos no processo filho
    Child,
    /// Estamos no pai; filho criado com este pid
    Parent(Pid),
}

pub trait Sys {
    fn open(&mut self, path: &str, flags: OpenFlags) -> SysResult<Fd>;

    fn close(&mut self, fd: Fd) -> SysResult<()>;

    /// Lê sem bloquear: `Ok(0)` = fim de arquivo (nenhum escritor),
    /// `Err(WouldBlock)` = nada disponível agora
    fn read_nonblocking(&mut self, fd: Fd, buf: &mut [u8]) -> SysResult<usize>;

    fn write(&mut self, fd: Fd, buf: &[u8]) -> SysResult<usize>;

    /// Cria um pipe: (leitura, escrita)
    fn pipe(&mut self) -> SysResult<(Fd, Fd)>;

    fn fork(&mut self) -> SysResult<ForkResult>;

    /// Faz `new` apontar para o mesmo objeto que `old`
    fn dup2(&mut self, old: Fd, new: Fd) -> SysResult<()>;

    /// Substitui a imagem do processo. Só retorna em caso de falha.
    fn exec(&mut self, program: &str, argv: &[&str]) -> SysError;

    fn exit(&mut self, code: i32) -> !;

    /// Colhe um filho terminado, sem bloquear
    fn try_wait(&mut self) -> SysResult<Option<Pid>>;

    fn sleep(&mut self, ticks: u32);
}
