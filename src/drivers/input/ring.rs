//! Input Ring
//!
//! Buffer circular de bytes com três cursores monotônicos:
//!
//! ```text
//!   read ──────► write ──────► edit
//!   │  linhas     │  linha em   │
//!   │  completas  │  edição     │
//! ```
//!
//! Invariante: `read <= write <= edit <= read + N`. Os cursores crescem
//! sem voltar; a posição física é `cursor % N`. Aritmética em `wrapping_*`
//! para que o estouro do contador preserve as distâncias.

use crate::config::INPUT_BUF;

/// Buffer circular para input
pub struct InputRing<const N: usize = INPUT_BUF> {
    buf: [u8; N],
    read: usize,
    write: usize,
    edit: usize,
}

impl<const N: usize> InputRing<N> {
    const CAPACITY_IS_POW2: () = assert!(N.is_power_of_two(), "capacidade deve ser potência de 2");

    /// Cria anel vazio
    pub const fn new() -> Self {
        let () = Self::CAPACITY_IS_POW2;
        Self {
            buf: [0; N],
            read: 0,
            write: 0,
            edit: 0,
        }
    }

    /// Capacidade em bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes ainda não lidos (linhas completas + linha em edição)
    #[inline]
    pub fn len(&self) -> usize {
        self.edit.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes visíveis ao consumidor
    #[inline]
    pub fn committed(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    /// Bytes da linha em edição
    #[inline]
    pub fn pending(&self) -> usize {
        self.edit.wrapping_sub(self.write)
    }

    /// Há pelo menos um byte liberado para leitura
    #[inline]
    pub fn has_committed(&self) -> bool {
        self.read != self.write
    }

    /// Anel cheio desde a última leitura
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Acrescenta um byte na posição `edit`. Retorna false se cheio.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[self.edit % N] = byte;
        self.edit = self.edit.wrapping_add(1);
        true
    }

    /// Libera a linha em edição para o consumidor (`write = edit`)
    pub fn commit(&mut self) {
        self.write = self.edit;
    }

    /// Recua `edit` um byte, se houver algo não-comprometido
    pub fn rewind_char(&mut self) -> bool {
        if self.edit == self.write {
            return false;
        }
        self.edit = self.edit.wrapping_sub(1);
        true
    }

    /// Recua `edit` até o último '\n' não-comprometido (ou até `write`).
    ///
    /// Retorna quantos bytes foram apagados.
    pub fn kill_line(&mut self) -> usize {
        let mut erased = 0;
        while self.edit != self.write && self.buf[self.edit.wrapping_sub(1) % N] != b'\n' {
            self.edit = self.edit.wrapping_sub(1);
            erased += 1;
        }
        erased
    }

    /// Consome o próximo byte comprometido
    pub fn pop(&mut self) -> Option<u8> {
        if !self.has_committed() {
            return None;
        }
        let byte = self.buf[self.read % N];
        self.read = self.read.wrapping_add(1);
        Some(byte)
    }

    /// Devolve o último byte consumido (usado para preservar o EOT)
    pub fn unpop(&mut self) {
        self.read = self.read.wrapping_sub(1);
    }
}

impl<const N: usize> Default for InputRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
