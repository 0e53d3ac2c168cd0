//! Acesso a memória de usuário (copyin).
//!
//! O espaço de endereçamento do chamador pertence ao subsistema de memória
//! virtual (colaborador externo). Os drivers só enxergam esta interface:
//! "copie N bytes a partir do offset X do buffer do chamador".

use crate::sys::error::{SysError, SysResult};

/// Buffer de origem no espaço do chamador.
pub trait UserCopy {
    /// Tamanho total do buffer em bytes
    fn len(&self) -> usize;

    /// Copia `dst.len()` bytes a partir de `offset`.
    ///
    /// Falha com `BadAddress` se qualquer parte da faixa não estiver mapeada.
    fn copy_in(&self, offset: usize, dst: &mut [u8]) -> SysResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Buffer do próprio kernel (chamadores internos): sempre legível.
#[derive(Clone, Copy)]
pub struct KernelSlice<'a>(pub &'a [u8]);

impl UserCopy for KernelSlice<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn copy_in(&self, offset: usize, dst: &mut [u8]) -> SysResult<()> {
        let end = offset.checked_add(dst.len()).ok_or(SysError::BadAddress)?;
        let src = self.0.get(offset..end).ok_or(SysError::BadAddress)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_slice_copy_in() {
        let src = KernelSlice(&[1, 2, 3, 4, 5]);
        let mut dst = [0u8; 2];
        src.copy_in(3, &mut dst).unwrap();
        assert_eq!(dst, [4, 5]);
        assert_eq!(src.copy_in(4, &mut dst), Err(SysError::BadAddress));
    }
}
