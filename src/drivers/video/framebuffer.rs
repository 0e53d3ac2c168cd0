//! Framebuffer (`/dev/fb`)
//!
//! Dispositivo de caractere somente-escrita. Cada `write` é uma sequência
//! de `GlyphRecord`s de 32 bytes, aplicados em ordem sob o lock do
//! dispositivo (o mesmo lock que serializa o texto do console).
//!
//! # Falhas
//!
//! - Menos de um registro inteiro → `InvalidArgument`
//! - Bytes excedentes no fim → ignorados (retorno menor que o pedido)
//! - Falha de cópia da memória do chamador → `BadAddress`, sem NENHUM
//!   registro desta chamada aplicado

use alloc::vec;
use spin::{Mutex, MutexGuard};

use super::console::Screen;
use super::raster::Raster;
use super::record::GlyphRecord;
use crate::config::FRAMEBUFFER_MAJOR;
use crate::fs::devfs::{Device, DeviceNumber, OpenFlags};
use crate::mm::UserCopy;
use crate::sync::TaskContext;
use crate::sys::error::{SysError, SysResult};

/// Estado do driver de vídeo: um por sistema
pub struct FramebufferDevice {
    screen: Mutex<Screen>,
}

impl FramebufferDevice {
    pub fn new(raster: Raster) -> Self {
        crate::kinfo!("(FB) Dispositivo pronto, largura=", raster.width());
        Self {
            screen: Mutex::new(Screen::new(raster)),
        }
    }

    /// Acesso exclusivo ao raster e ao console de texto
    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock()
    }

    /// Dimensões do raster
    pub fn geometry(&self) -> (usize, usize) {
        let screen = self.screen.lock();
        (screen.raster().width(), screen.raster().height())
    }
}

impl Device for FramebufferDevice {
    fn name(&self) -> &str {
        "fb"
    }

    fn device_number(&self) -> DeviceNumber {
        DeviceNumber::new(FRAMEBUFFER_MAJOR, 0)
    }

    fn access(&self) -> OpenFlags {
        OpenFlags::READ | OpenFlags::WRITE
    }

    /// Não há protocolo de leitura de volta
    fn read(&self, _task: &dyn TaskContext, _buf: &mut [u8]) -> SysResult<usize> {
        Ok(0)
    }

    fn read_nonblocking(&self, _buf: &mut [u8]) -> SysResult<usize> {
        Ok(0)
    }

    fn write(&self, src: &dyn UserCopy) -> SysResult<usize> {
        let count = src.len() / GlyphRecord::SIZE;
        if count == 0 {
            crate::kwarn!("(FB) Escrita menor que um registro, len=", src.len());
            return Err(SysError::InvalidArgument);
        }

        let consumed = count * GlyphRecord::SIZE;
        let mut raw = vec![0u8; consumed];
        src.copy_in(0, &mut raw).inspect_err(|_| {
            crate::kerror!("(FB) Falha ao copiar registros do chamador");
        })?;

        let mut screen = self.screen.lock();
        for chunk in raw.chunks_exact(GlyphRecord::SIZE) {
            let mut bytes = [0u8; GlyphRecord::SIZE];
            bytes.copy_from_slice(chunk);
            screen.apply(&GlyphRecord::decode(&bytes));
        }

        Ok(consumed)
    }
}
