//! Composição: buffers de janela → framebuffer
//!
//! Para cada retângulo visível de uma janela, cada pixel é relido do buffer
//! privado e reemitido pelo `FrameSink`. Não há cache de tela: a oclusão é
//! recalculada a cada render pela posição atual na ordem Z.

use alloc::vec::Vec;

use super::rect::Rect;
use super::stack::WindowStack;
use super::sys::Sys;
use crate::drivers::video::{GlyphRecord, Raster, Rgb565};
use crate::sys::error::{SysError, SysResult};
use crate::sys::Fd;

/// Destino dos pixels compostos
pub trait FrameSink {
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb565) -> SysResult<()>;

    /// Fim de uma faixa contígua de pixels
    fn flush(&mut self) -> SysResult<()>;
}

/// Raster local (testes, composição fora da tela)
impl FrameSink for Raster {
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb565) -> SysResult<()> {
        Raster::put_pixel(self, x, y, color);
        Ok(())
    }

    fn flush(&mut self) -> SysResult<()> {
        Ok(())
    }
}

/// Registros por `write` no máximo
const BATCH_RECORDS: usize = 256;

/// Escreve pixels em `/dev/fb`, agrupando registros por faixa
pub struct FbWriter<'a> {
    sys: &'a mut dyn Sys,
    fd: Fd,
    batch: Vec<u8>,
}

impl<'a> FbWriter<'a> {
    pub fn new(sys: &'a mut dyn Sys, fd: Fd) -> Self {
        Self {
            sys,
            fd,
            batch: Vec::with_capacity(BATCH_RECORDS * GlyphRecord::SIZE),
        }
    }

    /// Qualquer coisa além de uma escrita completa é fatal para o compositor
    fn write_out(&mut self) -> SysResult<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let n = self.sys.write(self.fd, &self.batch)?;
        if n != self.batch.len() {
            crate::kerror!("(WM) Escrita curta no framebuffer=", n);
            return Err(SysError::IoError);
        }
        self.batch.clear();
        Ok(())
    }
}

impl FrameSink for FbWriter<'_> {
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb565) -> SysResult<()> {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return Ok(());
        };
        self.batch
            .extend_from_slice(&GlyphRecord::pixel(x, y, color).encode());
        if self.batch.len() >= BATCH_RECORDS * GlyphRecord::SIZE {
            self.write_out()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> SysResult<()> {
        self.write_out()
    }
}

/// Reemite a parte visível de uma janela, opcionalmente limitada a `clip`
pub fn render_window(
    stack: &WindowStack,
    slot: usize,
    clip: Option<Rect>,
    sink: &mut dyn FrameSink,
) -> SysResult<()> {
    let Some(window) = stack.get(slot) else {
        return Ok(());
    };
    let origin = window.rect();

    for visible in stack.visible_rects(slot).iter() {
        let area = match clip {
            Some(c) => match visible.intersect(&c) {
                Some(a) => a,
                None => continue,
            },
            None => *visible,
        };

        for sy in area.y..area.bottom() {
            for sx in area.x..area.right() {
                if let Some(color) = window.pixel(sx - origin.x, sy - origin.y) {
                    sink.put_pixel(sx, sy, color)?;
                }
            }
            sink.flush()?;
        }
    }
    Ok(())
}

/// Recompõe todas as janelas, de baixo para cima
pub fn redraw_all(stack: &WindowStack, sink: &mut dyn FrameSink) -> SysResult<()> {
    for &slot in stack.order() {
        render_window(stack, slot, None, sink)?;
    }
    Ok(())
}

/// Pinta um retângulo liso (área desocupada por uma janela que morreu)
pub fn paint_rect(rect: Rect, color: Rgb565, sink: &mut dyn FrameSink) -> SysResult<()> {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            sink.put_pixel(x, y, color)?;
        }
        sink.flush()?;
    }
    Ok(())
}
