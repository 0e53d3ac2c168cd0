//! Raster linear de pixels de 16 bits
//!
//! Dois backings:
//! - `Heap`: `Vec<u16>` (host, testes, buffers fora da tela)
//! - `Mmio`: memória de vídeo negociada no boot, acessada SEMPRE com
//!   leituras/escritas voláteis
//!
//! Toda escrita recorta em `[0,width) x [0,height)`; coordenadas fora
//! são descartadas em silêncio (recorte rotineiro da composição).

use alloc::vec;
use alloc::vec::Vec;
use core::ptr::NonNull;
use volatile::VolatilePtr;

use super::color::Rgb565;
use super::font;

/// Região MMIO do framebuffer
struct MmioRegion {
    base: NonNull<u16>,
    len: usize,
}

// SAFETY: a região pertence exclusivamente ao Raster que a contém; o
// acesso concorrente é serializado pelo lock do dispositivo.
unsafe impl Send for MmioRegion {}
unsafe impl Sync for MmioRegion {}

impl MmioRegion {
    #[inline]
    fn cell(&self, idx: usize) -> VolatilePtr<'_, u16> {
        debug_assert!(idx < self.len);
        // SAFETY: idx < len, validado pelo chamador; base..base+len foi
        // concedido pelo boot e permanece mapeado.
        unsafe { VolatilePtr::new(NonNull::new_unchecked(self.base.as_ptr().add(idx))) }
    }
}

enum PixelStore {
    Heap(Vec<u16>),
    Mmio(MmioRegion),
}

/// Backing store do framebuffer
pub struct Raster {
    width: usize,
    height: usize,
    /// Distância entre linhas, em pixels
    pitch: usize,
    store: PixelStore,
}

impl Raster {
    /// Raster em memória comum, preenchido de preto
    pub fn heap(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pitch: width,
            store: PixelStore::Heap(vec![0; width * height]),
        }
    }

    /// Raster sobre memória de vídeo.
    ///
    /// # Safety
    ///
    /// `base` deve apontar para `pitch * height` pixels mapeados, graváveis
    /// e não usados por mais ninguém enquanto o Raster existir.
    pub unsafe fn mmio(base: NonNull<u16>, width: usize, height: usize, pitch: usize) -> Self {
        Self {
            width,
            height,
            pitch,
            store: PixelStore::Mmio(MmioRegion {
                base,
                len: pitch * height,
            }),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.pitch + x)
    }

    #[inline]
    fn load(&self, idx: usize) -> u16 {
        match &self.store {
            PixelStore::Heap(buf) => buf[idx],
            PixelStore::Mmio(region) => region.cell(idx).read(),
        }
    }

    #[inline]
    fn store(&mut self, idx: usize, value: u16) {
        match &mut self.store {
            PixelStore::Heap(buf) => buf[idx] = value,
            PixelStore::Mmio(region) => region.cell(idx).write(value),
        }
    }

    /// Escreve um pixel; fora dos limites é no-op
    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        if let Some(idx) = self.index(x, y) {
            self.store(idx, color.raw());
        }
    }

    /// Lê um pixel de volta
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        self.index(x, y).map(|idx| Rgb565(self.load(idx)))
    }

    /// Preenche retângulo (recortado)
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb565) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                let idx = py * self.pitch + px;
                self.store(idx, color.raw());
            }
        }
    }

    /// Limpa a tela inteira
    pub fn clear(&mut self, color: Rgb565) {
        let (w, h) = (self.width, self.height);
        self.fill_rect(0, 0, w, h, color);
    }

    /// Desenha o glifo `code` na célula ancorada em (x, y)
    pub fn put_glyph(&mut self, code: u8, x: usize, y: usize, color: Rgb565) {
        font::for_each_pixel(code, |dx, dy| {
            self.put_pixel(x + dx, y + dy, color);
        });
    }

    /// Sobe o conteúdo `rows` linhas de pixel e pinta a faixa exposta.
    pub fn scroll_up(&mut self, rows: usize, fill: Rgb565) {
        if rows >= self.height {
            self.clear(fill);
            return;
        }

        let keep = (self.height - rows) * self.pitch;
        let src = rows * self.pitch;
        match &mut self.store {
            PixelStore::Heap(buf) => buf.copy_within(src..src + keep, 0),
            // Cópia para frente: destino sempre abaixo da origem
            PixelStore::Mmio(region) => {
                for idx in 0..keep {
                    let v = region.cell(src + idx).read();
                    region.cell(idx).write(v);
                }
            }
        }

        let (w, h) = (self.width, self.height);
        self.fill_rect(0, h - rows, w, rows, fill);
    }

    /// Hash FNV-1a da área visível (diagnóstico e testes)
    pub fn checksum(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.load(y * self.pitch + x);
                for b in v.to_le_bytes() {
                    hash ^= b as u64;
                    hash = hash.wrapping_mul(FNV_PRIME);
                }
            }
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FONT_HEIGHT;

    #[test]
    fn test_out_of_bounds_pixel_is_dropped() {
        let mut r = Raster::heap(32, 16);
        r.put_pixel(3, 3, Rgb565::RED);
        let before = r.checksum();

        r.put_pixel(32, 0, Rgb565::WHITE);
        r.put_pixel(0, 16, Rgb565::WHITE);
        r.put_pixel(usize::MAX, usize::MAX, Rgb565::WHITE);
        assert_eq!(r.checksum(), before);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut r = Raster::heap(10, 10);
        r.fill_rect(8, 8, 5, 5, Rgb565::GREEN);
        assert_eq!(r.pixel(9, 9), Some(Rgb565::GREEN));
        assert_eq!(r.pixel(7, 9), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_scroll_moves_rows_and_fills_bottom() {
        let (w, h) = (16, FONT_HEIGHT * 3);
        let mut r = Raster::heap(w, h);
        for y in 0..h {
            for x in 0..w {
                r.put_pixel(x, y, Rgb565((y * 31 + x) as u16));
            }
        }
        let before: Vec<u16> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| r.pixel(x, y).unwrap().raw())
            .collect();

        r.scroll_up(FONT_HEIGHT, Rgb565::BLUE);

        for y in 0..h - FONT_HEIGHT {
            for x in 0..w {
                assert_eq!(r.pixel(x, y).unwrap().raw(), before[(y + FONT_HEIGHT) * w + x]);
            }
        }
        for y in h - FONT_HEIGHT..h {
            for x in 0..w {
                assert_eq!(r.pixel(x, y), Some(Rgb565::BLUE));
            }
        }
    }

    #[test]
    fn test_mmio_store_matches_heap() {
        let (w, h, pitch) = (8, 4, 12);
        let mut backing = vec![0u16; pitch * h];
        let base = NonNull::new(backing.as_mut_ptr()).unwrap();
        let mut mmio = unsafe { Raster::mmio(base, w, h, pitch) };
        let mut heap = Raster::heap(w, h);

        for r in [&mut mmio, &mut heap] {
            r.fill_rect(1, 1, 3, 2, Rgb565::YELLOW);
            r.put_pixel(7, 3, Rgb565::RED);
            r.scroll_up(1, Rgb565::WHITE);
        }
        assert_eq!(mmio.checksum(), heap.checksum());
        drop(mmio);
        // O padding além da largura nunca é tocado pelo fill
        assert_eq!(backing[pitch - 1], 0);
    }

    #[test]
    fn test_glyph_is_clipped_at_edge() {
        let mut r = Raster::heap(12, 12);
        r.put_glyph(b'#', 8, 8, Rgb565::WHITE);
        assert!((8..12).any(|x| r.pixel(x, 8) == Some(Rgb565::WHITE)));
    }
}
