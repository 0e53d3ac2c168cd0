//! Renderizador de Fontes (Bitmap).
//!
//! Glifos ASCII 8x8 (`font8x8`) esticados verticalmente para a célula 8x16:
//! cada linha do bitmap ocupa duas linhas de pixel, das quais só as
//! primeiras `GLYPH_ROWS` são desenhadas. Bit 0 é o pixel mais à esquerda.

use font8x8::legacy::BASIC_LEGACY;

use crate::config::{FONT_WIDTH, GLYPH_MAX_CODE, GLYPH_ROWS};

/// Bitmap 8x8 do código, ou `None` acima de 127
#[inline]
pub fn bitmap(code: u8) -> Option<&'static [u8; 8]> {
    if code > GLYPH_MAX_CODE {
        return None;
    }
    BASIC_LEGACY.get(code as usize)
}

/// O glifo tem pixels a desenhar (espaço e controles são pulados)
#[inline]
pub fn is_drawable(code: u8) -> bool {
    code > b' ' && code < 0x7f
}

/// Visita cada pixel aceso do glifo, em coordenadas relativas à célula.
///
/// Códigos fora do intervalo imprimível não visitam nada.
pub fn for_each_pixel(code: u8, mut plot: impl FnMut(usize, usize)) {
    if !is_drawable(code) {
        return;
    }
    let Some(rows) = bitmap(code) else {
        return;
    };

    for dy in 0..GLYPH_ROWS {
        let bits = rows[dy / 2];
        for dx in 0..FONT_WIDTH {
            if (bits >> dx) & 1 != 0 {
                plot(dx, dy);
            }
        }
    }
}
