//! Registro do protocolo de escrita do `/dev/fb`
//!
//! Layout fixo, little-endian, 32 bytes:
//!
//! | Offset | Tipo | Campo                                  |
//! |--------|------|----------------------------------------|
//! | 0      | u32  | x                                      |
//! | 4      | u32  | y                                      |
//! | 8      | u16  | cor (RGB565)                           |
//! | 10     | u8   | caractere (0 = pixel simples)          |
//! | 11     | u8   | reservado                              |
//! | 12     | u32  | largura (reservado, blit futuro)       |
//! | 16     | u32  | altura (reservado, blit futuro)        |
//! | 20     | u32  | padding                                |
//! | 24     | u64  | ponteiro de buffer (reservado, zero)   |

use super::color::Rgb565;

/// Um pedido de pixel ou de glifo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphRecord {
    pub x: u32,
    pub y: u32,
    pub color: Rgb565,
    pub ch: u8,
    pub width: u32,
    pub height: u32,
    pub buffer: u64,
}

#[inline]
fn le_u32(b: &[u8; GlyphRecord::SIZE], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

impl GlyphRecord {
    /// Tamanho no fio
    pub const SIZE: usize = 32;

    /// Pixel simples
    pub const fn pixel(x: u32, y: u32, color: Rgb565) -> Self {
        Self {
            x,
            y,
            color,
            ch: 0,
            width: 0,
            height: 0,
            buffer: 0,
        }
    }

    /// Glifo na célula ancorada em (x, y)
    pub const fn glyph(ch: u8, x: u32, y: u32, color: Rgb565) -> Self {
        Self {
            x,
            y,
            color,
            ch,
            width: 0,
            height: 0,
            buffer: 0,
        }
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.x.to_le_bytes());
        out[4..8].copy_from_slice(&self.y.to_le_bytes());
        out[8..10].copy_from_slice(&self.color.raw().to_le_bytes());
        out[10] = self.ch;
        out[12..16].copy_from_slice(&self.width.to_le_bytes());
        out[16..20].copy_from_slice(&self.height.to_le_bytes());
        out[24..32].copy_from_slice(&self.buffer.to_le_bytes());
        out
    }

    pub fn decode(raw: &[u8; Self::SIZE]) -> Self {
        let mut buffer = [0u8; 8];
        buffer.copy_from_slice(&raw[24..32]);
        Self {
            x: le_u32(raw, 0),
            y: le_u32(raw, 4),
            color: Rgb565(u16::from_le_bytes([raw[8], raw[9]])),
            ch: raw[10],
            width: le_u32(raw, 12),
            height: le_u32(raw, 16),
            buffer: u64::from_le_bytes(buffer),
        }
    }
}
