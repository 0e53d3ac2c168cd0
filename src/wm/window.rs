//! Janela: buffer privado de pixels + cursor de texto + processo
//!
//! O buffer só é escrito pelo rasterizador de texto da própria janela e
//! pela borda; o compositor apenas o lê na hora de compor.

use alloc::vec;
use alloc::vec::Vec;

use super::config::{Palette, WindowSpec};
use super::rect::Rect;
use crate::config::{BORDER_WIDTH, FONT_HEIGHT, FONT_WIDTH, GLYPH_MAX_CODE};
use crate::drivers::video::{font, Rgb565};
use crate::sys::{Fd, Pid};

/// Pontas de pipe e processo de uma janela
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plumbing {
    pub pid: Pid,
    /// Ponta de escrita do stdin do filho
    pub stdin: Fd,
    /// Ponta de leitura do stdout/stderr do filho
    pub stdout: Fd,
}

pub struct Window {
    /// Posição e tamanho na tela
    rect: Rect,
    fg: Rgb565,
    bg: Rgb565,
    border: Rgb565,
    buffer: Vec<Rgb565>,
    cursor_x: usize,
    cursor_y: usize,
    /// Área alterada desde o último render (coordenadas da janela)
    damage: Option<Rect>,
    plumbing: Option<Plumbing>,
}

impl Window {
    /// Janela vazia, buffer na cor de fundo
    pub fn new(spec: &WindowSpec, palette: &Palette) -> Self {
        Self {
            rect: Rect::new(spec.x, spec.y, spec.width, spec.height),
            fg: palette.fg,
            bg: palette.bg,
            border: palette.unfocused_border,
            buffer: vec![palette.bg; spec.width * spec.height],
            cursor_x: 0,
            cursor_y: 0,
            damage: None,
            plumbing: None,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rect.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rect.h
    }

    pub fn background(&self) -> Rgb565 {
        self.bg
    }

    /// Cursor de texto em células (coluna, linha)
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn plumbing(&self) -> Option<Plumbing> {
        self.plumbing
    }

    pub fn attach(&mut self, plumbing: Plumbing) {
        self.plumbing = Some(plumbing);
    }

    pub fn pid(&self) -> Option<Pid> {
        self.plumbing.map(|p| p.pid)
    }

    /// Pixel do buffer, em coordenadas da janela
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x >= self.rect.w || y >= self.rect.h {
            return None;
        }
        self.buffer.get(y * self.rect.w + x).copied()
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, color: Rgb565) {
        if x < self.rect.w && y < self.rect.h {
            self.buffer[y * self.rect.w + x] = color;
        }
    }

    /// Contorno de `BORDER_WIDTH` pixels dentro do buffer
    pub fn draw_border(&mut self, color: Rgb565) {
        self.border = color;
        let (w, h) = (self.rect.w, self.rect.h);
        for i in 0..BORDER_WIDTH.min(h) {
            for x in 0..w {
                self.set(x, i, color);
                self.set(x, h - 1 - i, color);
            }
        }
        for i in 0..BORDER_WIDTH.min(w) {
            for y in 0..h {
                self.set(i, y, color);
                self.set(w - 1 - i, y, color);
            }
        }
    }

    pub fn border(&self) -> Rgb565 {
        self.border
    }

    /// Rasteriza um byte da saída do filho no cursor de texto.
    ///
    /// Retorna a célula desenhada (coluna, linha), se houve glifo.
    pub fn put_char(&mut self, c: u8) -> Option<(usize, usize)> {
        if c == b'\n' {
            self.cursor_x = 0;
            self.cursor_y += 1;
            return None;
        }

        if (self.cursor_x + 1) * FONT_WIDTH > self.rect.w {
            self.cursor_x = 0;
            self.cursor_y += 1;
        }
        if (self.cursor_y + 1) * FONT_HEIGHT > self.rect.h {
            self.cursor_y = 0;
        }

        if c > GLYPH_MAX_CODE {
            return None;
        }

        let cell = (self.cursor_x, self.cursor_y);
        let (px, py) = (cell.0 * FONT_WIDTH, cell.1 * FONT_HEIGHT);
        let fg = self.fg;
        font::for_each_pixel(c, |dx, dy| self.set(px + dx, py + dy, fg));

        self.cursor_x += 1;
        self.mark_damage(Rect::new(px, py, FONT_WIDTH, FONT_HEIGHT));
        Some(cell)
    }

    /// Rasteriza vários bytes e restaura a borda sobre eventuais glifos
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b);
        }
        if self.damage.is_some() {
            let border = self.border;
            self.draw_border(border);
        }
    }

    fn mark_damage(&mut self, local: Rect) {
        let bounds = Rect::new(0, 0, self.rect.w, self.rect.h);
        let Some(local) = local.intersect(&bounds) else {
            return;
        };
        self.damage = Some(match self.damage {
            Some(d) => d.union(&local),
            None => local,
        });
    }

    /// Consome a área alterada, em coordenadas de tela
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take().map(|d| d.offset(self.rect.x, self.rect.y))
    }

    pub fn has_damage(&self) -> bool {
        self.damage.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn window(w: usize, h: usize) -> Window {
        Window::new(&WindowSpec::new("sh", 10, 20).with_size(w, h), &Palette::default())
    }

    fn glyph_pixels(c: u8) -> Vec<(usize, usize)> {
        let mut px = Vec::new();
        font::for_each_pixel(c, |x, y| px.push((x, y)));
        px
    }

    #[test]
    fn test_new_window_is_background() {
        let w = window(16, 16);
        assert!((0..16).all(|y| (0..16).all(|x| w.pixel(x, y) == Some(Rgb565::BLUE))));
        assert_eq!(w.pixel(16, 0), None);
    }

    #[test]
    fn test_char_then_newline() {
        let mut w = window(400, 300);
        assert_eq!(w.put_char(b'A'), Some((0, 0)));
        assert_eq!(w.cursor(), (1, 0));
        assert_eq!(w.put_char(b'\n'), None);
        assert_eq!(w.cursor(), (0, 1));
        for (x, y) in glyph_pixels(b'A') {
            assert_eq!(w.pixel(x, y), Some(Rgb565::WHITE));
        }
    }

    #[test]
    fn test_wraps_at_width_and_height() {
        // 2 colunas x 2 linhas de células
        let mut w = window(FONT_WIDTH * 2, FONT_HEIGHT * 2);
        w.put_char(b'a');
        w.put_char(b'b');
        assert_eq!(w.put_char(b'c'), Some((0, 1)));
        w.put_char(b'd');
        // Passou da última linha: volta ao topo
        assert_eq!(w.put_char(b'e'), Some((0, 0)));
    }

    #[test]
    fn test_high_codes_are_skipped() {
        let mut w = window(64, 32);
        assert_eq!(w.put_char(200), None);
        assert_eq!(w.cursor(), (0, 0));
        assert!(!w.has_damage());
    }

    #[test]
    fn test_damage_is_in_screen_coordinates() {
        let mut w = window(64, 32);
        w.put_char(b'x');
        w.put_char(b'y');
        assert_eq!(w.take_damage(), Some(Rect::new(10, 20, 16, 16)));
        assert_eq!(w.take_damage(), None);
    }

    #[test]
    fn test_border_survives_text() {
        let mut w = window(64, 32);
        w.draw_border(Rgb565::RED);
        w.write_bytes(b"####");
        assert!((0..64).all(|x| w.pixel(x, 0) == Some(Rgb565::RED)));
        assert!((0..32).all(|y| w.pixel(0, y) == Some(Rgb565::RED)));
        assert_eq!(w.pixel(3, 1), Some(Rgb565::BLUE));
    }
}
