//! Driver de Console de Vídeo.
//!
//! Texto cru do kernel sobre o raster: um cursor em pixels, quebra de linha
//! automática e rolagem de tela (scroll-region). É a ÚNICA forma de
//! recuperar linhas de texto: quando a próxima linha passaria da altura do
//! frame, todo o raster sobe uma célula e a última faixa é pintada de preto.
//!
//! O cursor deste console é independente do cursor das janelas do
//! compositor.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use super::color::Rgb565;
use super::framebuffer::FramebufferDevice;
use super::raster::Raster;
use super::record::GlyphRecord;
use crate::config::{FONT_HEIGHT, FONT_WIDTH, KEY_EOT};
use crate::drivers::input::{InputHooks, ProcessDump};

/// Raster + cursor de texto do console.
pub struct Screen {
    raster: Raster,
    cursor_x: usize,
    cursor_y: usize,
    /// Cor da faixa exposta pelo scroll e das células apagadas
    fill: Rgb565,
}

impl Screen {
    pub fn new(raster: Raster) -> Self {
        Self {
            raster,
            cursor_x: 0,
            cursor_y: 0,
            fill: Rgb565::BLACK,
        }
    }

    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[inline]
    pub fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    /// Posição do cursor de texto, em pixels
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Aplica um registro do protocolo de escrita (fora do frame = descartado)
    pub fn apply(&mut self, rec: &GlyphRecord) {
        let (x, y) = (rec.x as usize, rec.y as usize);
        if x >= self.raster.width() || y >= self.raster.height() {
            crate::ktrace!("(FB) Registro fora do frame, x=", x);
            return;
        }
        if rec.ch != 0 {
            self.raster.put_glyph(rec.ch, x, y, rec.color);
        } else {
            self.raster.put_pixel(x, y, rec.color);
        }
    }

    /// Escreve um caractere no cursor do console
    pub fn put_char_colored(&mut self, c: u8, color: Rgb565) {
        if c == b'\n' {
            self.newline();
            return;
        }

        if c != b' ' {
            self.raster.put_glyph(c, self.cursor_x, self.cursor_y, color);
        }
        self.cursor_x += FONT_WIDTH;
        if self.cursor_x >= self.raster.width() {
            self.newline();
        }
    }

    /// Caractere em branco
    #[inline]
    pub fn put_char(&mut self, c: u8) {
        self.put_char_colored(c, Rgb565::WHITE);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b);
        }
    }

    /// Backspace visual: recua uma célula e apaga o glifo
    pub fn erase_cell(&mut self) {
        if self.cursor_x < FONT_WIDTH {
            return;
        }
        self.cursor_x -= FONT_WIDTH;
        self.raster
            .fill_rect(self.cursor_x, self.cursor_y, FONT_WIDTH, FONT_HEIGHT, self.fill);
    }

    fn newline(&mut self) {
        self.cursor_x = 0;
        self.cursor_y += FONT_HEIGHT;
        if self.cursor_y >= self.raster.height() {
            self.raster.scroll_up(FONT_HEIGHT, self.fill);
            self.cursor_y = self.raster.height().saturating_sub(FONT_HEIGHT);
        }
    }
}

/// Adaptador `fmt::Write` para o console (`write!` no boot e em panics)
pub struct TextConsole<'a> {
    screen: &'a mut Screen,
    color: Rgb565,
}

impl<'a> TextConsole<'a> {
    pub fn new(screen: &'a mut Screen, color: Rgb565) -> Self {
        Self { screen, color }
    }
}

impl fmt::Write for TextConsole<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.screen.put_char_colored(byte, self.color);
        }
        Ok(())
    }
}

// =============================================================================
// ECO DO TECLADO NO CONSOLE
// =============================================================================

/// Ganchos da disciplina de linha que ecoam no console do framebuffer.
pub struct ConsoleEcho {
    fb: Arc<FramebufferDevice>,
    procs: Option<Box<dyn ProcessDump>>,
}

impl ConsoleEcho {
    pub fn new(fb: Arc<FramebufferDevice>) -> Self {
        Self { fb, procs: None }
    }

    pub fn with_process_dump(mut self, procs: Box<dyn ProcessDump>) -> Self {
        self.procs = Some(procs);
        self
    }
}

impl InputHooks for ConsoleEcho {
    fn echo(&self, byte: u8) {
        let mut screen = self.fb.lock();
        if byte == KEY_EOT {
            screen.write_bytes(b"^D");
        } else {
            screen.put_char(byte);
        }
    }

    fn erase(&self) {
        self.fb.lock().erase_cell();
    }

    fn process_dump(&self) {
        match &self.procs {
            Some(procs) => procs.dump(),
            None => crate::kwarn!("(CON) Sem tabela de processos para ^P"),
        }
    }
}
