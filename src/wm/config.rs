//! Configuração de runtime do compositor
//!
//! O `Default` reproduz o layout de referência: dois `sh` lado a lado,
//! o segundo (criado por último) no topo.

use alloc::vec;
use alloc::vec::Vec;

use crate::config::{MAX_WINDOWS, WIN_HEIGHT, WIN_WIDTH};
use crate::drivers::video::Rgb565;
use crate::sys::error::{SysError, SysResult};

/// Uma janela a criar no start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Programa executado no processo filho
    pub program: &'static str,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl WindowSpec {
    /// Janela de tamanho padrão em (x, y)
    pub const fn new(program: &'static str, x: usize, y: usize) -> Self {
        Self {
            program,
            x,
            y,
            width: WIN_WIDTH,
            height: WIN_HEIGHT,
        }
    }

    pub const fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Cores de uma janela
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Rgb565,
    pub bg: Rgb565,
    pub focused_border: Rgb565,
    pub unfocused_border: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fg: Rgb565::WHITE,
            bg: Rgb565::BLUE,
            focused_border: Rgb565::WHITE,
            unfocused_border: Rgb565::BLACK,
        }
    }
}

/// Configuração do compositor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositorConfig {
    pub windows: Vec<WindowSpec>,
    pub palette: Palette,
    /// Cor da área sem janela (repintada quando uma janela morre)
    pub desktop: Rgb565,
    /// Ticks de `Sys::sleep` após um tick ocioso (0 = busy-poll)
    pub idle_sleep_ticks: u32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            windows: vec![WindowSpec::new("sh", 50, 50), WindowSpec::new("sh", 500, 50)],
            palette: Palette::default(),
            desktop: Rgb565::BLACK,
            idle_sleep_ticks: 0,
        }
    }
}

impl CompositorConfig {
    /// Sem janelas iniciais
    pub fn empty() -> Self {
        Self {
            windows: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_window(mut self, spec: WindowSpec) -> Self {
        self.windows.push(spec);
        self
    }

    pub fn with_colors(mut self, fg: Rgb565, bg: Rgb565) -> Self {
        self.palette.fg = fg;
        self.palette.bg = bg;
        self
    }

    pub fn with_borders(mut self, focused: Rgb565, unfocused: Rgb565) -> Self {
        self.palette.focused_border = focused;
        self.palette.unfocused_border = unfocused;
        self
    }

    pub fn with_desktop(mut self, desktop: Rgb565) -> Self {
        self.desktop = desktop;
        self
    }

    pub fn with_idle_sleep(mut self, ticks: u32) -> Self {
        self.idle_sleep_ticks = ticks;
        self
    }

    /// Layout utilizável: até `MAX_WINDOWS` janelas, nenhuma vazia
    pub fn validate(&self) -> SysResult<()> {
        if self.windows.len() > MAX_WINDOWS {
            crate::kerror!("(WM) Janelas demais na configuracao=", self.windows.len());
            return Err(SysError::InvalidArgument);
        }
        if self.windows.iter().any(|w| w.width == 0 || w.height == 0) {
            crate::kerror!("(WM) Janela com tamanho zero");
            return Err(SysError::InvalidArgument);
        }
        Ok(())
    }
}
