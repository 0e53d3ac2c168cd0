//! Laço principal do compositor
//!
//! Um tick: `POLL_INPUT → ROUTE_TO_FOCUSED → DRAIN_OUTPUTS → REAP →
//! RENDER_DIRTY`. Single-thread e cooperativo: nenhum passo bloqueia.
//! Um tick ocioso pode dormir `idle_sleep_ticks` (0 = busy-poll).

use alloc::vec::Vec;

use super::config::{CompositorConfig, WindowSpec};
use super::mux::{self, KeyAction};
use super::render::{self, FbWriter};
use super::stack::WindowStack;
use super::sys::Sys;
use crate::config::{FB_DEVICE, KB_DEVICE, KEYBOARD_CHUNK};
use crate::fs::devfs::OpenFlags;
use crate::sys::error::{SysError, SysResult};
use crate::sys::Fd;

/// Contagem do que um tick fez
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub keys: usize,
    pub drained: usize,
    pub reaped: usize,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.keys == 0 && self.drained == 0 && self.reaped == 0
    }
}

pub struct Compositor<S: Sys> {
    sys: S,
    config: CompositorConfig,
    stack: WindowStack,
    fb: Fd,
    kb: Fd,
}

impl<S: Sys> Compositor<S> {
    /// Abre `/dev/fb` e `/dev/uart_keyboard`. A ausência de qualquer um é
    /// fatal para o compositor.
    pub fn new(mut sys: S, config: CompositorConfig) -> SysResult<Self> {
        config.validate()?;

        let fb = sys.open(FB_DEVICE, OpenFlags::WRITE).inspect_err(|_| {
            crate::kerror!("(WM) Nao foi possivel abrir /dev/fb");
        })?;
        let kb = sys
            .open(KB_DEVICE, OpenFlags::READ | OpenFlags::NONBLOCK)
            .inspect_err(|_| {
                crate::kerror!("(WM) Nao foi possivel abrir /dev/uart_keyboard");
            })?;

        Ok(Self {
            sys,
            config,
            stack: WindowStack::new(),
            fb,
            kb,
        })
    }

    pub fn stack(&self) -> &WindowStack {
        &self.stack
    }

    pub fn sys(&self) -> &S {
        &self.sys
    }

    pub fn sys_mut(&mut self) -> &mut S {
        &mut self.sys
    }

    /// Cria as janelas configuradas e desenha tudo.
    ///
    /// Falha ao criar uma janela é registrada e ignorada; falha de escrita
    /// no framebuffer não.
    pub fn start(&mut self) -> SysResult<()> {
        for spec in &self.config.windows {
            if mux::spawn_window(&mut self.sys, &mut self.stack, spec, &self.config.palette).is_err() {
                crate::kwarn!("(WM) Janela nao criada, x=", spec.x);
            }
        }
        self.refresh_borders();
        self.redraw_all()
    }

    /// Cria uma janela extra em tempo de execução
    pub fn spawn(&mut self, spec: &WindowSpec) -> SysResult<usize> {
        let slot = mux::spawn_window(&mut self.sys, &mut self.stack, spec, &self.config.palette)?;
        self.refresh_borders();
        self.redraw_all()?;
        Ok(slot)
    }

    /// Um passo do laço
    pub fn tick(&mut self) -> SysResult<TickReport> {
        let mut report = TickReport::default();

        // POLL_INPUT + ROUTE_TO_FOCUSED
        let mut keys = [0u8; KEYBOARD_CHUNK];
        match self.sys.read_nonblocking(self.kb, &mut keys) {
            Ok(n) => {
                for &byte in &keys[..n] {
                    self.handle_key(byte)?;
                }
                report.keys = n;
            }
            Err(SysError::WouldBlock) => {}
            Err(_e) => crate::kwarn!("(WM) Falha ao ler teclado, erro=", _e.as_isize()),
        }

        // DRAIN_OUTPUTS
        let drained = mux::drain_outputs(&mut self.sys, &mut self.stack);
        report.drained = drained.bytes;

        // REAP
        let mut dead = mux::reap(&mut self.sys, &self.stack);
        for slot in drained.closed {
            if !dead.contains(&slot) {
                dead.push(slot);
            }
        }
        report.reaped = dead.len();

        // RENDER_DIRTY
        self.render_dirty()?;
        if !dead.is_empty() {
            self.close_windows(&dead)?;
        }

        if report.is_idle() && self.config.idle_sleep_ticks > 0 {
            self.sys.sleep(self.config.idle_sleep_ticks);
        }
        Ok(report)
    }

    /// Roda para sempre; só retorna com um erro fatal
    pub fn run(&mut self) -> SysError {
        if let Err(e) = self.start() {
            return e;
        }
        loop {
            if let Err(e) = self.tick() {
                crate::kerror!("(WM) Erro fatal no laco, erro=", e.as_isize());
                return e;
            }
        }
    }

    /// Leva o slot ao topo e redesenha. Reselecionar o topo não faz nada.
    pub fn focus(&mut self, slot: usize) -> SysResult<()> {
        if !self.stack.focus(slot) {
            return Ok(());
        }
        crate::kdebug!("(WM) Foco no slot=", slot);
        self.refresh_borders();
        self.redraw_all()
    }

    fn handle_key(&mut self, byte: u8) -> SysResult<()> {
        match mux::route_key(&mut self.sys, &self.stack, byte) {
            KeyAction::Focus(slot) => self.focus(slot),
            KeyAction::Swallowed | KeyAction::Forwarded | KeyAction::Dropped => Ok(()),
        }
    }

    /// Borda de destaque só na janela do topo
    fn refresh_borders(&mut self) {
        let focused = self.stack.focused();
        let palette = self.config.palette;
        for (slot, window) in self.stack.slots_mut() {
            let color = if Some(slot) == focused {
                palette.focused_border
            } else {
                palette.unfocused_border
            };
            window.draw_border(color);
        }
    }

    pub fn redraw_all(&mut self) -> SysResult<()> {
        for (_, window) in self.stack.slots_mut() {
            window.take_damage();
        }
        let mut sink = FbWriter::new(&mut self.sys, self.fb);
        render::redraw_all(&self.stack, &mut sink)
    }

    /// Render incremental: só a área alterada de cada janela
    fn render_dirty(&mut self) -> SysResult<()> {
        let mut dirty = Vec::new();
        for (slot, window) in self.stack.slots_mut() {
            if let Some(area) = window.take_damage() {
                dirty.push((slot, area));
            }
        }

        let mut sink = FbWriter::new(&mut self.sys, self.fb);
        for (slot, area) in dirty {
            render::render_window(&self.stack, slot, Some(area), &mut sink)?;
        }
        Ok(())
    }

    /// Fecha janelas mortas, repinta a área com o desktop e recompõe
    fn close_windows(&mut self, dead: &[usize]) -> SysResult<()> {
        let mut vacated = Vec::new();
        for &slot in dead {
            if let Some(window) = mux::teardown(&mut self.sys, &mut self.stack, slot) {
                vacated.push(window.rect());
            }
        }

        self.refresh_borders();
        let desktop = self.config.desktop;
        let mut sink = FbWriter::new(&mut self.sys, self.fb);
        for rect in vacated {
            render::paint_rect(rect, desktop, &mut sink)?;
        }
        render::redraw_all(&self.stack, &mut sink)
    }
}
