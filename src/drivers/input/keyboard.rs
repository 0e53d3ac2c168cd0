//! Teclado serial (`/dev/uart_keyboard`)
//!
//! Dispositivo de caractere somente-leitura: cada `read` entrega no máximo
//! uma linha editada pela `LineDiscipline`. O transporte (UART) chama
//! `interrupt()` a cada IRQ de recepção.

use alloc::boxed::Box;
use alloc::sync::Arc;

use super::line::{ByteSource, InputHooks, LineDiscipline};
use crate::config::UART_KEYBOARD_MAJOR;
use crate::fs::devfs::{Device, DeviceNumber, OpenFlags};
use crate::mm::UserCopy;
use crate::sync::{Scheduler, TaskContext};
use crate::sys::error::{SysError, SysResult};

/// Teclado serial com disciplina de linha
pub struct KeyboardDevice {
    line: LineDiscipline,
}

impl KeyboardDevice {
    pub fn new(sched: Arc<dyn Scheduler>, hooks: Box<dyn InputHooks>) -> Self {
        crate::kinfo!("(KBD) Teclado serial pronto, buffer=", crate::config::INPUT_BUF);
        Self {
            line: LineDiscipline::new(sched, hooks),
        }
    }

    /// Handler de IRQ da UART
    pub fn interrupt(&self, src: &mut dyn ByteSource) -> usize {
        self.line.interrupt(src)
    }

    /// Entrada de um byte isolado (polling ou testes)
    pub fn feed(&self, byte: u8) {
        self.line.feed(byte);
    }

    pub fn line(&self) -> &LineDiscipline {
        &self.line
    }
}

impl Device for KeyboardDevice {
    fn name(&self) -> &str {
        "uart_keyboard"
    }

    fn device_number(&self) -> DeviceNumber {
        DeviceNumber::new(UART_KEYBOARD_MAJOR, 0)
    }

    fn access(&self) -> OpenFlags {
        OpenFlags::READ
    }

    fn read(&self, task: &dyn TaskContext, buf: &mut [u8]) -> SysResult<usize> {
        self.line.read_line(task, buf)
    }

    fn read_nonblocking(&self, buf: &mut [u8]) -> SysResult<usize> {
        self.line.try_read_line(buf)
    }

    fn write(&self, _src: &dyn UserCopy) -> SysResult<usize> {
        crate::kwarn!("(KBD) Escrita no teclado rejeitada");
        Err(SysError::NotImplemented)
    }
}
