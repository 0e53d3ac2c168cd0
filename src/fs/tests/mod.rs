//! # Testes do DevFS
//!
//! Registro e abertura de dispositivos com os drivers reais:
//!
//! | Arquivo    | Cobertura                                       |
//! |------------|-------------------------------------------------|
//! | `devfs.rs` | DeviceNumber, DeviceTable, flags de abertura    |

#![cfg(test)]

pub mod devfs;

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::drivers::input::{KeyboardDevice, NoHooks};
use crate::drivers::video::{FramebufferDevice, Raster};
use crate::fs::devfs::DeviceTable;
use crate::sync::waitqueue::fake;

/// Tabela com `/dev/fb` (64×32) e `/dev/uart_keyboard`
pub fn create_test_table() -> (DeviceTable, Arc<FramebufferDevice>, Arc<KeyboardDevice>) {
    let fb = Arc::new(FramebufferDevice::new(Raster::heap(64, 32)));
    let kbd = Arc::new(KeyboardDevice::new(fake::scheduler(), Box::new(NoHooks)));

    let mut table = DeviceTable::new();
    table.register(crate::config::FB_DEVICE, fb.clone()).unwrap();
    table.register(crate::config::KB_DEVICE, kbd.clone()).unwrap();
    (table, fb, kbd)
}
