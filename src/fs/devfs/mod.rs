//! DevFS - Device Filesystem
//!
//! Nós de dispositivo (/dev) da pilha de display.
//!
//! # Dispositivos
//!
//! | Caminho              | Major | Acesso  | Driver                       |
//! |----------------------|-------|---------|------------------------------|
//! | `/dev/fb`            | 2     | RW      | `drivers::video::FramebufferDevice` |
//! | `/dev/uart_keyboard` | 3     | R       | `drivers::input::KeyboardDevice`    |
//!
//! # Módulos
//!
//! - `device` - Trait Device e tipos base
//! - `registry` - Tabela de registro

pub mod device;
pub mod registry;

// Re-exports públicos
pub use device::{Device, DeviceNumber, DeviceType, OpenFlags};
pub use registry::DeviceTable;
