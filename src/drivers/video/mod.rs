//! # Video Driver - Framebuffer de 16 bits
//!
//! | Módulo        | Papel                                               |
//! |---------------|-----------------------------------------------------|
//! | `color`       | `Rgb565`                                            |
//! | `font`        | Glifos 8x16 (bitmaps `font8x8` esticados)           |
//! | `raster`      | Backing store: heap ou MMIO volátil, recorte        |
//! | `console`     | Cursor de texto do kernel, scroll, eco do teclado   |
//! | `record`      | Registro de 32 bytes do protocolo de escrita        |
//! | `framebuffer` | Dispositivo `/dev/fb`                               |
//!
//! ## Arquitetura
//!
//! ```text
//!  write(/dev/fb) ──► GlyphRecord ──┐
//!                                   ├──► Screen (lock) ──► Raster
//!  kinfo!/eco do teclado ──► console┘
//! ```

pub mod color;
pub mod console;
pub mod font;
pub mod framebuffer;
pub mod raster;
pub mod record;

pub use color::Rgb565;
pub use console::{ConsoleEcho, Screen, TextConsole};
pub use framebuffer::FramebufferDevice;
pub use raster::Raster;
pub use record::GlyphRecord;
