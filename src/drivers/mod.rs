//! # Camada de Drivers
//!
//! Drivers residentes no kernel da pilha de display.
//!
//! | Driver   | Arquivo      | Papel                                        |
//! |----------|--------------|----------------------------------------------|
//! | Serial   | `serial.rs`  | Sink dos logs de diagnóstico                 |
//! | Input    | `input/`     | Teclado serial + disciplina de linha         |
//! | Video    | `video/`     | Raster, console de texto e `/dev/fb`         |
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         Compositor (userspace, wm/)         │
//! └─────────────────────────────────────────────┘
//!          ↑ read(/dev/uart_keyboard)  ↓ write(/dev/fb)
//! ┌─────────────────────────────────────────────┐
//! │  input: LineDiscipline   video: Screen      │
//! │     ↑ UART IRQ (externo)    ↓ MMIO          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod serial;
pub mod video;
