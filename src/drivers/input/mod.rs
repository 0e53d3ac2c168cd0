//! # Input - Teclado serial e disciplina de linha
//!
//! | Módulo        | Papel                                           |
//! |---------------|-------------------------------------------------|
//! | `ring`        | Anel de 128 bytes com cursores read/write/edit  |
//! | `line`        | Edição de linha, commit e leitura bloqueante    |
//! | `keyboard`    | Dispositivo `/dev/uart_keyboard`                |

pub mod keyboard;
pub mod line;
pub mod ring;

pub use keyboard::KeyboardDevice;
pub use line::{ByteSource, InputHooks, LineDiscipline, NoHooks, ProcessDump};
pub use ring::InputRing;
