//! # WM - Compositor de janelas
//!
//! Processo de userspace que multiplexa vários filhos no framebuffer:
//! cada janela tem um buffer privado, um cursor de texto e um processo
//! ligado por dois pipes. A janela do topo da pilha é a focada e recebe
//! todo o teclado, exceto as teclas de foco ('1'..).
//!
//! | Módulo       | Papel                                              |
//! |--------------|----------------------------------------------------|
//! | `config`     | Layout e cores (`CompositorConfig`)                |
//! | `rect`       | Retângulos e oclusão por subtração                 |
//! | `window`     | Buffer, rasterizador de texto, borda               |
//! | `stack`      | Arena de slots + ordem Z                           |
//! | `sys`        | Syscalls consumidas (trait `Sys`)                  |
//! | `render`     | `FrameSink`, `FbWriter`, composição                |
//! | `mux`        | Spawn, drenagem, roteamento de teclas, reaping     |
//! | `compositor` | O laço de ticks                                    |

pub mod compositor;
pub mod config;
pub mod mux;
pub mod rect;
pub mod render;
pub mod stack;
pub mod sys;
pub mod window;

#[cfg(test)]
mod tests;

pub use compositor::{Compositor, TickReport};
pub use config::{CompositorConfig, Palette, WindowSpec};
pub use rect::{Rect, RectSet};
pub use render::{FbWriter, FrameSink};
pub use stack::WindowStack;
pub use sys::{ForkResult, Sys};
pub use window::Window;
