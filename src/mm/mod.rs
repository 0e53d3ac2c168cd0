//! # Memória
//!
//! A pilha de display não gerencia memória; consome apenas a cópia de
//! dados do espaço de usuário para o kernel.

pub mod uaccess;

pub use uaccess::{KernelSlice, UserCopy};
