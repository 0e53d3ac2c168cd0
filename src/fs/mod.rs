//! # File System
//!
//! Apenas o DevFS: o VFS genérico é um colaborador externo.

pub mod devfs;

#[cfg(test)]
mod tests;
