//! Device - Trait e tipos base para dispositivos

use bitflags::bitflags;
use core::fmt;

use crate::mm::UserCopy;
use crate::sync::TaskContext;
use crate::sys::error::{SysError, SysResult};

/// Tipo de dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Dispositivo de caractere (char device)
    Character,
    /// Dispositivo de bloco (block device)
    Block,
}

/// Número major/minor de dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceNumber {
    /// Major number (identifica o driver)
    pub major: u32,
    /// Minor number (identifica o dispositivo específico)
    pub minor: u32,
}

impl DeviceNumber {
    /// Cria um novo device number
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Converte para u64 (formato Linux: major << 20 | minor)
    pub const fn as_u64(&self) -> u64 {
        ((self.major as u64) << 20) | (self.minor as u64)
    }

    /// Cria a partir de u64
    pub const fn from_u64(dev: u64) -> Self {
        Self {
            major: (dev >> 20) as u32,
            minor: (dev & 0xFFFFF) as u32,
        }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

bitflags! {
    /// Flags de abertura / capacidades de um dispositivo
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Leitura
        const READ = 1 << 0;
        /// Escrita
        const WRITE = 1 << 1;
        /// Leituras não devem bloquear
        const NONBLOCK = 1 << 2;
    }
}

/// Trait para dispositivos
pub trait Device: Send + Sync {
    /// Retorna o nome do dispositivo
    fn name(&self) -> &str;

    /// Retorna o tipo de dispositivo
    fn device_type(&self) -> DeviceType {
        DeviceType::Character
    }

    /// Retorna o device number
    fn device_number(&self) -> DeviceNumber;

    /// Direções de acesso suportadas (READ/WRITE)
    fn access(&self) -> OpenFlags;

    /// Lê do dispositivo, podendo bloquear o contexto `task`
    fn read(&self, _task: &dyn TaskContext, _buf: &mut [u8]) -> SysResult<usize> {
        Err(SysError::NotImplemented)
    }

    /// Leitura que nunca bloqueia (`OpenFlags::NONBLOCK`): `WouldBlock`
    /// quando não há dados
    fn read_nonblocking(&self, _buf: &mut [u8]) -> SysResult<usize> {
        Err(SysError::NotImplemented)
    }

    /// Escreve no dispositivo a partir da memória do chamador
    fn write(&self, _src: &dyn UserCopy) -> SysResult<usize> {
        Err(SysError::NotImplemented)
    }
}
