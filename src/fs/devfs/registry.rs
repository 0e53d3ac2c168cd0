//! Device Table - superfície de registro de dispositivos
//!
//! O roteamento por device number e o lock de inode são do VFS (externo).
//! Esta tabela existe para que a inicialização dos drivers publique seus
//! dispositivos e para que o `open` por caminho saiba a quem entregar.

use alloc::sync::Arc;
use alloc::vec::Vec;

use super::device::{Device, DeviceNumber, OpenFlags};
use crate::sys::error::{SysError, SysResult};

/// Número máximo de dispositivos
const MAX_DEVICES: usize = 16;

// Entrada no registro de dispositivos
struct DeviceEntry {
    path: &'static str,
    device: Arc<dyn Device>,
}

/// Registro de dispositivos
#[derive(Default)]
pub struct DeviceTable {
    devices: Vec<DeviceEntry>,
}

impl DeviceTable {
    /// Cria um novo registro
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Registra um dispositivo sob `path`
    pub fn register(&mut self, path: &'static str, device: Arc<dyn Device>) -> SysResult<()> {
        if self.devices.len() >= MAX_DEVICES {
            crate::kerror!("(DEV) Tabela de dispositivos cheia");
            return Err(SysError::OutOfMemory);
        }
        let number = device.device_number();
        if self.lookup_by_dev(number).is_some() || self.lookup(path).is_some() {
            crate::kwarn!("(DEV) Dispositivo ja registrado, major=", number.major);
            return Err(SysError::InvalidArgument);
        }

        crate::kinfo!("(DEV) Registrado major=", number.major);
        self.devices.push(DeviceEntry { path, device });
        Ok(())
    }

    /// Busca um dispositivo por caminho
    pub fn lookup(&self, path: &str) -> Option<Arc<dyn Device>> {
        self.devices
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.device.clone())
    }

    /// Busca um dispositivo por device number
    pub fn lookup_by_dev(&self, dev: DeviceNumber) -> Option<Arc<dyn Device>> {
        self.devices
            .iter()
            .find(|e| e.device.device_number() == dev)
            .map(|e| e.device.clone())
    }

    /// Abre um dispositivo, validando a direção de acesso pedida
    pub fn open(&self, path: &str, flags: OpenFlags) -> SysResult<Arc<dyn Device>> {
        let device = self.lookup(path).ok_or(SysError::NotFound)?;
        let wanted = flags & (OpenFlags::READ | OpenFlags::WRITE);
        if !device.access().contains(wanted) {
            crate::kwarn!("(DEV) Acesso nao suportado, flags=", flags.bits());
            return Err(SysError::NotImplemented);
        }
        Ok(device)
    }

    /// Número de dispositivos registrados
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
