//! Testes para DevFS (tabela de dispositivos)

use alloc::format;
use alloc::sync::Arc;

use super::create_test_table;
use crate::config::{FB_DEVICE, FRAMEBUFFER_MAJOR, KB_DEVICE, UART_KEYBOARD_MAJOR};
use crate::drivers::video::{GlyphRecord, Rgb565};
use crate::fs::devfs::{Device, DeviceNumber, DeviceTable, DeviceType, OpenFlags};
use crate::mm::KernelSlice;
use crate::sync::waitqueue::fake::FakeTask;
use crate::sys::error::{SysError, SysResult};

/// Dispositivo mudo para encher a tabela
struct Dummy(u32);

impl Device for Dummy {
    fn name(&self) -> &str {
        "dummy"
    }

    fn device_number(&self) -> DeviceNumber {
        DeviceNumber::new(200, self.0)
    }

    fn access(&self) -> OpenFlags {
        OpenFlags::READ
    }

    fn read_nonblocking(&self, _buf: &mut [u8]) -> SysResult<usize> {
        Ok(0)
    }
}

#[test]
fn test_device_number_creation() {
    let dev = DeviceNumber::new(FRAMEBUFFER_MAJOR, 0);
    assert_eq!(dev.major, 2);
    assert_eq!(dev.minor, 0);
    assert_eq!(format!("{}", dev), "2:0");
}

#[test]
fn test_device_number_to_u64() {
    let dev = DeviceNumber::new(UART_KEYBOARD_MAJOR, 7);
    // Formato Linux: major << 20 | minor
    assert_eq!(dev.as_u64(), (3u64 << 20) | 7);
    assert_eq!(DeviceNumber::from_u64(dev.as_u64()), dev);
}

#[test]
fn test_drivers_register_under_their_paths() {
    let (table, _, _) = create_test_table();
    assert_eq!(table.len(), 2);

    let fb = table.lookup(FB_DEVICE).unwrap();
    assert_eq!(fb.name(), "fb");
    assert_eq!(fb.device_type(), DeviceType::Character);
    assert_eq!(fb.device_number(), DeviceNumber::new(FRAMEBUFFER_MAJOR, 0));

    let kbd = table
        .lookup_by_dev(DeviceNumber::new(UART_KEYBOARD_MAJOR, 0))
        .unwrap();
    assert_eq!(kbd.name(), "uart_keyboard");
    assert!(table.lookup("/dev/null").is_none());
}

#[test]
fn test_duplicate_registration_rejected() {
    let (mut table, fb, _) = create_test_table();
    assert_eq!(table.register("/dev/fb1", fb), Err(SysError::InvalidArgument));
    assert_eq!(
        table.register(FB_DEVICE, Arc::new(Dummy(0))),
        Err(SysError::InvalidArgument)
    );
    assert_eq!(table.len(), 2);
}

#[test]
fn test_table_capacity() {
    const PATHS: [&str; 17] = [
        "/dev/d0", "/dev/d1", "/dev/d2", "/dev/d3", "/dev/d4", "/dev/d5", "/dev/d6", "/dev/d7",
        "/dev/d8", "/dev/d9", "/dev/d10", "/dev/d11", "/dev/d12", "/dev/d13", "/dev/d14",
        "/dev/d15", "/dev/d16",
    ];
    let mut table = DeviceTable::new();
    let mut registered = 0;
    for (minor, path) in PATHS.iter().enumerate() {
        if table.register(path, Arc::new(Dummy(minor as u32))).is_err() {
            break;
        }
        registered += 1;
    }
    assert!(registered < PATHS.len());
    assert_eq!(
        table.register("/dev/extra", Arc::new(Dummy(99))),
        Err(SysError::OutOfMemory)
    );
}

#[test]
fn test_open_checks_access() {
    let (table, _, _) = create_test_table();

    assert!(table.open(FB_DEVICE, OpenFlags::WRITE).is_ok());
    assert!(table.open(KB_DEVICE, OpenFlags::READ | OpenFlags::NONBLOCK).is_ok());
    assert_eq!(
        table.open(KB_DEVICE, OpenFlags::WRITE).err(),
        Some(SysError::NotImplemented)
    );
    assert_eq!(
        table.open("/dev/missing", OpenFlags::READ).err(),
        Some(SysError::NotFound)
    );
}

#[test]
fn test_write_through_opened_framebuffer() {
    let (table, fb, _) = create_test_table();
    let dev = table.open(FB_DEVICE, OpenFlags::WRITE).unwrap();

    let record = GlyphRecord::pixel(3, 4, Rgb565::RED).encode();
    assert_eq!(dev.write(&KernelSlice(&record)), Ok(GlyphRecord::SIZE));
    assert_eq!(fb.lock().raster().pixel(3, 4), Some(Rgb565::RED));
}

#[test]
fn test_read_through_opened_keyboard() {
    let (table, _, kbd) = create_test_table();
    let dev = table.open(KB_DEVICE, OpenFlags::READ).unwrap();

    let mut buf = [0u8; 8];
    assert_eq!(dev.read_nonblocking(&mut buf), Err(SysError::WouldBlock));

    for &b in b"hi\n" {
        kbd.feed(b);
    }
    let task = FakeTask::default();
    assert_eq!(dev.read(&task, &mut buf), Ok(3));
    assert_eq!(&buf[..3], b"hi\n");
}
