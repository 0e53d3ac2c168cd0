//! Bring-up da pilha de display
//!
//! Ordem: negociar o framebuffer com o hardware → console → teclado →
//! registro dos dispositivos → banner. Qualquer falha de vídeo é fatal: sem
//! framebuffer não há como seguir, e o sistema entra no laço de diagnóstico
//! (LED piscando rápido).

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use core::ptr::NonNull;

use crate::config::{FB_DEVICE, FRAME_DEPTH, FRAME_HEIGHT, FRAME_WIDTH, KB_DEVICE};
use crate::drivers::input::KeyboardDevice;
use crate::drivers::video::{ConsoleEcho, FramebufferDevice, Raster, Rgb565, Screen};
use crate::fs::devfs::DeviceTable;
use crate::sync::Scheduler;
use crate::sys::error::SysError;

/// Falhas irrecuperáveis do bring-up de vídeo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootFault {
    /// O hardware não devolveu endereço de framebuffer
    NoFramebuffer,
    /// Geometria devolvida inutilizável (zero, pitch curto, profundidade)
    BadGeometry,
    /// O protocolo de negociação recusou o pedido
    ProbeRejected,
    /// Registro dos dispositivos falhou
    DeviceSetup(SysError),
}

impl BootFault {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoFramebuffer => "sem endereco de framebuffer",
            Self::BadGeometry => "geometria invalida",
            Self::ProbeRejected => "negociacao recusada",
            Self::DeviceSetup(_) => "falha ao registrar dispositivos",
        }
    }
}

impl fmt::Display for BootFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SysError> for BootFault {
    fn from(err: SysError) -> Self {
        Self::DeviceSetup(err)
    }
}

// =============================================================================
// NEGOCIAÇÃO COM O HARDWARE
// =============================================================================

/// Resposta do hardware à negociação de vídeo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferGrant {
    /// Endereço (já mapeado) da memória de vídeo
    pub base: usize,
    pub width: u32,
    pub height: u32,
    /// Bytes por linha; 0 = linhas contíguas
    pub pitch: u32,
    pub depth: u32,
}

/// Protocolo de negociação do framebuffer (mailbox da GPU).
///
/// # Safety
///
/// Um `Ok(grant)` promete que `grant.base` aponta para `pitch * height`
/// bytes mapeados, graváveis e exclusivos do driver de vídeo.
pub unsafe trait DisplayProbe {
    fn negotiate(&mut self, width: u32, height: u32, depth: u32)
        -> Result<FramebufferGrant, BootFault>;
}

/// LED de status usado no diagnóstico fatal
pub trait StatusLed {
    fn set(&mut self, on: bool);
    /// Espera ocupada de `cycles` iterações
    fn delay(&mut self, cycles: u32);
}

/// Meio período do pisca "tudo certo"
pub const OK_BLINK_CYCLES: u32 = 1_000_000;

/// Meio período do pisca "falha" (10x mais rápido)
pub const NOT_OK_BLINK_CYCLES: u32 = 100_000;

/// Um ciclo completo apagado → aceso
pub fn blink(led: &mut dyn StatusLed, half_period: u32) {
    led.set(false);
    led.delay(half_period);
    led.set(true);
    led.delay(half_period);
}

/// Laço de diagnóstico: nunca retorna
pub fn fatal_loop(led: &mut dyn StatusLed, _fault: BootFault) -> ! {
    crate::kerror!("(BOOT) Falha fatal de video:");
    crate::kerror!(_fault.as_str());
    loop {
        blink(led, NOT_OK_BLINK_CYCLES);
    }
}

/// Negocia a geometria padrão e monta o raster MMIO
pub fn init_video(probe: &mut dyn DisplayProbe) -> Result<FramebufferDevice, BootFault> {
    let grant = probe
        .negotiate(FRAME_WIDTH as u32, FRAME_HEIGHT as u32, FRAME_DEPTH)
        .inspect_err(|_| crate::kerror!("(BOOT) Negociacao de video recusada"))?;

    let base = NonNull::new(grant.base as *mut u16).ok_or(BootFault::NoFramebuffer)?;
    if grant.width == 0 || grant.height == 0 || grant.depth != FRAME_DEPTH {
        return Err(BootFault::BadGeometry);
    }
    if grant.base % core::mem::align_of::<u16>() != 0 {
        return Err(BootFault::BadGeometry);
    }

    let width = grant.width as usize;
    let height = grant.height as usize;
    let pitch = match grant.pitch as usize {
        0 => width,
        bytes if bytes % 2 == 0 && bytes / 2 >= width => bytes / 2,
        _ => return Err(BootFault::BadGeometry),
    };

    crate::kinfo!("(BOOT) Framebuffer em ", grant.base);
    crate::klog!("(BOOT) Geometria ", width, " x ", height);
    crate::knl!();

    // SAFETY: contrato de `DisplayProbe`; geometria validada acima.
    let raster = unsafe { Raster::mmio(base, width, height, pitch) };
    Ok(FramebufferDevice::new(raster))
}

// =============================================================================
// BANNER
// =============================================================================

const BANNER: [&str; 9] = [
    "                                     ",
    "  V     V III TTTTT RRRR    AAA  L   ",
    "  V     V  I    T   R   R  A   A L   ",
    "  V     V  I    T   RRRR   AAAAA L   ",
    "   V   V   I    T   R  R   A   A L   ",
    "    V V    I    T   R   R  A   A L   ",
    "     V    III   T   R   R  A   A LLLL",
    "                                     ",
    "                                     ",
];

fn banner_color(c: u8) -> Rgb565 {
    match c {
        b'V' | b'I' => Rgb565::YELLOW,
        b'T' | b'R' => Rgb565::BLUE,
        b'A' | b'L' => Rgb565::RED,
        _ => Rgb565::BLACK,
    }
}

/// Logo colorido no console de texto
pub fn draw_banner(screen: &mut Screen) {
    for line in BANNER {
        for &c in line.as_bytes() {
            screen.put_char_colored(c, banner_color(c));
        }
        screen.put_char(b'\n');
    }
}

// =============================================================================
// PILHA COMPLETA
// =============================================================================

/// Dispositivos da pilha de display, já registrados
pub struct DisplayStack {
    pub fb: Arc<FramebufferDevice>,
    pub keyboard: Arc<KeyboardDevice>,
    pub devices: DeviceTable,
}

/// Sobe vídeo e teclado e publica `/dev/fb` e `/dev/uart_keyboard`
pub fn bring_up(
    probe: &mut dyn DisplayProbe,
    sched: Arc<dyn Scheduler>,
) -> Result<DisplayStack, BootFault> {
    let fb = Arc::new(init_video(probe)?);
    let keyboard = Arc::new(KeyboardDevice::new(
        sched,
        Box::new(ConsoleEcho::new(fb.clone())),
    ));

    let mut devices = DeviceTable::new();
    devices.register(FB_DEVICE, fb.clone())?;
    devices.register(KB_DEVICE, keyboard.clone())?;

    draw_banner(&mut fb.lock());

    run_self_test();

    crate::kok!("(BOOT) Pilha de display pronta");
    Ok(DisplayStack {
        fb,
        keyboard,
        devices,
    })
}

#[cfg(feature = "self_test")]
fn run_self_test() {
    if !super::selftest::run().ok() {
        crate::kwarn!("(BOOT) Self-test com falhas, seguindo mesmo assim");
    }
}

#[cfg(not(feature = "self_test"))]
fn run_self_test() {}

/// `bring_up` ou laço de diagnóstico
pub fn bring_up_or_halt(
    probe: &mut dyn DisplayProbe,
    sched: Arc<dyn Scheduler>,
    led: &mut dyn StatusLed,
) -> DisplayStack {
    match bring_up(probe, sched) {
        Ok(stack) => stack,
        Err(fault) => fatal_loop(led, fault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::devfs::OpenFlags;
    use crate::sync::waitqueue::fake;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Probe de host: "memória de vídeo" é um Vec vazado
    struct HostProbe {
        grant: Option<FramebufferGrant>,
    }

    impl HostProbe {
        fn with_memory(width: u32, height: u32) -> Self {
            let mem: &'static mut [u16] =
                Vec::leak(vec![0u16; (width * height) as usize]);
            Self {
                grant: Some(FramebufferGrant {
                    base: mem.as_mut_ptr() as usize,
                    width,
                    height,
                    pitch: width * 2,
                    depth: FRAME_DEPTH,
                }),
            }
        }
    }

    unsafe impl DisplayProbe for HostProbe {
        fn negotiate(&mut self, _w: u32, _h: u32, _d: u32) -> Result<FramebufferGrant, BootFault> {
            self.grant.ok_or(BootFault::ProbeRejected)
        }
    }

    #[derive(Default)]
    struct Led {
        toggles: Vec<bool>,
        waited: u64,
    }

    impl StatusLed for Led {
        fn set(&mut self, on: bool) {
            self.toggles.push(on);
        }
        fn delay(&mut self, cycles: u32) {
            self.waited += cycles as u64;
        }
    }

    #[test]
    fn test_init_video_builds_mmio_raster() {
        let mut probe = HostProbe::with_memory(64, 48);
        let fb = init_video(&mut probe).unwrap();
        assert_eq!(fb.geometry(), (64, 48));
    }

    #[test]
    fn test_zero_address_is_fatal() {
        let mut probe = HostProbe::with_memory(8, 8);
        if let Some(g) = probe.grant.as_mut() {
            g.base = 0;
        }
        assert_eq!(init_video(&mut probe).err(), Some(BootFault::NoFramebuffer));
    }

    #[test]
    fn test_bad_geometry_is_fatal() {
        let mut probe = HostProbe::with_memory(8, 8);
        if let Some(g) = probe.grant.as_mut() {
            g.pitch = 6;
        }
        assert_eq!(init_video(&mut probe).err(), Some(BootFault::BadGeometry));

        let mut probe = HostProbe::with_memory(8, 8);
        if let Some(g) = probe.grant.as_mut() {
            g.depth = 32;
        }
        assert_eq!(init_video(&mut probe).err(), Some(BootFault::BadGeometry));
    }

    #[test]
    fn test_rejected_probe() {
        let mut probe = HostProbe { grant: None };
        assert_eq!(init_video(&mut probe).err(), Some(BootFault::ProbeRejected));
    }

    #[test]
    fn test_not_ok_blink_is_fast() {
        let mut led = Led::default();
        blink(&mut led, NOT_OK_BLINK_CYCLES);
        assert_eq!(led.toggles, [false, true]);
        assert_eq!(led.waited, 2 * NOT_OK_BLINK_CYCLES as u64);
        assert!(NOT_OK_BLINK_CYCLES < OK_BLINK_CYCLES);
    }

    #[test]
    fn test_bring_up_registers_devices_and_draws_banner() {
        let mut probe = HostProbe::with_memory(320, 240);
        let stack = bring_up(&mut probe, fake::scheduler()).unwrap();

        assert_eq!(stack.devices.len(), 2);
        assert!(stack.devices.open(FB_DEVICE, OpenFlags::WRITE).is_ok());
        assert!(stack.devices.open(KB_DEVICE, OpenFlags::READ).is_ok());

        // Banner: 9 linhas de texto já consumidas pelo console
        let (_, y) = stack.fb.lock().cursor();
        assert_eq!(y, 9 * crate::config::FONT_HEIGHT);
        assert_ne!(stack.fb.lock().raster().checksum(), Raster::heap(320, 240).checksum());
    }
}
