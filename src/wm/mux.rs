//! Multiplexador de processos: um filho por janela, ligado por dois pipes
//!
//! ```text
//!   teclado ──► compositor ──stdin pipe──► filho
//!   tela   ◄── compositor ◄─stdout pipe── filho (stdout + stderr)
//! ```
//!
//! Todas as leituras são não-bloqueantes: uma janela parada ou um teclado
//! ocioso nunca travam as outras.

use alloc::vec::Vec;

use super::config::{Palette, WindowSpec};
use super::stack::WindowStack;
use super::sys::{ForkResult, Sys};
use super::window::{Plumbing, Window};
use crate::config::{DRAIN_CHUNK, FOCUS_KEYS};
use crate::sys::error::{SysError, SysResult};
use crate::sys::Fd;

/// Cria a janela e o processo filho; a nova janela fica no topo.
///
/// Falha de pipe/fork libera tudo que já foi criado e devolve o erro.
/// Falha de `exec` termina o filho, que é colhido depois pelo `reap`.
pub fn spawn_window(
    sys: &mut dyn Sys,
    stack: &mut WindowStack,
    spec: &WindowSpec,
    palette: &Palette,
) -> SysResult<usize> {
    if stack.free_slot().is_none() {
        crate::kwarn!("(MUX) Sem slot livre para nova janela");
        return Err(SysError::TooManyProcesses);
    }
    let window = Window::new(spec, palette);

    let (in_r, in_w) = sys.pipe()?;
    let (out_r, out_w) = match sys.pipe() {
        Ok(ends) => ends,
        Err(e) => {
            close_all(sys, &[in_r, in_w]);
            return Err(e);
        }
    };

    let pid = match sys.fork() {
        Ok(ForkResult::Parent(pid)) => pid,
        Ok(ForkResult::Child) => run_child(sys, spec.program, (in_r, in_w), (out_r, out_w)),
        Err(e) => {
            crate::kerror!("(MUX) fork falhou");
            close_all(sys, &[in_r, in_w, out_r, out_w]);
            return Err(e);
        }
    };

    close_all(sys, &[in_r, out_w]);

    let mut window = window;
    window.attach(Plumbing {
        pid,
        stdin: in_w,
        stdout: out_r,
    });
    let slot = stack.insert(window)?;
    crate::kinfo!("(MUX) Janela criada, pid=", pid.as_u32());
    Ok(slot)
}

/// Lado do filho: religa stdin/stdout/stderr nos pipes e troca de imagem
fn run_child(sys: &mut dyn Sys, program: &str, input: (Fd, Fd), output: (Fd, Fd)) -> ! {
    if wire_child(sys, input, output).is_err() {
        sys.exit(1);
    }

    let _err = sys.exec(program, &[program]);
    crate::kerror!("(MUX) exec falhou, erro=", _err.as_isize());
    sys.exit(1)
}

fn wire_child(sys: &mut dyn Sys, input: (Fd, Fd), output: (Fd, Fd)) -> SysResult<()> {
    let (in_r, in_w) = input;
    let (out_r, out_w) = output;

    sys.close(in_w)?;
    sys.dup2(in_r, Fd::STDIN)?;
    sys.close(in_r)?;

    sys.close(out_r)?;
    sys.dup2(out_w, Fd::STDOUT)?;
    sys.dup2(out_w, Fd::STDERR)?;
    sys.close(out_w)
}

fn close_all(sys: &mut dyn Sys, fds: &[Fd]) {
    for &fd in fds {
        if sys.close(fd).is_err() {
            crate::kwarn!("(MUX) close falhou, fd=", fd.as_u32());
        }
    }
}

/// O que aconteceu com uma tecla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Tecla de foco: o slot pedido
    Focus(usize),
    /// Tecla de foco para slot vazio: engolida
    Swallowed,
    /// Enviada ao stdin da janela focada
    Forwarded,
    /// Sem janela focada ou pipe fechado
    Dropped,
}

/// Só '1' e '2' são reservadas (slots 0 e 1); qualquer outro byte,
/// inclusive os demais dígitos, segue para a janela focada.
pub fn focus_key(byte: u8) -> Option<usize> {
    let slot = byte.checked_sub(b'1')? as usize;
    (slot < FOCUS_KEYS).then_some(slot)
}

/// Encaminha um byte do teclado
pub fn route_key(sys: &mut dyn Sys, stack: &WindowStack, byte: u8) -> KeyAction {
    if let Some(slot) = focus_key(byte) {
        return match stack.get(slot) {
            Some(_) => KeyAction::Focus(slot),
            None => KeyAction::Swallowed,
        };
    }

    let Some(plumbing) = stack
        .focused()
        .and_then(|slot| stack.get(slot))
        .and_then(|w| w.plumbing())
    else {
        return KeyAction::Dropped;
    };

    match sys.write(plumbing.stdin, &[byte]) {
        Ok(1) => KeyAction::Forwarded,
        _ => {
            crate::kdebug!("(MUX) stdin fechado, pid=", plumbing.pid.as_u32());
            KeyAction::Dropped
        }
    }
}

/// Resultado de uma passada de drenagem
#[derive(Debug, Default)]
pub struct Drained {
    /// Bytes rasterizados
    pub bytes: usize,
    /// Janelas cujo stdout chegou ao fim
    pub closed: Vec<usize>,
}

/// Drena até `DRAIN_CHUNK` bytes do stdout de cada janela
pub fn drain_outputs(sys: &mut dyn Sys, stack: &mut WindowStack) -> Drained {
    let mut drained = Drained::default();
    let mut buf = [0u8; DRAIN_CHUNK];

    for (slot, window) in stack.slots_mut() {
        let Some(plumbing) = window.plumbing() else {
            continue;
        };
        match sys.read_nonblocking(plumbing.stdout, &mut buf) {
            Ok(0) => drained.closed.push(slot),
            Ok(n) => {
                window.write_bytes(&buf[..n]);
                drained.bytes += n;
            }
            Err(SysError::WouldBlock) => {}
            Err(SysError::BrokenPipe) => drained.closed.push(slot),
            Err(_) => {
                crate::kwarn!("(MUX) Falha ao ler stdout, pid=", plumbing.pid.as_u32());
            }
        }
    }
    drained
}

/// Slots cujos processos terminaram
pub fn reap(sys: &mut dyn Sys, stack: &WindowStack) -> Vec<usize> {
    let mut dead = Vec::new();
    loop {
        match sys.try_wait() {
            Ok(Some(pid)) => match stack.slot_of(pid) {
                Some(slot) => dead.push(slot),
                None => crate::kdebug!("(MUX) Filho sem janela colhido, pid=", pid.as_u32()),
            },
            Ok(None) => break,
            Err(_) => break,
        }
    }
    dead
}

/// Fecha os pipes e retira a janela da pilha
pub fn teardown(sys: &mut dyn Sys, stack: &mut WindowStack, slot: usize) -> Option<Window> {
    let window = stack.remove(slot)?;
    if let Some(p) = window.plumbing() {
        close_all(sys, &[p.stdin, p.stdout]);
        crate::kinfo!("(MUX) Janela encerrada, pid=", p.pid.as_u32());
    }
    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_keys() {
        assert_eq!(focus_key(b'1'), Some(0));
        assert_eq!(focus_key(b'2'), Some(1));
        assert_eq!(focus_key(b'3'), None);
        assert_eq!(focus_key(b'4'), None);
        assert_eq!(focus_key(b'9'), None);
        assert_eq!(focus_key(b'0'), None);
        assert_eq!(focus_key(b'a'), None);
    }
}
