//! Testes de integração do compositor
//!
//! `FakeSys` simula o kernel em memória: pipes são filas de bytes com
//! contagem de pontas abertas, `fork` sempre retorna no pai e registra um
//! filho "de papel" que herda todas as pontas abertas, e os descritores de
//! `/dev/fb` e `/dev/uart_keyboard` vão para os dispositivos REAIS.
//!
//! - `compositor.rs` - Laço, foco, render, teardown (ponta a ponta)
//! - `mux.rs`        - Spawn, falhas de spawn, lado do filho

#![cfg(test)]


use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::config::{FB_DEVICE, FRAME_HEIGHT, FRAME_WIDTH, KB_DEVICE};
use crate::drivers::input::{KeyboardDevice, NoHooks};
use crate::drivers::video::{FramebufferDevice, Raster, Rgb565};
use crate::fs::devfs::{Device, OpenFlags};
use crate::mm::KernelSlice;
use crate::sync::waitqueue::fake;
use crate::sys::error::{SysError, SysResult};
use crate::sys::{Fd, Pid};
use crate::wm::sys::{ForkResult, Sys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Fb,
    Kb,
    Read(usize),
    Write(usize),
}

#[derive(Default)]
struct Pipe {
    data: VecDeque<u8>,
    readers: usize,
    writers: usize,
}

struct Child {
    pid: Pid,
    stdin: usize,
    stdout: usize,
    /// Pontas herdadas no fork e ainda abertas pelo filho
    held: Vec<Endpoint>,
}

pub struct FakeSys {
    pub fb: Arc<FramebufferDevice>,
    pub keyboard: Arc<KeyboardDevice>,
    fds: BTreeMap<u32, Endpoint>,
    next_fd: u32,
    pipes: Vec<Pipe>,
    children: Vec<Child>,
    exited: VecDeque<Pid>,
    next_pid: u32,
    /// `pipe()` falha depois de N sucessos
    pub pipe_budget: Option<usize>,
    pub fail_fork: bool,
    /// Caminhos que `open` não encontra
    pub missing: Vec<&'static str>,
    pub fb_broken: bool,
    pub fb_writes: usize,
    pub sleeps: Vec<u32>,
}

impl FakeSys {
    pub fn new() -> Self {
        Self::with_screen(FRAME_WIDTH, FRAME_HEIGHT)
    }

    pub fn with_screen(width: usize, height: usize) -> Self {
        Self {
            fb: Arc::new(FramebufferDevice::new(Raster::heap(width, height))),
            keyboard: Arc::new(KeyboardDevice::new(fake::scheduler(), Box::new(NoHooks))),
            fds: BTreeMap::new(),
            next_fd: 3,
            pipes: Vec::new(),
            children: Vec::new(),
            exited: VecDeque::new(),
            next_pid: 100,
            pipe_budget: None,
            fail_fork: false,
            missing: Vec::new(),
            fb_broken: false,
            fb_writes: 0,
            sleeps: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lado do "mundo": teclado e filhos
    // -------------------------------------------------------------------------

    /// Digita bytes no teclado serial
    pub fn type_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            self.keyboard.feed(b);
        }
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.children.iter().map(|c| c.pid).collect()
    }

    fn child(&self, pid: Pid) -> &Child {
        self.children
            .iter()
            .find(|c| c.pid == pid)
            .unwrap_or_else(|| panic!("sem filho {:?}", pid))
    }

    /// O filho escreve no seu stdout
    pub fn child_print(&mut self, pid: Pid, bytes: &[u8]) {
        let out = self.child(pid).stdout;
        self.pipes[out].data.extend(bytes.iter().copied());
    }

    /// Tudo que o filho recebeu no stdin até agora
    pub fn child_input(&mut self, pid: Pid) -> Vec<u8> {
        let inp = self.child(pid).stdin;
        self.pipes[inp].data.drain(..).collect()
    }

    /// O filho termina: solta todas as pontas e vira colhível
    pub fn child_exit(&mut self, pid: Pid) {
        let idx = self
            .children
            .iter()
            .position(|c| c.pid == pid)
            .unwrap_or_else(|| panic!("sem filho {:?}", pid));
        let child = self.children.remove(idx);
        for ep in child.held {
            self.release(ep);
        }
        self.exited.push_back(pid);
    }

    /// O filho fecha o stdout sem terminar (EOF para o compositor)
    pub fn child_close_stdout(&mut self, pid: Pid) {
        let out = self.child(pid).stdout;
        let idx = self
            .children
            .iter()
            .position(|c| c.pid == pid)
            .unwrap_or_else(|| panic!("sem filho {:?}", pid));
        let held = core::mem::take(&mut self.children[idx].held);
        let (gone, kept): (Vec<_>, Vec<_>) =
            held.into_iter().partition(|&ep| ep == Endpoint::Write(out));
        self.children[idx].held = kept;
        for ep in gone {
            self.release(ep);
        }
    }

    /// Descritores abertos pelo compositor
    pub fn open_fds(&self) -> usize {
        self.fds.len()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        self.fb.lock().raster().pixel(x, y)
    }

    // -------------------------------------------------------------------------
    // Contagem de pontas
    // -------------------------------------------------------------------------

    fn acquire(&mut self, ep: Endpoint) {
        match ep {
            Endpoint::Read(p) => self.pipes[p].readers += 1,
            Endpoint::Write(p) => self.pipes[p].writers += 1,
            Endpoint::Fb | Endpoint::Kb => {}
        }
    }

    fn release(&mut self, ep: Endpoint) {
        match ep {
            Endpoint::Read(p) => self.pipes[p].readers -= 1,
            Endpoint::Write(p) => self.pipes[p].writers -= 1,
            Endpoint::Fb | Endpoint::Kb => {}
        }
    }

    fn alloc_fd(&mut self, ep: Endpoint) -> Fd {
        let fd = self.next_fd;
        self.next_fd += 1;
        self.fds.insert(fd, ep);
        Fd(fd)
    }

    fn endpoint(&self, fd: Fd) -> SysResult<Endpoint> {
        self.fds.get(&fd.0).copied().ok_or(SysError::BadHandle)
    }
}

impl Sys for FakeSys {
    fn open(&mut self, path: &str, _flags: OpenFlags) -> SysResult<Fd> {
        if self.missing.contains(&path) {
            return Err(SysError::NotFound);
        }
        let ep = match path {
            FB_DEVICE => Endpoint::Fb,
            KB_DEVICE => Endpoint::Kb,
            _ => return Err(SysError::NotFound),
        };
        Ok(self.alloc_fd(ep))
    }

    fn close(&mut self, fd: Fd) -> SysResult<()> {
        let ep = self.fds.remove(&fd.0).ok_or(SysError::BadHandle)?;
        self.release(ep);
        Ok(())
    }

    fn read_nonblocking(&mut self, fd: Fd, buf: &mut [u8]) -> SysResult<usize> {
        match self.endpoint(fd)? {
            Endpoint::Kb => self.keyboard.read_nonblocking(buf),
            Endpoint::Fb => self.fb.read_nonblocking(buf),
            Endpoint::Read(p) => {
                let pipe = &mut self.pipes[p];
                if pipe.data.is_empty() {
                    return if pipe.writers == 0 {
                        Ok(0)
                    } else {
                        Err(SysError::WouldBlock)
                    };
                }
                let n = buf.len().min(pipe.data.len());
                for (dst, src) in buf.iter_mut().zip(pipe.data.drain(..n)) {
                    *dst = src;
                }
                Ok(n)
            }
            Endpoint::Write(_) => Err(SysError::BadHandle),
        }
    }

    fn write(&mut self, fd: Fd, buf: &[u8]) -> SysResult<usize> {
        match self.endpoint(fd)? {
            Endpoint::Fb => {
                if self.fb_broken {
                    return Err(SysError::IoError);
                }
                self.fb_writes += 1;
                self.fb.write(&KernelSlice(buf))
            }
            Endpoint::Write(p) => {
                let pipe = &mut self.pipes[p];
                if pipe.readers == 0 {
                    return Err(SysError::BrokenPipe);
                }
                pipe.data.extend(buf.iter().copied());
                Ok(buf.len())
            }
            Endpoint::Kb | Endpoint::Read(_) => Err(SysError::BadHandle),
        }
    }

    fn pipe(&mut self) -> SysResult<(Fd, Fd)> {
        if let Some(budget) = self.pipe_budget.as_mut() {
            if *budget == 0 {
                return Err(SysError::OutOfMemory);
            }
            *budget -= 1;
        }
        let p = self.pipes.len();
        self.pipes.push(Pipe {
            readers: 1,
            writers: 1,
            ..Pipe::default()
        });
        let r = self.alloc_fd(Endpoint::Read(p));
        let w = self.alloc_fd(Endpoint::Write(p));
        Ok((r, w))
    }

    fn fork(&mut self) -> SysResult<ForkResult> {
        if self.fail_fork {
            return Err(SysError::TooManyProcesses);
        }
        let n = self.pipes.len();
        assert!(n >= 2, "fork sem os pipes da janela");

        // O filho herda tudo e, depois do dup2/close, fica com o
        // stdin de leitura e o stdout de escrita.
        let held = [Endpoint::Read(n - 2), Endpoint::Write(n - 1)];
        for ep in held {
            self.acquire(ep);
        }

        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        self.children.push(Child {
            pid,
            stdin: n - 2,
            stdout: n - 1,
            held: held.to_vec(),
        });
        Ok(ForkResult::Parent(pid))
    }

    fn dup2(&mut self, old: Fd, new: Fd) -> SysResult<()> {
        let ep = self.endpoint(old)?;
        if let Some(prev) = self.fds.insert(new.0, ep) {
            self.release(prev);
        }
        self.acquire(ep);
        Ok(())
    }

    fn exec(&mut self, _program: &str, _argv: &[&str]) -> SysError {
        SysError::NotFound
    }

    fn exit(&mut self, code: i32) -> ! {
        panic!("exit({})", code)
    }

    fn try_wait(&mut self) -> SysResult<Option<Pid>> {
        Ok(self.exited.pop_front())
    }

    fn sleep(&mut self, ticks: u32) {
        self.sleeps.push(ticks);
    }
}
