//! Pilha de janelas
//!
//! Arena de `MAX_WINDOWS` slots (identidade: processo, pipes, buffer) e uma
//! lista separada de índices para a ordem Z. O ÚLTIMO índice da lista é a
//! janela do topo, e a janela do topo é sempre a focada.

use alloc::vec::Vec;

use super::rect::{visible_region, Rect, RectSet};
use super::window::Window;
use crate::config::MAX_WINDOWS;
use crate::sys::error::{SysError, SysResult};
use crate::sys::Pid;

pub struct WindowStack {
    slots: [Option<Window>; MAX_WINDOWS],
    /// Índices de slot, de baixo para cima
    order: Vec<usize>,
}

impl WindowStack {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            order: Vec::with_capacity(MAX_WINDOWS),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Primeiro slot livre
    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Coloca a janela num slot livre, no topo (passa a ser a focada)
    pub fn insert(&mut self, window: Window) -> SysResult<usize> {
        let slot = self.free_slot().ok_or(SysError::TooManyProcesses)?;
        self.slots[slot] = Some(window);
        self.order.push(slot);
        Ok(slot)
    }

    /// Retira a janela do slot e da ordem Z
    pub fn remove(&mut self, slot: usize) -> Option<Window> {
        let window = self.slots.get_mut(slot)?.take()?;
        self.order.retain(|&s| s != slot);
        Some(window)
    }

    pub fn get(&self, slot: usize) -> Option<&Window> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Window> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Slot da janela focada (topo)
    pub fn focused(&self) -> Option<usize> {
        self.order.last().copied()
    }

    /// Ordem Z, de baixo para cima
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Posição do slot na ordem Z
    pub fn position(&self, slot: usize) -> Option<usize> {
        self.order.iter().position(|&s| s == slot)
    }

    pub fn slot_of(&self, pid: Pid) -> Option<usize> {
        self.slots
            .iter()
            .position(|w| w.as_ref().and_then(Window::pid) == Some(pid))
    }

    /// Leva o slot ao topo. Retorna false se já era o topo ou se não existe.
    pub fn focus(&mut self, slot: usize) -> bool {
        let Some(pos) = self.position(slot) else {
            return false;
        };
        if pos + 1 == self.order.len() {
            return false;
        }
        let moved = self.order.remove(pos);
        self.order.push(moved);
        true
    }

    /// Retângulos das janelas acima do slot, de baixo para cima
    pub fn occluders_above(&self, slot: usize) -> impl Iterator<Item = Rect> + '_ {
        let start = self.position(slot).map_or(self.order.len(), |p| p + 1);
        self.order[start..]
            .iter()
            .filter_map(|&s| self.get(s).map(Window::rect))
    }

    /// Área visível do slot, recalculada pela posição atual na ordem Z
    pub fn visible_rects(&self, slot: usize) -> RectSet {
        let Some(window) = self.get(slot) else {
            return RectSet::new();
        };
        let above: Vec<Rect> = self.occluders_above(slot).collect();
        visible_region(window.rect(), &above)
    }

    /// Slots ocupados, em ordem de slot
    pub fn slots(&self) -> impl Iterator<Item = (usize, &Window)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.as_ref().map(|w| (i, w)))
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = (usize, &mut Window)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, w)| w.as_mut().map(|w| (i, w)))
    }
}

impl Default for WindowStack {
    fn default() -> Self {
        Self::new()
    }
}
