//! Retângulos e oclusão por subtração
//!
//! A área visível de uma janela é o seu retângulo menos a união das
//! janelas acima dela. O conjunto de trabalho começa com um único
//! retângulo; cada oclusor quebra cada retângulo interceptado em até 4
//! faixas (topo, base, esquerda, direita), nesta ordem:
//!
//! ```text
//! ┌────────────────────┐
//! │        topo        │
//! ├──────┬──────┬──────┤
//! │ esq  │ ∩    │ dir  │
//! ├──────┴──────┴──────┤
//! │        base        │
//! └────────────────────┘
//! ```
//!
//! Não há fusão nem minimização: com no máximo `MAX_WINDOWS - 1` oclusores
//! o conjunto nunca passa de `4^(MAX_WINDOWS-1)` = `MAX_VISIBLE_RECTS`.

use crate::config::MAX_VISIBLE_RECTS;

/// Retângulo alinhado aos eixos, em coordenadas de tela
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub const fn right(&self) -> usize {
        self.x + self.w
    }

    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y + self.h
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.w * self.h
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Interseção, ou `None` se vazia
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Menor retângulo que contém os dois
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Desloca por (dx, dy)
    pub const fn offset(&self, dx: usize, dy: usize) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// `self` menos `cut`: até 4 faixas, vazias omitidas.
    ///
    /// `cut` precisa estar contido em `self` (é uma interseção).
    fn split_around(&self, cut: &Rect, out: &mut RectSet) {
        // topo
        if cut.y > self.y {
            out.push(Rect::new(self.x, self.y, self.w, cut.y - self.y));
        }
        // base
        if self.bottom() > cut.bottom() {
            out.push(Rect::new(self.x, cut.bottom(), self.w, self.bottom() - cut.bottom()));
        }
        // esquerda
        if cut.x > self.x {
            out.push(Rect::new(self.x, cut.y, cut.x - self.x, cut.h));
        }
        // direita
        if self.right() > cut.right() {
            out.push(Rect::new(cut.right(), cut.y, self.right() - cut.right(), cut.h));
        }
    }
}

/// Conjunto de retângulos visíveis, capacidade fixa
#[derive(Clone, Copy)]
pub struct RectSet {
    rects: [Rect; MAX_VISIBLE_RECTS],
    len: usize,
}

impl RectSet {
    pub const fn new() -> Self {
        Self {
            rects: [Rect::new(0, 0, 0, 0); MAX_VISIBLE_RECTS],
            len: 0,
        }
    }

    /// Conjunto com um único retângulo
    pub fn single(rect: Rect) -> Self {
        let mut set = Self::new();
        set.push(rect);
        set
    }

    fn push(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        // Impossível com MAX_WINDOWS respeitado
        debug_assert!(self.len < MAX_VISIBLE_RECTS, "RectSet estourou");
        if let Some(slot) = self.rects.get_mut(self.len) {
            *slot = rect;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects[..self.len].iter()
    }

    /// Área total (os retângulos nunca se sobrepõem)
    pub fn area(&self) -> usize {
        self.iter().map(Rect::area).sum()
    }

    /// Remove `occluder` de cada retângulo do conjunto
    pub fn subtract(&mut self, occluder: &Rect) {
        let mut next = RectSet::new();
        for r in self.iter() {
            match r.intersect(occluder) {
                None => next.push(*r),
                Some(cut) => r.split_around(&cut, &mut next),
            }
        }
        *self = next;
    }
}

impl Default for RectSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Área visível de `target` sob os oclusores dados (de baixo para cima)
pub fn visible_region<'a>(target: Rect, occluders: impl IntoIterator<Item = &'a Rect>) -> RectSet {
    let mut set = RectSet::single(target);
    for occ in occluders {
        if set.is_empty() {
            break;
        }
        set.subtract(occ);
    }
    set
}
