//! # Configuração da Pilha de Display
//!
//! Define constantes globais de todos os subsistemas. A configuração de
//! runtime do compositor fica em `wm::config`.

// =============================================================================
// INPUT (DISCIPLINA DE LINHA)
// =============================================================================

/// Capacidade do anel de entrada do teclado (bytes)
pub const INPUT_BUF: usize = 128;

/// Control-x (ex: `ctrl(b'D')` = EOT)
pub const fn ctrl(c: u8) -> u8 {
    c - b'@'
}

/// Apaga a linha em edição (^U)
pub const KEY_KILL_LINE: u8 = ctrl(b'U');
/// Apaga um caractere (^H)
pub const KEY_BACKSPACE: u8 = ctrl(b'H');
/// Apaga um caractere (DEL)
pub const KEY_DELETE: u8 = 0x7f;
/// Dump da tabela de processos (^P)
pub const KEY_PROC_DUMP: u8 = ctrl(b'P');
/// Fim de transmissão (^D)
pub const KEY_EOT: u8 = ctrl(b'D');

// =============================================================================
// FONTE
// =============================================================================

/// Largura da célula de glifo (pixels)
pub const FONT_WIDTH: usize = 8;

/// Altura da célula de glifo (pixels)
pub const FONT_HEIGHT: usize = 16;

/// Linhas realmente desenhadas de cada glifo (a última fica livre)
pub const GLYPH_ROWS: usize = 15;

/// Maior código com bitmap
pub const GLYPH_MAX_CODE: u8 = 127;

// =============================================================================
// RASTER
// =============================================================================

/// Largura padrão negociada com o hardware
pub const FRAME_WIDTH: usize = 1024;

/// Altura padrão negociada com o hardware
pub const FRAME_HEIGHT: usize = 768;

/// Profundidade de cor (RGB565 empacotado)
pub const FRAME_DEPTH: u32 = 16;

// =============================================================================
// DISPOSITIVOS
// =============================================================================

/// Nó do framebuffer
pub const FB_DEVICE: &str = "/dev/fb";

/// Nó do teclado serial
pub const KB_DEVICE: &str = "/dev/uart_keyboard";

/// Major number do framebuffer
pub const FRAMEBUFFER_MAJOR: u32 = 2;

/// Major number do teclado serial
pub const UART_KEYBOARD_MAJOR: u32 = 3;

// =============================================================================
// COMPOSITOR
// =============================================================================

/// Número máximo de janelas simultâneas.
///
/// Limita também o conjunto de trabalho da oclusão: cada janela acima pode
/// quebrar cada retângulo em até 4, logo o pior caso é 4^(MAX_WINDOWS-1).
pub const MAX_WINDOWS: usize = 4;

/// Teclas reservadas para foco: '1' e '2' (slots 0 e 1). O resto vai ao shell.
pub const FOCUS_KEYS: usize = 2;

/// Capacidade fixa do conjunto de retângulos visíveis
pub const MAX_VISIBLE_RECTS: usize = 4usize.pow(MAX_WINDOWS as u32 - 1);

/// Largura padrão de janela
pub const WIN_WIDTH: usize = 400;

/// Altura padrão de janela
pub const WIN_HEIGHT: usize = 300;

/// Espessura da borda (pixels, desenhada dentro do buffer da janela)
pub const BORDER_WIDTH: usize = 1;

/// Bytes drenados por janela a cada tick
pub const DRAIN_CHUNK: usize = 64;

/// Bytes lidos do teclado a cada tick
pub const KEYBOARD_CHUNK: usize = 16;
