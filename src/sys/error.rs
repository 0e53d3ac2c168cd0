//! Códigos de Erro da pilha de display
//!
//! Erros são retornados como valores negativos no retorno da syscall.
//! Limites de raster e glifos fora da faixa imprimível NÃO são erros:
//! são descartados silenciosamente (clipping de rotina).

use core::fmt;

/// Enum de erros do sistema.
///
/// Valores são i32 para permitir representação negativa em isize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SysError {
    // === Erros Gerais (1-15) ===
    /// Objeto não encontrado (caminho de dispositivo, slot de janela)
    NotFound = 2,
    /// Argumento inválido (ex: escrita menor que um registro de glifo)
    InvalidArgument = 4,
    /// Operação bloquearia (poll não-bloqueante sem dados)
    WouldBlock = 5,
    /// Operação interrompida (processo morto enquanto bloqueado)
    Interrupted = 6,

    // === Erros de Handle (16-31) ===
    /// Descritor inválido ou fechado
    BadHandle = 16,

    // === Erros de Memória (32-47) ===
    /// Sem memória disponível
    OutOfMemory = 32,
    /// Endereço inválido ou não mapeado (falha de copyin)
    BadAddress = 33,

    // === Erros de IO (48-63) ===
    /// Erro genérico de IO
    IoError = 48,
    /// Pipe sem leitor/escritor
    BrokenPipe = 50,

    // === Erros de Processo (80-95) ===
    /// Limite de processos/janelas atingido
    TooManyProcesses = 81,

    // === Erros de Sistema (240-255) ===
    /// Operação não suportada pelo dispositivo
    NotImplemented = 254,
    /// Erro desconhecido
    Unknown = 255,
}

impl SysError {
    /// Converte para isize negativo (formato de retorno da syscall)
    #[inline]
    pub fn as_isize(self) -> isize {
        -(self as i32 as isize)
    }

    /// Cria erro a partir de código negativo
    pub fn from_code(code: isize) -> Option<Self> {
        if code >= 0 {
            return None;
        }
        match -code {
            2 => Some(Self::NotFound),
            4 => Some(Self::InvalidArgument),
            5 => Some(Self::WouldBlock),
            6 => Some(Self::Interrupted),
            16 => Some(Self::BadHandle),
            32 => Some(Self::OutOfMemory),
            33 => Some(Self::BadAddress),
            48 => Some(Self::IoError),
            50 => Some(Self::BrokenPipe),
            81 => Some(Self::TooManyProcesses),
            254 => Some(Self::NotImplemented),
            _ => Some(Self::Unknown),
        }
    }

    /// Descrição curta (usada nos logs e no Display).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::InvalidArgument => "invalid argument",
            Self::WouldBlock => "would block",
            Self::Interrupted => "interrupted",
            Self::BadHandle => "bad handle",
            Self::OutOfMemory => "out of memory",
            Self::BadAddress => "bad address",
            Self::IoError => "i/o error",
            Self::BrokenPipe => "broken pipe",
            Self::TooManyProcesses => "too many processes",
            Self::NotImplemented => "not implemented",
            Self::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for SysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado de syscall: Ok(valor) ou Err(SysError)
pub type SysResult<T> = Result<T, SysError>;

/// Helper para converter SysResult<usize> em isize para retorno
pub fn result_to_isize(result: SysResult<usize>) -> isize {
    match result {
        Ok(val) => val as isize,
        Err(e) => e.as_isize(),
    }
}
