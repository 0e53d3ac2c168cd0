// =============================================================================
// SERIAL LOG SINK
// =============================================================================
//
// Saída de diagnóstico dos macros k*! (core::logging).
//
// ARQUITETURA:
// O transporte UART real é um colaborador externo: a plataforma instala
// uma implementação de `SerialPort` uma única vez no early-boot via
// `install()`. Até lá (e em testes de host) todo log é descartado.
//
// - SEM core::fmt - hex e strings emitidos byte a byte
// - SEM alocação no caminho de log
// - try_lock no sink: um log vindo de uma interrupção que preemptou
//   outro log é descartado em vez de travar a CPU
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal (0x...)
// - emit_nl()        : Envia newline (\r\n)
// - emit_line(p,m,v) : Prefixo + mensagem + valor opcional + newline
//
// =============================================================================

use alloc::boxed::Box;
use spin::Mutex;

/// Porta serial de saída usada pelo logging.
pub trait SerialPort: Send {
    /// Envia um byte (pode fazer busy-wait no THR vazio).
    fn write_byte(&mut self, byte: u8);
}

static SINK: Mutex<Option<Box<dyn SerialPort>>> = Mutex::new(None);

/// Instala a porta de log. Chamadas subsequentes substituem a anterior.
pub fn install(port: Box<dyn SerialPort>) {
    *SINK.lock() = Some(port);
}

/// Remove a porta de log, devolvendo-a ao chamador.
pub fn uninstall() -> Option<Box<dyn SerialPort>> {
    SINK.lock().take()
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para o sink.
#[inline]
pub fn emit(byte: u8) {
    if let Some(mut guard) = SINK.try_lock() {
        if let Some(port) = guard.as_mut() {
            port.write_byte(byte);
        }
    }
}

/// Envia uma string para o sink.
pub fn emit_str(s: &str) {
    if let Some(mut guard) = SINK.try_lock() {
        if let Some(port) = guard.as_mut() {
            for b in s.bytes() {
                port.write_byte(b);
            }
        }
    }
}

/// Envia newline (\r\n).
#[inline]
pub fn emit_nl() {
    emit_str("\r\n");
}

/// Envia um u64 em hexadecimal, sem zeros à esquerda (0x0 para zero).
pub fn emit_hex(value: u64) {
    let mut buf = [0u8; 18];
    let len = format_hex(value, &mut buf);
    if let Some(mut guard) = SINK.try_lock() {
        if let Some(port) = guard.as_mut() {
            for &b in &buf[..len] {
                port.write_byte(b);
            }
        }
    }
}

/// Emite uma linha completa de log com o lock tomado uma única vez,
/// para que linhas de CPUs/contextos diferentes não se intercalem.
pub fn emit_line(prefix: &str, msg: &str, value: Option<u64>) {
    let mut buf = [0u8; 18];
    let hex_len = value.map(|v| format_hex(v, &mut buf)).unwrap_or(0);

    let Some(mut guard) = SINK.try_lock() else {
        return;
    };
    let Some(port) = guard.as_mut() else {
        return;
    };

    for b in prefix.bytes().chain(msg.bytes()) {
        port.write_byte(b);
    }
    for &b in &buf[..hex_len] {
        port.write_byte(b);
    }
    port.write_byte(b'\r');
    port.write_byte(b'\n');
}

/// Formata `value` como "0x..." em `out`; retorna o número de bytes usados.
fn format_hex(value: u64, out: &mut [u8; 18]) -> usize {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    out[0] = b'0';
    out[1] = b'x';

    if value == 0 {
        out[2] = b'0';
        return 3;
    }

    let nibbles = (64 - value.leading_zeros() as usize + 3) / 4;
    for i in 0..nibbles {
        let shift = (nibbles - 1 - i) * 4;
        out[2 + i] = DIGITS[((value >> shift) & 0xF) as usize];
    }
    2 + nibbles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        let mut buf = [0u8; 18];
        let n = format_hex(0, &mut buf);
        assert_eq!(&buf[..n], b"0x0");

        let n = format_hex(0x1f40, &mut buf);
        assert_eq!(&buf[..n], b"0x1f40");

        let n = format_hex(u64::MAX, &mut buf);
        assert_eq!(&buf[..n], b"0xffffffffffffffff");
    }

    #[test]
    fn test_emit_without_sink_is_noop() {
        // Pode ou não haver sink instalado por outro teste: não deve travar.
        emit_str("(TEST) sem sink");
        emit_hex(0xdead);
        emit_nl();
    }

    #[cfg(not(feature = "no_logs"))]
    struct Capture(alloc::sync::Arc<Mutex<alloc::vec::Vec<u8>>>);

    #[cfg(not(feature = "no_logs"))]
    impl SerialPort for Capture {
        fn write_byte(&mut self, byte: u8) {
            self.0.lock().push(byte);
        }
    }

    #[cfg(not(feature = "no_logs"))]
    #[test]
    fn test_error_line_reaches_sink() {
        let out = alloc::sync::Arc::new(Mutex::new(alloc::vec::Vec::new()));
        install(Box::new(Capture(out.clone())));

        // Outros testes logam em paralelo: com o sink ocupado a linha é
        // descartada (try_lock), então repete até ela chegar.
        let mut text = alloc::string::String::new();
        for _ in 0..1000 {
            crate::kerror!("(TEST) valor=", 0x2a);
            text = alloc::string::String::from_utf8_lossy(&out.lock()).into_owned();
            if text.contains("(TEST) valor=0x2a\r\n") {
                break;
            }
            std::thread::yield_now();
        }
        let _ = uninstall();

        assert!(text.contains("[ERRO]"));
        assert!(text.contains("(TEST) valor=0x2a\r\n"));
    }
}
