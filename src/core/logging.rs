// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging do Forge com custo ZERO quando desligado.
//
// ARQUITETURA:
// - Usa features do Cargo para filtragem em compile-time
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - Evita geração de código SSE/AVX em contexto de IRQ
// - SEM alocação - Apenas strings literais e valores em hex
// - Escreve APENAS na serial (drivers::serial)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos          (tudo exceto no_logs)
// - WARN:  Situações suspeitas               (tudo exceto no_logs)
// - INFO:  Fluxo normal de execução          (log_info, log_debug, log_trace)
// - DEBUG: Informações de debugging          (log_debug, log_trace)
// - TRACE: Detalhes de cada remote call      (log_trace)
//
// COMO USAR:
//   kinfo!("(RCALL) Inicializando...");        // Apenas string
//   kinfo!("(RCALL) CPU=", cpu);               // String + hex
//   klog!("PCID=", pcid, " Addr=", addr);      // Múltiplos valores
//
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

/// Emite uma linha com prefixo de nível. Usado pelos macros `k*!`.
#[doc(hidden)]
#[macro_export]
macro_rules! __klog_line {
    ($prefix:expr, $msg:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_nl();
    }};
    ($prefix:expr, $msg:expr, $val:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_hex($val as u64);
        $crate::drivers::serial::emit_nl();
    }};
}

// =============================================================================
// ERROR / WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $msg, $val) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_WARN, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_WARN, $msg, $val) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// INFO
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_INFO, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_INFO, $msg, $val) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// DEBUG
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $msg, $val) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// TRACE
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $msg, $val) };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS AUXILIARES
// =============================================================================

/// klog! - Log genérico sem prefixo de nível nem newline.
///
/// Útil para compor linhas com vários valores:
///
/// ```ignore
/// klog!("PCID=", pcid, " Addr=", addr);
/// knl!();
/// ```
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! klog {
    ($msg:expr) => {{
        $crate::drivers::serial::emit_str($msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_hex($val as u64);
    }};
    ($msg1:expr, $val1:expr, $msg2:expr, $val2:expr) => {{
        $crate::drivers::serial::emit_str($msg1);
        $crate::drivers::serial::emit_hex($val1 as u64);
        $crate::drivers::serial::emit_str($msg2);
        $crate::drivers::serial::emit_hex($val2 as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! klog {
    ($($t:tt)*) => {{}};
}

/// knl! - Termina uma linha composta com klog!
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! knl {
    () => {{
        $crate::drivers::serial::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! knl {
    () => {{}};
}

#[cfg(all(test, not(feature = "no_logs"), not(target_os = "none")))]
mod tests {
    use crate::drivers::serial;

    #[test]
    fn test_error_line_reaches_serial() {
        crate::kerror!("(LOG) teste-erro-linha");
        assert!(serial::captured_contains("[ERRO]"));
        assert!(serial::captured_contains("(LOG) teste-erro-linha"));
    }

    #[test]
    fn test_hex_value_is_appended() {
        crate::kwarn!("(LOG) teste-hex=", 0xABCDusize);
        assert!(serial::captured_contains("(LOG) teste-hex=0x000000000000ABCD"));
    }
}
