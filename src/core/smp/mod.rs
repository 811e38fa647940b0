/// Arquivo: core/smp/mod.rs
///
/// Propósito: Módulo de Multiprocessamento Simétrico (SMP).
/// Só existe em builds multicore (feature `smp`); em single-core toda
/// invalidação de TLB é local e nada daqui é compilado.
///
/// Módulos contidos:
/// - `ipi`: vetores de IPI e entrada da interrupção de remote call.
/// - `remote_call`: decodificação, dispatch e handlers de invalidação.

pub mod ipi;
pub mod remote_call;
