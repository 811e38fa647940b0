//! Core Module
//!
//! Lógica central independente de arquitetura: logging, caminho fatal e,
//! em builds multicore, o subsistema de IPIs e remote calls.

pub mod logging;
pub mod panic;

#[cfg(feature = "smp")]
pub mod smp;
