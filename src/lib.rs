// (FASE2) src/lib.rs
//! Forge RCall Library.
//!
//! Subsistema de Remote Calls do kernel Forge: quando um core desfaz um
//! mapeamento ou recicla uma tag de address space, os outros cores recebem
//! uma IPI e invalidam localmente as entradas de TLB afetadas.
//!
//! Em builds sem a feature `smp` apenas as primitivas locais existem.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (modelo de TLB em software usa Vec/BTreeSet)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (PCID, INVPCID)
pub mod drivers; // Serial (sink do log)

// --- Módulos Centrais ---
pub mod core; // Logging, Panic, IPI, Remote Calls
pub mod mm; // Endereços, TLB

#[cfg(feature = "smp")]
pub use crate::core::smp::remote_call::{
    handle_remote_call, CallMailbox, RemoteCall, RemoteCallError, RemoteCallKind,
    RemoteCallRecord,
};
pub use crate::mm::vmm::tlb::{Asid, InvalidationScope, Pcid, TlbOps, VSpaceRoot};
