//! # Hardware Abstraction Layer (HAL)
//!
//! Única ponte entre a lógica do kernel e as instruções privilegiadas.
//! A lógica de remote calls (`core::smp`) fala apenas com o trait
//! `mm::vmm::tlb::TlbOps`; a implementação concreta mora aqui.

// Seleção de Arquitetura: x86_64
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use x86_64 as platform;
