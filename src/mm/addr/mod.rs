//! # Addr - Wrappers Type-Safe para Endereços
//!
//! Tipos distintos para PhysAddr e VirtAddr evitando confusão. As variantes
//! `try_new` são usadas na fronteira de decodificação das remote calls, onde
//! uma palavra crua vira um endereço tipado uma única vez.

mod phys;
mod virt;

pub use phys::PhysAddr;
pub use virt::VirtAddr;
