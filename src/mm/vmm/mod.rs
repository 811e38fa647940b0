//! Virtual Memory Manager (VMM) - parte de TLB
//!
//! Tipos de tag/escopo, a primitiva de invalidação e o modelo em software.

pub mod soft_tlb;
pub mod tlb;

pub use soft_tlb::{SoftTlb, TlbEntry};
pub use tlb::{Asid, InvalidationScope, Pcid, TlbOps, VSpaceRoot, TLB_STATS};
