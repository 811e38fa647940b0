//! VMM específico de x86_64: PCID e instruções de invalidação.

pub mod pcid;
pub mod tlb;

pub use pcid::TlbFeatures;
pub use tlb::HwTlb;
