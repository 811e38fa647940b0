//! Implementação x86_64

pub mod ports;
pub mod vmm;

/// Inicializa o suporte de TLB deste core (PCID/INVPCID).
///
/// # Safety
///
/// Deve ser chamado em ring 0, uma vez por core, antes do core aceitar IPIs.
pub unsafe fn init_tlb() {
    vmm::pcid::init();
    crate::kinfo!("(Arch) TLB features=", vmm::pcid::features().bits());
}
