//! Arquivo: core/smp/ipi.rs
//!
//! Propósito: Lado receptor das Interrupções Inter-Processador (IPIs).
//! A entrega (programação do APIC) e a escolha dos alvos pertencem ao
//! coordenador; aqui apenas atendemos a IPI de remote call no core alvo.
//!
//! Detalhes de Implementação:
//! - Uma IPI carrega exatamente uma remote call (sem batching).
//! - O ACK (geração do mailbox) acontece depois do handler, no caminho de
//!   retorno da interrupção.

/// Identificador lógico de CPU (0 a N-1)
pub type CpuId = u32;

/// Vetores de IPI (definidos por convenção no kernel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IpiVector {
    /// Remote call: invalidação de TLB por PCID/ASID
    RemoteCall = 0xFD,
}

impl IpiVector {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Entrada da IPI de remote call no core `cpu`.
///
/// Chamada pelo stub de interrupção, com interrupções desabilitadas, antes
/// do EOI. Retorna `false` para IPIs espúrias (nenhuma call postada).
#[cfg(target_arch = "x86_64")]
pub fn remote_call_interrupt(cpu: CpuId) -> bool {
    let Some(mailbox) = super::remote_call::mailbox_for(cpu) else {
        crate::kerror!("(IPI) Remote call para CPU fora de MAX_CPUS: ", cpu);
        return false;
    };
    let mut tlb = crate::arch::x86_64::vmm::HwTlb::current();
    mailbox.service(&mut tlb)
}
