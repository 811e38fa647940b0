//! # HwTlb - Invalidação de TLB no Hardware (x86_64)
//!
//! Implementação de [`TlbOps`] com as instruções reais:
//!
//! | Situação                         | Instrução                      |
//! |----------------------------------|--------------------------------|
//! | INVPCID com CR4.PCIDE ligado     | `invpcid` com tipo = escopo    |
//! | Página do PCID ativo             | `invlpg`                       |
//! | Contexto do PCID ativo           | reload de CR3                  |
//! | Qualquer outro caso              | toggle de CR4.PGE (flush total)|
//!
//! O fallback invalida mais do que o pedido, nunca menos. Com PCIDE
//! desligado toda entrada carrega a tag 0: INVPCID com outra tag não
//! invalidaria nada (ou geraria #GP no tipo 1), então o fallback é usado.

use core::arch::asm;

use super::pcid::{self, TlbFeatures};
use crate::mm::addr::VirtAddr;
use crate::mm::vmm::tlb::{Asid, InvalidationScope, Pcid, TlbOps, VSpaceRoot};

/// Executa INVPCID
///
/// # Safety
///
/// Ring 0 e CPU com INVPCID.
#[inline(always)]
unsafe fn invpcid(scope: InvalidationScope, pcid: Pcid, addr: VirtAddr) {
    let descriptor: [u64; 2] = [pcid.as_u16() as u64, addr.as_u64()];
    asm!(
        "invpcid {kind}, [{desc}]",
        kind = in(reg) scope as u64,
        desc = in(reg) &descriptor,
        options(nostack, preserves_flags)
    );
}

/// Invalida uma única página no TLB local (PCID ativo)
#[inline(always)]
unsafe fn invlpg(addr: VirtAddr) {
    asm!(
        "invlpg [{}]",
        in(reg) addr.as_u64(),
        options(nostack, preserves_flags)
    );
}

/// Recarrega CR3: invalida as entradas não-globais do PCID ativo
#[inline(always)]
unsafe fn reload_cr3() {
    let cr3 = pcid::read_cr3();
    asm!("mov cr3, {}", in(reg) cr3, options(nostack, preserves_flags));
}

/// Instrução escolhida para uma invalidação
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushStrategy {
    /// `invpcid` com tipo = escopo
    Invpcid,
    /// `invlpg` de uma página do PCID ativo
    Invlpg,
    /// Reload de CR3 (não-globais do PCID ativo)
    ReloadCr3,
    /// Toggle de CR4.PGE (tudo, globais inclusive)
    TogglePge,
}

/// Escolhe a instrução para `scope`.
///
/// `active` diz se a tag alvo é a do CR3 atual (sempre verdade sem PCIDE).
pub fn flush_strategy(
    features: TlbFeatures,
    scope: InvalidationScope,
    active: bool,
) -> FlushStrategy {
    let pcid_enabled = features.contains(TlbFeatures::PCID_ENABLED);
    if features.contains(TlbFeatures::INVPCID | TlbFeatures::PCID_ENABLED) {
        return FlushStrategy::Invpcid;
    }

    match scope {
        InvalidationScope::Address if active => FlushStrategy::Invlpg,
        InvalidationScope::Context if active => FlushStrategy::ReloadCr3,
        InvalidationScope::AllContexts if !pcid_enabled => FlushStrategy::ReloadCr3,
        _ => FlushStrategy::TogglePge,
    }
}

/// Primitiva de hardware do core atual
#[derive(Clone, Copy, Debug)]
pub struct HwTlb {
    features: TlbFeatures,
}

impl HwTlb {
    pub const fn new(features: TlbFeatures) -> Self {
        Self { features }
    }

    /// Usa as capacidades registradas por `pcid::init`
    pub fn current() -> Self {
        Self::new(pcid::features())
    }

    fn is_active_pcid(&self, pcid: Pcid) -> bool {
        if self.features.contains(TlbFeatures::PCID_ENABLED) {
            pcid::current().1 == pcid
        } else {
            // Sem PCIDE o TLB só guarda o address space ativo.
            true
        }
    }
}

impl TlbOps for HwTlb {
    fn invalidate_pcid(&mut self, scope: InvalidationScope, pcid: Pcid, addr: VirtAddr) {
        match flush_strategy(self.features, scope, self.is_active_pcid(pcid)) {
            FlushStrategy::Invpcid => unsafe { invpcid(scope, pcid, addr) },
            FlushStrategy::Invlpg => unsafe { invlpg(addr) },
            FlushStrategy::ReloadCr3 => unsafe { reload_cr3() },
            FlushStrategy::TogglePge => unsafe { pcid::toggle_pge() },
        }
    }

    fn invalidate_asid(&mut self, root: VSpaceRoot, asid: Asid) {
        if self.features.contains(TlbFeatures::PCID_ENABLED) {
            self.invalidate_pcid(InvalidationScope::Context, asid.as_pcid(), VirtAddr::new(0));
            return;
        }

        // Sem PCID, só o root ativo pode ter traduções cacheadas.
        if pcid::current().0 == root.phys() {
            unsafe { reload_cr3() };
        } else {
            crate::ktrace!("(TLB) ASID de root inativo, nada a invalidar: ", root.phys().as_u64());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPES: [InvalidationScope; 4] = [
        InvalidationScope::Address,
        InvalidationScope::Context,
        InvalidationScope::AllIncludingGlobal,
        InvalidationScope::AllContexts,
    ];

    #[test]
    fn test_invpcid_requires_pcide() {
        // INVPCID sem PCIDE: todas as entradas têm tag 0, usar o fallback
        let features = TlbFeatures::INVPCID;
        assert_eq!(
            flush_strategy(features, InvalidationScope::Address, true),
            FlushStrategy::Invlpg
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::Context, true),
            FlushStrategy::ReloadCr3
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::AllContexts, true),
            FlushStrategy::ReloadCr3
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::AllIncludingGlobal, true),
            FlushStrategy::TogglePge
        );
    }

    #[test]
    fn test_invpcid_used_with_pcide() {
        let features = TlbFeatures::INVPCID | TlbFeatures::PCID | TlbFeatures::PCID_ENABLED;
        for scope in SCOPES {
            assert_eq!(flush_strategy(features, scope, false), FlushStrategy::Invpcid);
        }
    }

    #[test]
    fn test_inactive_tag_without_invpcid_flushes_everything() {
        let features = TlbFeatures::PCID | TlbFeatures::PCID_ENABLED;
        assert_eq!(
            flush_strategy(features, InvalidationScope::Address, false),
            FlushStrategy::TogglePge
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::Context, false),
            FlushStrategy::TogglePge
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::AllContexts, true),
            FlushStrategy::TogglePge
        );
        assert_eq!(
            flush_strategy(features, InvalidationScope::Address, true),
            FlushStrategy::Invlpg
        );
    }
}
