//! # SoftTlb - Modelo de TLB em Software
//!
//! Réplica por core do estado observável do TLB. Aplica exatamente a
//! semântica dos descritores INVPCID (entradas globais sobrevivem aos escopos
//! `Address`, `Context` e `AllContexts`) e indexa invalidações por ASID pelo
//! par (root, asid).
//!
//! Usado pelos testes unitários e pelos self-tests de boot para verificar
//! precisão e idempotência das remote calls sem depender do hardware.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use super::tlb::{Asid, InvalidationScope, Pcid, TlbOps, VSpaceRoot};
use crate::mm::addr::VirtAddr;

/// Uma tradução cacheada
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct TlbEntry {
    pub root: VSpaceRoot,
    pub pcid: Pcid,
    pub page: VirtAddr,
    pub global: bool,
}

#[derive(Clone, Default, Debug)]
pub struct SoftTlb {
    entries: BTreeSet<TlbEntry>,
    invocations: usize,
}

impl SoftTlb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preenche uma tradução (o endereço é alinhado à página)
    pub fn insert(&mut self, root: VSpaceRoot, pcid: Pcid, addr: VirtAddr, global: bool) {
        self.entries.insert(TlbEntry {
            root,
            pcid,
            page: addr.page(),
            global,
        });
    }

    /// Existe tradução para `addr` sob `pcid` (qualquer root)?
    pub fn is_cached(&self, pcid: Pcid, addr: VirtAddr) -> bool {
        let page = addr.page();
        self.entries
            .iter()
            .any(|e| e.pcid == pcid && e.page == page)
    }

    /// Existe tradução para `addr` sob o par (root, pcid)?
    pub fn is_cached_in(&self, root: VSpaceRoot, pcid: Pcid, addr: VirtAddr) -> bool {
        let page = addr.page();
        self.entries
            .iter()
            .any(|e| e.root == root && e.pcid == pcid && e.page == page)
    }

    /// Número de entradas cacheadas sob `pcid`
    pub fn count_for(&self, pcid: Pcid) -> usize {
        self.entries.iter().filter(|e| e.pcid == pcid).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cópia ordenada do estado atual
    pub fn snapshot(&self) -> Vec<TlbEntry> {
        self.entries.iter().copied().collect()
    }

    /// Quantas vezes a primitiva foi invocada
    pub fn invocations(&self) -> usize {
        self.invocations
    }
}

impl TlbOps for SoftTlb {
    fn invalidate_pcid(&mut self, scope: InvalidationScope, pcid: Pcid, addr: VirtAddr) {
        self.invocations += 1;
        let page = addr.page();
        match scope {
            InvalidationScope::Address => self
                .entries
                .retain(|e| e.global || e.pcid != pcid || e.page != page),
            InvalidationScope::Context => self.entries.retain(|e| e.global || e.pcid != pcid),
            InvalidationScope::AllIncludingGlobal => self.entries.clear(),
            InvalidationScope::AllContexts => self.entries.retain(|e| e.global),
        }
    }

    fn invalidate_asid(&mut self, root: VSpaceRoot, asid: Asid) {
        self.invocations += 1;
        let pcid = asid.as_pcid();
        self.entries
            .retain(|e| e.global || e.root != root || e.pcid != pcid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(raw: u64) -> VSpaceRoot {
        VSpaceRoot::try_new(raw).unwrap()
    }

    fn pcid(raw: u64) -> Pcid {
        Pcid::try_new(raw).unwrap()
    }

    #[test]
    fn test_insert_aligns_to_page() {
        let mut tlb = SoftTlb::new();
        tlb.insert(root(0x1000), pcid(1), VirtAddr::new(0x1234), false);
        assert!(tlb.is_cached(pcid(1), VirtAddr::new(0x1000)));
        assert!(tlb.is_cached(pcid(1), VirtAddr::new(0x1FFF)));
        assert!(!tlb.is_cached(pcid(1), VirtAddr::new(0x2000)));
        assert_eq!(tlb.len(), 1);
    }

    #[test]
    fn test_global_entries_survive_non_global_scopes() {
        let mut tlb = SoftTlb::new();
        let kernel = VirtAddr::new(0xFFFF_8000_0000_0000);
        tlb.insert(root(0x1000), pcid(1), kernel, true);
        tlb.insert(root(0x1000), pcid(1), VirtAddr::new(0x4000), false);

        tlb.invalidate_pcid(InvalidationScope::AllContexts, pcid(0), VirtAddr::new(0));
        assert!(tlb.is_cached(pcid(1), kernel));
        assert!(!tlb.is_cached(pcid(1), VirtAddr::new(0x4000)));

        tlb.invalidate_pcid(InvalidationScope::AllIncludingGlobal, pcid(0), VirtAddr::new(0));
        assert!(tlb.is_empty());
        assert_eq!(tlb.invocations(), 2);
    }
}
