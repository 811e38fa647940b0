//! # Handlers de Invalidação
//!
//! Um handler por tipo de remote call. Cada um traduz argumentos já
//! decodificados em chamadas à primitiva [`TlbOps`] do core atual.
//!
//! Ao retornar, nenhuma tradução do escopo pedido é observável neste core:
//! a primitiva é síncrona e serve de barreira. Reinvocar com os mesmos
//! argumentos não tem efeito observável adicional.

use core::sync::atomic::Ordering;

use crate::mm::addr::VirtAddr;
use crate::mm::vmm::tlb::{Asid, InvalidationScope, Pcid, TlbOps, VSpaceRoot, TLB_STATS};

/// Invalida entradas locais do PCID `pcid`.
///
/// - `Address`: só a página que contém `addr`.
/// - `Context`: todas as entradas não-globais do PCID.
/// - `AllContexts` / `AllIncludingGlobal`: todos os PCIDs (`pcid` ignorado).
pub fn invalidate_local_pcid<T: TlbOps + ?Sized>(
    tlb: &mut T,
    pcid: Pcid,
    addr: VirtAddr,
    scope: InvalidationScope,
) {
    crate::ktrace!("(RCALL) InvalidatePCID pcid=", pcid.as_u16());
    if scope.uses_address() {
        crate::ktrace!("(RCALL)   addr=", addr.as_u64());
    }

    tlb.invalidate_pcid(scope, pcid, addr);
    TLB_STATS.record_scope(scope);
}

/// Invalida todas as entradas locais do par (root, asid).
pub fn invalidate_local_asid<T: TlbOps + ?Sized>(tlb: &mut T, root: VSpaceRoot, asid: Asid) {
    crate::ktrace!("(RCALL) InvalidateASID root=", root.phys().as_u64());
    crate::ktrace!("(RCALL)   asid=", asid.as_u16());

    tlb.invalidate_asid(root, asid);
    TLB_STATS.asid_invalidations.fetch_add(1, Ordering::Relaxed);
}
