//! # TLB - Tags, Escopos e a Primitiva de Invalidação
//!
//! O TLB é um cache de traduções de endereços virtuais para físicos e é
//! estritamente **por core**. Este módulo define o vocabulário tipado usado
//! para falar de invalidação (PCID, ASID, raiz de vspace, escopo) e o trait
//! [`TlbOps`], que é a fronteira com a instrução de hardware.
//!
//! ## 🏗️ Arquitetura
//!
//! - **`TlbOps`**: primitiva síncrona e opaca. Ao retornar, nenhuma tradução
//!   do escopo pedido é observável por acessos subsequentes neste core.
//! - **`HwTlb`** (arch/x86_64): implementação real com `invpcid`/`invlpg`.
//! - **`SoftTlb`** (`soft_tlb.rs`): modelo em software, usado em testes.
//!
//! ## ⚠️ CRÍTICO para SMP
//!
//! Sem invalidação remota, um core pode manter uma tradução para memória que
//! outro core já liberou. Ver `core::smp::remote_call`.

use crate::mm::addr::{PhysAddr, VirtAddr};
use crate::mm::config::PAGE_SIZE;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// CONFIGURAÇÃO
// =============================================================================

/// Número de PCIDs (campo de 12 bits no CR3)
pub const MAX_PCID: u16 = 4096;

/// PCID reservado para o kernel
pub const KERNEL_PCID: u16 = 0;

/// Número de ASIDs. Em x86_64 o ASID é usado diretamente como PCID.
pub const MAX_ASID: u16 = MAX_PCID;

// =============================================================================
// TIPOS
// =============================================================================

/// Process-Context Identifier (tag de 12 bits)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Pcid(u16);

impl Pcid {
    pub const KERNEL: Pcid = Pcid(KERNEL_PCID);

    /// Estreita uma palavra crua para PCID (falha se >= 4096)
    pub const fn try_new(raw: u64) -> Option<Self> {
        if raw < MAX_PCID as u64 {
            Some(Self(raw as u16))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

/// Address Space Identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Asid(u16);

impl Asid {
    /// Estreita uma palavra crua para ASID (falha se >= MAX_ASID)
    pub const fn try_new(raw: u64) -> Option<Self> {
        if raw < MAX_ASID as u64 {
            Some(Self(raw as u16))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Tag de hardware usada para este ASID
    #[inline]
    pub const fn as_pcid(self) -> Pcid {
        Pcid(self.0)
    }
}

/// Identidade da page table de topo (PML4) de um address space.
///
/// Guarda o endereço físico que vai no CR3, sem os bits de PCID.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct VSpaceRoot(PhysAddr);

impl VSpaceRoot {
    /// Estreita uma palavra crua: não-nula, alinhada a página, < 2^52.
    pub fn try_new(raw: u64) -> Option<Self> {
        let phys = PhysAddr::try_new(raw)?;
        if phys.is_null() || !phys.is_aligned(PAGE_SIZE as u64) {
            return None;
        }
        Some(Self(phys))
    }

    #[inline]
    pub const fn phys(self) -> PhysAddr {
        self.0
    }
}

/// Escopo de uma invalidação por PCID.
///
/// Os valores coincidem com os tipos de descritor da instrução INVPCID.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u64)]
pub enum InvalidationScope {
    /// Uma página de um PCID (entradas globais preservadas)
    Address = 0,
    /// Todas as entradas não-globais de um PCID
    Context = 1,
    /// Todas as entradas de todos os PCIDs, incluindo globais
    AllIncludingGlobal = 2,
    /// Todas as entradas não-globais de todos os PCIDs
    AllContexts = 3,
}

impl InvalidationScope {
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::Address),
            1 => Some(Self::Context),
            2 => Some(Self::AllIncludingGlobal),
            3 => Some(Self::AllContexts),
            _ => None,
        }
    }

    /// O slot de endereço só é significativo para `Address`
    #[inline]
    pub const fn uses_address(self) -> bool {
        matches!(self, Self::Address)
    }
}

impl fmt::Display for InvalidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::Context => "context",
            Self::AllIncludingGlobal => "all+global",
            Self::AllContexts => "all",
        };
        f.write_str(name)
    }
}

// =============================================================================
// PRIMITIVA DE HARDWARE
// =============================================================================

/// Primitiva de invalidação local do TLB.
///
/// Ambas as operações são síncronas: ao retornar, nenhum acesso posterior
/// neste core observa uma tradução do escopo pedido. Implementações podem
/// invalidar mais do que o pedido, nunca menos. Para argumentos bem formados
/// não existe caminho de erro.
pub trait TlbOps {
    /// Invalida por tag (PCID) e, para `Address`, pela página de `addr`.
    fn invalidate_pcid(&mut self, scope: InvalidationScope, pcid: Pcid, addr: VirtAddr);

    /// Invalida todas as entradas do par (root, asid).
    fn invalidate_asid(&mut self, root: VSpaceRoot, asid: Asid);
}

// =============================================================================
// ESTATÍSTICAS
// =============================================================================

/// Estatísticas de TLB para telemetria
pub struct TlbStats {
    pub page_invalidations: AtomicU64,
    pub context_invalidations: AtomicU64,
    pub full_flushes: AtomicU64,
    pub asid_invalidations: AtomicU64,
    pub remote_calls: AtomicU64,
    pub spurious_ipis: AtomicU64,
}

impl TlbStats {
    pub const fn new() -> Self {
        Self {
            page_invalidations: AtomicU64::new(0),
            context_invalidations: AtomicU64::new(0),
            full_flushes: AtomicU64::new(0),
            asid_invalidations: AtomicU64::new(0),
            remote_calls: AtomicU64::new(0),
            spurious_ipis: AtomicU64::new(0),
        }
    }

    /// Contabiliza uma invalidação por PCID conforme o escopo
    pub fn record_scope(&self, scope: InvalidationScope) {
        let counter = match scope {
            InvalidationScope::Address => &self.page_invalidations,
            InvalidationScope::Context => &self.context_invalidations,
            InvalidationScope::AllIncludingGlobal | InvalidationScope::AllContexts => {
                &self.full_flushes
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Estatísticas globais de TLB
pub static TLB_STATS: TlbStats = TlbStats::new();

/// Imprime estatísticas de TLB
pub fn print_tlb_stats() {
    crate::kinfo!("╔══════════════════════════════════════╗");
    crate::kinfo!("║       ESTATÍSTICAS DE TLB            ║");
    crate::kinfo!("╚══════════════════════════════════════╝");
    crate::kinfo!("  Invalidações de página: ", TLB_STATS.page_invalidations.load(Ordering::Relaxed));
    crate::kinfo!("  Invalidações de contexto: ", TLB_STATS.context_invalidations.load(Ordering::Relaxed));
    crate::kinfo!("  Flushes completos: ", TLB_STATS.full_flushes.load(Ordering::Relaxed));
    crate::kinfo!("  Invalidações por ASID: ", TLB_STATS.asid_invalidations.load(Ordering::Relaxed));
    crate::kinfo!("  Remote calls atendidas: ", TLB_STATS.remote_calls.load(Ordering::Relaxed));
    crate::kinfo!("  IPIs espúrias: ", TLB_STATS.spurious_ipis.load(Ordering::Relaxed));
}
