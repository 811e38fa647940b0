//! # Configuração do Módulo de Memória
//!
//! Define constantes e utilitários de alinhamento usados pelo subsistema de
//! TLB e pelas remote calls.

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Tamanho de uma página (4 KiB)
pub const PAGE_SIZE: usize = 4096;

/// Máscara para alinhar endereços a página
pub const PAGE_MASK: usize = !(PAGE_SIZE - 1);

/// Bits de offset dentro de uma página
pub const PAGE_OFFSET_BITS: usize = 12;

// =============================================================================
// LAYOUT DE ENDEREÇAMENTO (x86_64, paging de 4 níveis)
// =============================================================================

/// Bits significativos de um endereço virtual canônico
pub const VIRT_ADDR_BITS: u32 = 48;

/// Largura máxima de um endereço físico (MAXPHYADDR arquitetural)
pub const PHYS_ADDR_BITS: u32 = 52;

// =============================================================================
// CONFIGURAÇÃO SMP
// =============================================================================

/// Número máximo de CPUs suportadas
pub const MAX_CPUS: usize = 64;

/// Tamanho de linha de cache (para evitar false sharing)
pub const CACHE_LINE_SIZE: usize = 64;

// =============================================================================
// FUNÇÕES UTILITÁRIAS
// =============================================================================

/// Alinha valor para cima ao múltiplo de align
#[inline(always)]
pub const fn align_up(val: usize, align: usize) -> usize {
    (val + align - 1) & !(align - 1)
}

/// Alinha valor para baixo ao múltiplo de align
#[inline(always)]
pub const fn align_down(val: usize, align: usize) -> usize {
    val & !(align - 1)
}

/// Verifica se valor está alinhado
#[inline(always)]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}
