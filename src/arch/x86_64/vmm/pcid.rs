//! # PCID Management (x86_64)
//!
//! Detecção de suporte a PCID/INVPCID, habilitação do CR4.PCIDE e montagem
//! do valor de CR3 a partir de (root, pcid).

use core::arch::asm;
use core::sync::atomic::{AtomicU8, Ordering};

use bitflags::bitflags;

use crate::mm::addr::PhysAddr;
use crate::mm::vmm::tlb::{Pcid, VSpaceRoot};

bitflags! {
    /// Capacidades de TLB do core
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TlbFeatures: u8 {
        /// CPUID.01H:ECX[17]
        const PCID = 1 << 0;
        /// CPUID.(EAX=07H,ECX=0):EBX[10]
        const INVPCID = 1 << 1;
        /// CR4.PCIDE ligado por `init`
        const PCID_ENABLED = 1 << 2;
    }
}

const CR4_PGE: u64 = 1 << 7;
const CR4_PCIDE: u64 = 1 << 17;
const CR3_PCID_MASK: u64 = 0xFFF;
const CR3_ADDR_MASK: u64 = 0x000F_FFFF_FFFF_F000;

static FEATURES: AtomicU8 = AtomicU8::new(0);

/// Lê as capacidades via CPUID
#[allow(unused_unsafe)]
pub fn detect() -> TlbFeatures {
    use core::arch::x86_64::{__cpuid, __cpuid_count};

    let mut features = TlbFeatures::empty();
    let leaf1 = unsafe { __cpuid(1) };
    if leaf1.ecx & (1 << 17) != 0 {
        features |= TlbFeatures::PCID;
    }
    let max_leaf = unsafe { __cpuid(0) }.eax;
    if max_leaf >= 7 {
        let leaf7 = unsafe { __cpuid_count(7, 0) };
        if leaf7.ebx & (1 << 10) != 0 {
            features |= TlbFeatures::INVPCID;
        }
    }
    features
}

/// Detecta e habilita PCID neste core.
///
/// # Safety
///
/// Ring 0, com CR3[11:0] == 0 (PCID do kernel ativo), antes de qualquer
/// remote call chegar a este core.
pub unsafe fn init() {
    let mut features = detect();
    if features.contains(TlbFeatures::PCID) {
        write_cr4(read_cr4() | CR4_PCIDE);
        features |= TlbFeatures::PCID_ENABLED;
        crate::kinfo!("(PCID) Enabled");
    } else {
        crate::kinfo!("(PCID) Not supported");
    }
    if features.contains(TlbFeatures::INVPCID) {
        crate::kinfo!("(PCID) INVPCID disponível");
    }
    FEATURES.store(features.bits(), Ordering::Release);
}

/// Capacidades registradas por `init`
pub fn features() -> TlbFeatures {
    TlbFeatures::from_bits_truncate(FEATURES.load(Ordering::Acquire))
}

/// Valor de CR3 para (root, pcid)
pub fn make_cr3(root: VSpaceRoot, pcid: Pcid) -> u64 {
    if features().contains(TlbFeatures::PCID_ENABLED) {
        (root.phys().as_u64() & CR3_ADDR_MASK) | (pcid.as_u16() as u64 & CR3_PCID_MASK)
    } else {
        root.phys().as_u64() & CR3_ADDR_MASK
    }
}

/// Root e PCID ativos neste core
pub fn current() -> (PhysAddr, Pcid) {
    let cr3 = read_cr3();
    let pcid = if features().contains(TlbFeatures::PCID_ENABLED) {
        cr3 & CR3_PCID_MASK
    } else {
        0
    };
    (
        PhysAddr::new(cr3 & CR3_ADDR_MASK),
        Pcid::try_new(pcid).unwrap_or(Pcid::KERNEL),
    )
}

#[inline]
pub(super) fn read_cr3() -> u64 {
    let cr3: u64;
    unsafe {
        asm!("mov {}, cr3", out(reg) cr3, options(nostack, preserves_flags));
    }
    cr3
}

#[inline]
pub(super) fn read_cr4() -> u64 {
    let cr4: u64;
    unsafe {
        asm!("mov {}, cr4", out(reg) cr4, options(nostack, preserves_flags));
    }
    cr4
}

#[inline]
pub(super) unsafe fn write_cr4(value: u64) {
    asm!("mov cr4, {}", in(reg) value, options(nostack, preserves_flags));
}

/// Alterna CR4.PGE: invalida todas as entradas de todos os PCIDs, globais inclusive.
pub(super) unsafe fn toggle_pge() {
    let cr4 = read_cr4();
    write_cr4(cr4 ^ CR4_PGE);
    write_cr4(cr4);
}
