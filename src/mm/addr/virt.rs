use crate::mm::config::{align_down, align_up, is_aligned, PAGE_SIZE, VIRT_ADDR_BITS};
use core::fmt;

/// Endereço virtual (wrapper type-safe)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(u64);

impl VirtAddr {
    /// Cria novo endereço virtual sem validação
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Cria endereço virtual apenas se estiver em forma canônica
    /// (bits 63..47 iguais ao bit 47).
    #[inline]
    pub const fn try_new(addr: u64) -> Option<Self> {
        if Self::is_canonical(addr) {
            Some(Self(addr))
        } else {
            None
        }
    }

    /// Verifica a extensão de sinal a partir do bit 47
    #[inline]
    pub const fn is_canonical(addr: u64) -> bool {
        let shift = 64 - VIRT_ADDR_BITS;
        (((addr << shift) as i64) >> shift) as u64 == addr
    }

    /// Retorna o valor interno como u64
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Retorna o valor interno como usize
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Alinha para baixo
    #[inline]
    pub fn align_down(self, align: u64) -> Self {
        Self(align_down(self.0 as usize, align as usize) as u64)
    }

    /// Alinha para cima
    #[inline]
    pub fn align_up(self, align: u64) -> Self {
        Self(align_up(self.0 as usize, align as usize) as u64)
    }

    /// Verifica alinhamento
    #[inline]
    pub fn is_aligned(self, align: u64) -> bool {
        is_aligned(self.0 as usize, align as usize)
    }

    /// Página de 4 KiB que contém este endereço
    #[inline]
    pub fn page(self) -> Self {
        self.align_down(PAGE_SIZE as u64)
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtAddr({:#x})", self.0)
    }
}

impl fmt::LowerHex for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_addresses() {
        assert!(VirtAddr::try_new(0).is_some());
        assert!(VirtAddr::try_new(0x0000_7FFF_FFFF_F000).is_some());
        assert!(VirtAddr::try_new(0xFFFF_8000_0000_0000).is_some());
        assert!(VirtAddr::try_new(0x0000_8000_0000_0000).is_none());
        assert!(VirtAddr::try_new(0xFFFF_7FFF_FFFF_FFFF).is_none());
    }

    #[test]
    fn test_page_of_address() {
        assert_eq!(VirtAddr::new(0x1234).page(), VirtAddr::new(0x1000));
        assert_eq!(VirtAddr::new(0x1000).page(), VirtAddr::new(0x1000));
    }
}
