//! # Remote Calls - Tipos e Decodificação
//!
//! Um registro de remote call é uma tupla de palavras `(kind, arg0, arg1, arg2)`
//! escrita pelo coordenador. [`RemoteCallRecord::decode`] é a **única**
//! fronteira onde palavras cruas viram tipos; depois disso o dispatch é um
//! `match` exaustivo sobre [`RemoteCall`].
//!
//! ## Layout no fio
//!
//! | kind | call             | arg0                 | arg1         | arg2  |
//! |------|------------------|----------------------|--------------|-------|
//! | 0    | `InvalidatePcid` | escopo (tipo INVPCID)| endereço     | PCID  |
//! | 1    | `InvalidateAsid` | vspace root (PML4)   | ASID         | -     |

use super::error::{RemoteCallError, RemoteCallResult};
use crate::mm::addr::VirtAddr;
use crate::mm::vmm::tlb::{Asid, InvalidationScope, Pcid, VSpaceRoot};

/// Tipo de remote call (enumeração autoritativa compartilhada por todos os cores)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum RemoteCallKind {
    InvalidatePcid = 0,
    InvalidateAsid = 1,
}

impl RemoteCallKind {
    pub const ALL: [RemoteCallKind; 2] = [Self::InvalidatePcid, Self::InvalidateAsid];

    #[inline]
    pub const fn token(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for RemoteCallKind {
    type Error = RemoteCallError;

    fn try_from(raw: usize) -> RemoteCallResult<Self> {
        match raw {
            0 => Ok(Self::InvalidatePcid),
            1 => Ok(Self::InvalidateAsid),
            _ => Err(RemoteCallError::UnknownKind(raw)),
        }
    }
}

/// Registro cru, como entregue pelo coordenador. Imutável depois de postado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCallRecord {
    pub kind: usize,
    pub args: [usize; 3],
}

impl RemoteCallRecord {
    pub const fn new(kind: usize, arg0: usize, arg1: usize, arg2: usize) -> Self {
        Self {
            kind,
            args: [arg0, arg1, arg2],
        }
    }

    /// Estreita o registro para uma call tipada.
    pub fn decode(&self) -> RemoteCallResult<RemoteCall> {
        let [arg0, arg1, arg2] = self.args;
        match RemoteCallKind::try_from(self.kind)? {
            RemoteCallKind::InvalidatePcid => {
                let scope = InvalidationScope::from_raw(arg0 as u64)
                    .ok_or(RemoteCallError::InvalidScope(arg0))?;
                let addr = if scope.uses_address() {
                    VirtAddr::try_new(arg1 as u64)
                        .ok_or(RemoteCallError::InvalidAddress(arg1))?
                        .page()
                } else {
                    VirtAddr::new(0)
                };
                let pcid = Pcid::try_new(arg2 as u64).ok_or(RemoteCallError::InvalidPcid(arg2))?;
                Ok(RemoteCall::InvalidatePcid { pcid, addr, scope })
            }
            RemoteCallKind::InvalidateAsid => {
                let root =
                    VSpaceRoot::try_new(arg0 as u64).ok_or(RemoteCallError::InvalidRoot(arg0))?;
                let asid = Asid::try_new(arg1 as u64).ok_or(RemoteCallError::InvalidAsid(arg1))?;
                Ok(RemoteCall::InvalidateAsid { root, asid })
            }
        }
    }
}

/// Remote call decodificada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    /// Invalida por tag de contexto; `addr` só vale para `InvalidationScope::Address`
    InvalidatePcid {
        pcid: Pcid,
        addr: VirtAddr,
        scope: InvalidationScope,
    },
    /// Invalida todas as entradas do par (root, asid)
    InvalidateAsid { root: VSpaceRoot, asid: Asid },
}

impl RemoteCall {
    pub const fn kind(&self) -> RemoteCallKind {
        match self {
            Self::InvalidatePcid { .. } => RemoteCallKind::InvalidatePcid,
            Self::InvalidateAsid { .. } => RemoteCallKind::InvalidateAsid,
        }
    }

    /// Codifica para o layout do fio (lado do coordenador)
    pub fn encode(&self) -> RemoteCallRecord {
        match *self {
            Self::InvalidatePcid { pcid, addr, scope } => RemoteCallRecord::new(
                self.kind().token(),
                scope as usize,
                addr.as_usize(),
                pcid.as_u16() as usize,
            ),
            Self::InvalidateAsid { root, asid } => RemoteCallRecord::new(
                self.kind().token(),
                root.phys().as_u64() as usize,
                asid.as_u16() as usize,
                0,
            ),
        }
    }
}

impl From<RemoteCall> for RemoteCallRecord {
    fn from(call: RemoteCall) -> Self {
        call.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens_are_stable() {
        for kind in RemoteCallKind::ALL {
            assert_eq!(RemoteCallKind::try_from(kind.token()), Ok(kind));
        }
        assert_eq!(RemoteCallKind::InvalidatePcid.token(), 0);
        assert_eq!(RemoteCallKind::InvalidateAsid.token(), 1);
        assert_eq!(
            RemoteCallKind::try_from(2),
            Err(RemoteCallError::UnknownKind(2))
        );
    }

    #[test]
    fn test_decode_single_address_pcid() {
        let record = RemoteCallRecord::new(0, 0, 0x1000, 7);
        assert_eq!(
            record.decode(),
            Ok(RemoteCall::InvalidatePcid {
                pcid: Pcid::try_new(7).unwrap(),
                addr: VirtAddr::new(0x1000),
                scope: InvalidationScope::Address,
            })
        );
    }

    #[test]
    fn test_decode_ignores_address_for_whole_tag() {
        // Endereço não-canônico no slot ignorado não invalida a call
        let record = RemoteCallRecord::new(0, 1, 0x0000_8000_0000_0000, 7);
        assert_eq!(
            record.decode(),
            Ok(RemoteCall::InvalidatePcid {
                pcid: Pcid::try_new(7).unwrap(),
                addr: VirtAddr::new(0),
                scope: InvalidationScope::Context,
            })
        );
    }

    #[test]
    fn test_decode_asid_ignores_third_slot() {
        let record = RemoteCallRecord::new(1, 0x20_0000, 3, usize::MAX);
        assert_eq!(
            record.decode(),
            Ok(RemoteCall::InvalidateAsid {
                root: VSpaceRoot::try_new(0x20_0000).unwrap(),
                asid: Asid::try_new(3).unwrap(),
            })
        );
    }

    #[test]
    fn test_decode_rejects_malformed_slots() {
        let cases = [
            (RemoteCallRecord::new(9, 0, 0, 0), RemoteCallError::UnknownKind(9)),
            (RemoteCallRecord::new(0, 4, 0, 1), RemoteCallError::InvalidScope(4)),
            (RemoteCallRecord::new(0, 0, 0x1000, 4096), RemoteCallError::InvalidPcid(4096)),
            (
                RemoteCallRecord::new(0, 0, 0x0000_8000_0000_0000, 1),
                RemoteCallError::InvalidAddress(0x0000_8000_0000_0000),
            ),
            (RemoteCallRecord::new(1, 0, 3, 0), RemoteCallError::InvalidRoot(0)),
            (RemoteCallRecord::new(1, 0x1008, 3, 0), RemoteCallError::InvalidRoot(0x1008)),
            (RemoteCallRecord::new(1, 0x1000, 5000, 0), RemoteCallError::InvalidAsid(5000)),
        ];
        for (record, expected) in cases {
            assert_eq!(record.decode(), Err(expected), "{:?}", record);
        }
    }

    #[test]
    fn test_encode_matches_wire_layout() {
        let call = RemoteCall::InvalidatePcid {
            pcid: Pcid::try_new(7).unwrap(),
            addr: VirtAddr::new(0x1000),
            scope: InvalidationScope::Address,
        };
        assert_eq!(RemoteCallRecord::from(call), RemoteCallRecord::new(0, 0, 0x1000, 7));
        assert_eq!(call.encode().decode(), Ok(call));

        let call = RemoteCall::InvalidateAsid {
            root: VSpaceRoot::try_new(0x20_0000).unwrap(),
            asid: Asid::try_new(3).unwrap(),
        };
        assert_eq!(call.encode(), RemoteCallRecord::new(1, 0x20_0000, 3, 0));
    }
}
