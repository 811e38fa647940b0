//! # Remote Call Dispatcher
//!
//! Ponto de entrada único no core alvo. Decodifica o registro e invoca
//! exatamente um handler. Um registro que não decodifica indica que os cores
//! discordam sobre o protocolo (skew de build ou corrupção de memória): não
//! há recuperação, o core loga e trava.
//!
//! Não guarda estado entre invocações; não pega locks.

use super::handlers::{invalidate_local_asid, invalidate_local_pcid};
use super::kind::{RemoteCall, RemoteCallRecord};
use crate::core::panic::fail;
use crate::mm::vmm::tlb::TlbOps;

/// Condição fatal reportada quando o registro não corresponde a nenhuma call
pub const INVALID_REMOTE_CALL: &str = "Invalid remote call";

/// Atende uma remote call crua neste core.
///
/// Retorna apenas depois que a invalidação local está completa e visível.
/// Registros inválidos terminam em [`fail`] sem tocar no TLB.
pub fn handle_remote_call<T: TlbOps + ?Sized>(tlb: &mut T, record: RemoteCallRecord) {
    match record.decode() {
        Ok(call) => dispatch(tlb, call),
        Err(_err) => {
            crate::kerror!("(RCALL) Registro rejeitado, kind=", record.kind);
            crate::kerror!(_err.as_str(), _err.raw());
            fail(INVALID_REMOTE_CALL)
        }
    }
}

/// Executa uma call já decodificada.
pub fn dispatch<T: TlbOps + ?Sized>(tlb: &mut T, call: RemoteCall) {
    match call {
        RemoteCall::InvalidatePcid { pcid, addr, scope } => {
            invalidate_local_pcid(tlb, pcid, addr, scope)
        }
        RemoteCall::InvalidateAsid { root, asid } => invalidate_local_asid(tlb, root, asid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::addr::VirtAddr;
    use crate::mm::vmm::tlb::{Asid, Pcid, VSpaceRoot};
    use crate::mm::vmm::SoftTlb;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    const ROOT: u64 = 0x10_0000;
    const ROOT2: u64 = 0x20_0000;

    fn root(raw: u64) -> VSpaceRoot {
        VSpaceRoot::try_new(raw).unwrap()
    }

    fn pcid(raw: u64) -> Pcid {
        Pcid::try_new(raw).unwrap()
    }

    /// TLB com tags 3, 4, 5, 7 e 9 em três páginas, e tags 3 e 7 sob um segundo root
    fn populated() -> SoftTlb {
        let mut tlb = SoftTlb::new();
        for tag in [3u64, 4, 5, 7, 9] {
            for page in [0x1000u64, 0x2000, 0x3000] {
                tlb.insert(root(ROOT), pcid(tag), VirtAddr::new(page), false);
            }
        }
        tlb.insert(root(ROOT2), pcid(3), VirtAddr::new(0x1000), false);
        tlb.insert(root(ROOT2), pcid(7), VirtAddr::new(0x1000), false);
        tlb
    }

    #[test]
    fn test_pcid_single_address_scenario() {
        let mut tlb = populated();
        let before = tlb.len();

        handle_remote_call(&mut tlb, RemoteCallRecord::new(0, 0, 0x1000, 7));

        assert_eq!(tlb.invocations(), 1);
        assert!(!tlb.is_cached(pcid(7), VirtAddr::new(0x1000)));
        assert!(tlb.is_cached(pcid(7), VirtAddr::new(0x2000)));
        assert!(tlb.is_cached(pcid(7), VirtAddr::new(0x3000)));
        // Uma página do root 1 e a mesma página do root 2 compartilham o PCID 7
        assert_eq!(tlb.len(), before - 2);
    }

    #[test]
    fn test_pcid_whole_tag_scenario() {
        let mut tlb = populated();

        handle_remote_call(&mut tlb, RemoteCallRecord::new(0, 1, 0, 7));

        assert_eq!(tlb.invocations(), 1);
        assert_eq!(tlb.count_for(pcid(7)), 0);
        assert_eq!(tlb.count_for(pcid(5)), 3);
        assert_eq!(tlb.count_for(pcid(9)), 3);
    }

    #[test]
    fn test_asid_scenario() {
        let mut tlb = populated();
        let asid3 = Asid::try_new(3).unwrap().as_pcid();
        let asid5 = Asid::try_new(5).unwrap().as_pcid();

        handle_remote_call(&mut tlb, RemoteCallRecord::new(1, ROOT as usize, 3, 0));

        assert_eq!(tlb.invocations(), 1);
        for page in [0x1000u64, 0x2000, 0x3000] {
            assert!(!tlb.is_cached_in(root(ROOT), asid3, VirtAddr::new(page)));
            assert!(tlb.is_cached_in(root(ROOT), asid5, VirtAddr::new(page)));
        }
        assert!(tlb.is_cached_in(root(ROOT2), asid3, VirtAddr::new(0x1000)));
    }

    #[test]
    fn test_all_including_global_scenario() {
        let mut tlb = populated();
        tlb.insert(root(ROOT), pcid(0), VirtAddr::new(0xFFFF_8000_0000_0000), true);

        handle_remote_call(&mut tlb, RemoteCallRecord::new(0, 2, 0, 7));

        assert_eq!(tlb.invocations(), 1);
        assert!(tlb.is_empty());
    }

    #[test]
    fn test_all_contexts_scenario() {
        let mut tlb = populated();
        let kernel = VirtAddr::new(0xFFFF_8000_0000_0000);
        tlb.insert(root(ROOT), pcid(0), kernel, true);

        // Slot de endereço e PCID ignorados neste escopo
        handle_remote_call(&mut tlb, RemoteCallRecord::new(0, 3, 0x0000_8000_0000_0000, 7));

        assert_eq!(tlb.invocations(), 1);
        assert_eq!(tlb.len(), 1);
        assert!(tlb.is_cached(pcid(0), kernel));
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        let records = [
            RemoteCallRecord::new(0, 0, 0x2000, 5),
            RemoteCallRecord::new(0, 1, 0, 9),
            RemoteCallRecord::new(1, ROOT as usize, 4, 0),
        ];
        for record in records {
            let mut tlb = populated();
            handle_remote_call(&mut tlb, record);
            let once = tlb.snapshot();
            handle_remote_call(&mut tlb, record);
            assert_eq!(tlb.snapshot(), once, "{:?}", record);
            assert_eq!(tlb.invocations(), 2);
        }
    }

    #[test]
    #[should_panic(expected = "Invalid remote call")]
    fn test_unknown_kind_is_fatal() {
        let mut tlb = populated();
        handle_remote_call(&mut tlb, RemoteCallRecord::new(0x42, 0, 0x1000, 7));
    }

    #[test]
    fn test_unknown_kind_has_no_side_effects() {
        let mut tlb = populated();
        let before = tlb.snapshot();

        let result = catch_unwind(AssertUnwindSafe(|| {
            handle_remote_call(&mut tlb, RemoteCallRecord::new(usize::MAX, 1, 0, 7));
        }));

        assert!(result.is_err());
        assert_eq!(tlb.invocations(), 0);
        assert_eq!(tlb.snapshot(), before);
    }

    #[test]
    #[should_panic(expected = "Invalid remote call")]
    fn test_malformed_argument_is_fatal() {
        let mut tlb = populated();
        handle_remote_call(&mut tlb, RemoteCallRecord::new(0, 0, 0x1000, 0x1_0000));
    }

    #[cfg(not(feature = "no_logs"))]
    #[test]
    fn test_rejection_is_logged() {
        let mut tlb = SoftTlb::new();
        let _ = catch_unwind(AssertUnwindSafe(|| {
            handle_remote_call(&mut tlb, RemoteCallRecord::new(0x5EED, 0, 0, 0));
        }));
        assert!(crate::drivers::serial::captured_contains(
            "(RCALL) Registro rejeitado, kind=0x0000000000005EED"
        ));
        assert!(crate::drivers::serial::captured_contains(INVALID_REMOTE_CALL));
    }
}
