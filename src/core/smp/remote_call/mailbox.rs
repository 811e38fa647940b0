//! # Mailbox de Remote Call (por CPU)
//!
//! Torna explícita a pré-condição "no máximo uma call em voo por core alvo".
//! Cada CPU tem um [`CallMailbox`] com uma máquina de estados:
//!
//! ```text
//!   Idle ──post──▶ Writing ──publish──▶ Posted ──IPI──▶ Running ──ACK──▶ Idle
//! ```
//!
//! - `post` (coordenador): recusa com `MailboxError::Busy` se não estiver
//!   `Idle`. Publica o registro com `Release` antes de a IPI ser enviada.
//! - `service` (IPI no alvo): lê o registro com `Acquire`, despacha e só
//!   então incrementa a geração de conclusão (`Release`).
//! - `is_complete` (coordenador): `Acquire` na geração; `true` implica que a
//!   invalidação remota já aconteceu.
//!
//! Uma IPI atende exatamente uma call. IPIs sem call postada são espúrias e
//! apenas contabilizadas.

use core::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use super::dispatch::handle_remote_call;
use super::kind::RemoteCallRecord;
use crate::core::smp::ipi::CpuId;
use crate::mm::config::MAX_CPUS;
use crate::mm::vmm::tlb::{TlbOps, TLB_STATS};

const IDLE: u8 = 0;
const WRITING: u8 = 1;
const POSTED: u8 = 2;
const RUNNING: u8 = 3;

/// Erros do lado do coordenador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// Já existe uma call em voo para este core
    Busy,
}

/// Identifica uma call postada; concluída quando a geração a alcança.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallTicket(u64);

impl CallTicket {
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Slot de remote call de uma CPU
#[repr(align(64))]
pub struct CallMailbox {
    state: AtomicU8,
    kind: AtomicUsize,
    args: [AtomicUsize; 3],
    completed: AtomicU64,
}

impl CallMailbox {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
            kind: AtomicUsize::new(0),
            args: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
            completed: AtomicU64::new(0),
        }
    }

    /// Posta um registro. Deve ser seguido da IPI `IpiVector::RemoteCall`.
    pub fn post(&self, record: RemoteCallRecord) -> Result<CallTicket, MailboxError> {
        if self
            .state
            .compare_exchange(IDLE, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(MailboxError::Busy);
        }

        self.kind.store(record.kind, Ordering::Relaxed);
        for (slot, arg) in self.args.iter().zip(record.args) {
            slot.store(arg, Ordering::Relaxed);
        }
        // `completed` só avança em Running, que não pode ocorrer enquanto
        // seguramos Writing.
        let ticket = CallTicket(self.completed.load(Ordering::Relaxed) + 1);

        self.state.store(POSTED, Ordering::Release);
        Ok(ticket)
    }

    /// A call do ticket já foi executada neste core?
    pub fn is_complete(&self, ticket: CallTicket) -> bool {
        self.completed.load(Ordering::Acquire) >= ticket.0
    }

    /// Nenhuma call em voo
    pub fn is_idle(&self) -> bool {
        self.state.load(Ordering::Acquire) == IDLE
    }

    /// Gerações concluídas até agora
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Atende a call postada (contexto de IPI no core dono do mailbox).
    ///
    /// Retorna `false` para IPI espúria. Um registro inválido é fatal e
    /// nunca chega ao ACK.
    pub fn service<T: TlbOps + ?Sized>(&self, tlb: &mut T) -> bool {
        if self
            .state
            .compare_exchange(POSTED, RUNNING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            crate::ktrace!("(RCALL) IPI espúria");
            TLB_STATS.spurious_ipis.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let record = RemoteCallRecord::new(
            self.kind.load(Ordering::Relaxed),
            self.args[0].load(Ordering::Relaxed),
            self.args[1].load(Ordering::Relaxed),
            self.args[2].load(Ordering::Relaxed),
        );

        handle_remote_call(tlb, record);
        TLB_STATS.remote_calls.fetch_add(1, Ordering::Relaxed);

        // ACK antes de liberar o slot: um novo post não pode receber um
        // ticket que esta geração já satisfaz.
        self.completed.fetch_add(1, Ordering::Release);
        self.state.store(IDLE, Ordering::Release);
        true
    }
}

/// Um mailbox por CPU lógica
pub static MAILBOXES: [CallMailbox; MAX_CPUS] = {
    const EMPTY: CallMailbox = CallMailbox::new();
    [EMPTY; MAX_CPUS]
};

/// Mailbox da CPU `cpu`, se estiver dentro de `MAX_CPUS`
pub fn mailbox_for(cpu: CpuId) -> Option<&'static CallMailbox> {
    MAILBOXES.get(cpu as usize)
}
