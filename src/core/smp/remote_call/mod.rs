//! # Remote Calls (x86_64 SMP)
//!
//! Mecanismo pelo qual um core manda outro invalidar entradas de TLB depois
//! que um mapeamento é desfeito ou uma tag de address space é reciclada.
//!
//! ## 🏗️ Fluxo
//!
//! ```text
//! coordenador ──post──▶ CallMailbox ──IPI──▶ service ──▶ handle_remote_call
//!                                                           │ decode
//!                                                           ▼
//!                                               handler ──▶ TlbOps (hardware)
//!                                                           │
//! coordenador ◀──────────── is_complete ◀──── ACK (geração) ┘
//! ```
//!
//! ## ⚠️ Regras
//!
//! - Um registro que não decodifica é **fatal** ("Invalid remote call").
//! - No máximo uma call em voo por core; o mailbox recusa a segunda.
//! - O ACK acontece depois da invalidação, nunca antes.

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod kind;
pub mod mailbox;

pub use dispatch::{dispatch, handle_remote_call, INVALID_REMOTE_CALL};
pub use error::{RemoteCallError, RemoteCallResult};
pub use kind::{RemoteCall, RemoteCallKind, RemoteCallRecord};
pub use mailbox::{mailbox_for, CallMailbox, CallTicket, MailboxError, MAILBOXES};
