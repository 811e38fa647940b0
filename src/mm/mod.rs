//! # Memory Management Subsystem (MM)
//!
//! Apenas o necessário para as remote calls de TLB:
//!
//! | Módulo   | Responsabilidade |
//! |----------|------------------|
//! | `config` | Constantes de página, endereçamento e SMP. |
//! | `addr`   | `VirtAddr`/`PhysAddr` com estreitamento validado. |
//! | `vmm`    | Tags de TLB, escopos, `TlbOps` e o modelo `SoftTlb`. |

pub mod addr;
pub mod config;
pub mod vmm;
