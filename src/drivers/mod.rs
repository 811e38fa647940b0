//! # Kernel Driver Layer
//!
//! Apenas o driver serial, usado como sink do sistema de logs.

pub mod serial; // UART 16550 - Logs
