//! Panic Handler e caminho fatal.
//!
//! O "Airbag" do sistema. Condições irrecuperáveis (ex: remote call que não
//! corresponde a nenhum handler) passam por [`fail`], que loga o motivo na
//! serial e entra em pânico. Em bare-metal o `#[panic_handler]` abaixo
//! desabilita interrupções e trava o core.

/// Falha fatal: loga e não retorna.
#[cold]
#[inline(never)]
pub fn fail(reason: &'static str) -> ! {
    crate::kerror!("================ KERNEL PANIC ================");
    crate::kerror!(reason);
    crate::kerror!("==============================================");
    panic!("{}", reason);
}

#[cfg(all(not(test), target_os = "none", target_arch = "x86_64"))]
#[panic_handler]
fn panic(info: &::core::panic::PanicInfo) -> ! {
    // 1. Segurança imediata: parar interrupções
    unsafe { ::core::arch::asm!("cli", options(nomem, nostack)) };

    // 2. Log (Serial é o mais confiável aqui)
    if let Some(reason) = info.message().as_str() {
        crate::kerror!("Reason: ");
        crate::kerror!(reason);
    }
    if let Some(location) = info.location() {
        crate::kerror!(location.file());
        crate::kerror!("Line: ", location.line());
    }

    // 3. Trava o core
    loop {
        unsafe { ::core::arch::asm!("cli; hlt", options(nomem, nostack)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "fatal de teste")]
    fn test_fail_panics_with_reason() {
        fail("fatal de teste");
    }
}
