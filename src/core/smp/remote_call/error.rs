//! Tipos de Erro da Decodificação de Remote Calls
//!
//! Toda palavra crua que não pode ser estreitada para o tipo esperado gera
//! um destes erros. O dispatcher trata qualquer um deles como a mesma
//! condição fatal ("Invalid remote call"); a variante só serve para o log.

/// Erros de decodificação de um `RemoteCallRecord`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCallError {
    /// Token de tipo desconhecido
    UnknownKind(usize),
    /// Escopo fora dos tipos de INVPCID
    InvalidScope(usize),
    /// PCID >= 4096
    InvalidPcid(usize),
    /// Endereço virtual não-canônico
    InvalidAddress(usize),
    /// Root nulo, desalinhado ou acima de MAXPHYADDR
    InvalidRoot(usize),
    /// ASID fora do intervalo
    InvalidAsid(usize),
}

impl RemoteCallError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "tipo de remote call desconhecido: ",
            Self::InvalidScope(_) => "escopo de invalidação inválido: ",
            Self::InvalidPcid(_) => "PCID fora do intervalo: ",
            Self::InvalidAddress(_) => "endereço não-canônico: ",
            Self::InvalidRoot(_) => "vspace root inválido: ",
            Self::InvalidAsid(_) => "ASID fora do intervalo: ",
        }
    }

    /// Palavra crua rejeitada
    pub fn raw(&self) -> usize {
        match *self {
            Self::UnknownKind(raw)
            | Self::InvalidScope(raw)
            | Self::InvalidPcid(raw)
            | Self::InvalidAddress(raw)
            | Self::InvalidRoot(raw)
            | Self::InvalidAsid(raw) => raw,
        }
    }
}

impl core::fmt::Display for RemoteCallError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{:#x}", self.as_str(), self.raw())
    }
}

/// Tipo Result específico para decodificação de remote calls
pub type RemoteCallResult<T> = Result<T, RemoteCallError>;
