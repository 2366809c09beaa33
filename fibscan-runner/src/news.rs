//! Pre-cycle news gate.
//!
//! Consulted before every scan cycle; a blocked symbol skips evaluation for
//! that cycle only. No calendar source is wired in yet, so the default gate
//! lets everything through.

pub trait NewsFilter: Send + Sync {
    /// Returns false when scheduled news should suppress signals for `symbol`.
    fn allows(&self, symbol: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysClear;

impl NewsFilter for AlwaysClear {
    fn allows(&self, _symbol: &str) -> bool {
        true
    }
}

/// Blocks a fixed set of symbols.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    symbols: Vec<String>,
}

impl BlockList {
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl NewsFilter for BlockList {
    fn allows(&self, symbol: &str) -> bool {
        !self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}
