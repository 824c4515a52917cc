//! The symbol provider seam between templates and the data they render.

use std::collections::HashMap;

/// Supplies values for data symbols found in template directives.
///
/// Both methods are called with arbitrary names taken from the document and
/// must answer `None` for symbols they do not recognize.
pub trait SymbolProvider {
    /// Resolve a symbol to the text that replaces it.
    fn resolve_string(&mut self, symbol: &str) -> Option<String>;

    /// Resolve a symbol to the condition of an `If` directive.
    fn resolve_boolean(&mut self, symbol: &str) -> Option<bool>;
}

impl<P: SymbolProvider + ?Sized> SymbolProvider for &mut P {
    fn resolve_string(&mut self, symbol: &str) -> Option<String> {
        (**self).resolve_string(symbol)
    }

    fn resolve_boolean(&mut self, symbol: &str) -> Option<bool> {
        (**self).resolve_boolean(symbol)
    }
}

impl<P: SymbolProvider + ?Sized> SymbolProvider for Box<P> {
    fn resolve_string(&mut self, symbol: &str) -> Option<String> {
        (**self).resolve_string(symbol)
    }

    fn resolve_boolean(&mut self, symbol: &str) -> Option<bool> {
        (**self).resolve_boolean(symbol)
    }
}

/// Symbol provider backed by fixed in-memory values.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbols {
    strings: HashMap<String, String>,
    booleans: HashMap<String, bool>,
}

impl StaticSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol that resolves to text.
    pub fn with_string(mut self, symbol: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(symbol.into(), value.into());
        self
    }

    /// Add a symbol that resolves to a condition.
    pub fn with_boolean(mut self, symbol: impl Into<String>, value: bool) -> Self {
        self.booleans.insert(symbol.into(), value);
        self
    }
}

impl SymbolProvider for StaticSymbols {
    fn resolve_string(&mut self, symbol: &str) -> Option<String> {
        self.strings.get(symbol).cloned()
    }

    fn resolve_boolean(&mut self, symbol: &str) -> Option<bool> {
        self.booleans.get(symbol).copied()
    }
}
