//! Per-render symbol classification.

use std::collections::HashMap;

/// How a symbol inside a directive tag is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Not known yet, or known not to resolve.
    Invalid,
    /// A data symbol the provider has resolved at least once.
    Variable,
    If,
    Else,
    EndIf,
    /// The `=` output marker.
    Output,
}

impl SymbolKind {
    /// Whether symbols of this kind may be handed to a symbol provider.
    pub fn is_data(self) -> bool {
        matches!(self, SymbolKind::Invalid | SymbolKind::Variable)
    }
}

/// The structural keywords every table starts with.
const KEYWORDS: [(&str, SymbolKind); 4] = [
    ("If", SymbolKind::If),
    ("Else", SymbolKind::Else),
    ("EndIf", SymbolKind::EndIf),
    ("=", SymbolKind::Output),
];

/// Symbol table owned by a single document expansion.
///
/// Keywords are seeded on creation and can never be reclassified; data
/// symbols are promoted from [`SymbolKind::Invalid`] to
/// [`SymbolKind::Variable`] after their first successful resolution.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    kinds: HashMap<String, SymbolKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut kinds = HashMap::with_capacity(64);
        for (name, kind) in KEYWORDS {
            kinds.insert(name.to_string(), kind);
        }
        Self { kinds }
    }

    pub fn kind(&self, symbol: &str) -> SymbolKind {
        self.kinds.get(symbol).copied().unwrap_or(SymbolKind::Invalid)
    }

    /// Mark `symbol` as a resolvable variable. Keywords keep their meaning.
    pub fn promote(&mut self, symbol: &str) {
        if self.kind(symbol) == SymbolKind::Invalid {
            self.kinds.insert(symbol.to_string(), SymbolKind::Variable);
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_seeded() {
        let table = SymbolTable::new();
        assert_eq!(table.kind("If"), SymbolKind::If);
        assert_eq!(table.kind("Else"), SymbolKind::Else);
        assert_eq!(table.kind("EndIf"), SymbolKind::EndIf);
        assert_eq!(table.kind("="), SymbolKind::Output);
        assert_eq!(table.kind("if"), SymbolKind::Invalid);
    }

    #[test]
    fn test_promotion_never_shadows_keywords() {
        let mut table = SymbolTable::new();
        table.promote("If");
        table.promote("=");
        assert_eq!(table.kind("If"), SymbolKind::If);
        assert_eq!(table.kind("="), SymbolKind::Output);

        table.promote("gpio.4");
        assert_eq!(table.kind("gpio.4"), SymbolKind::Variable);
    }
}
