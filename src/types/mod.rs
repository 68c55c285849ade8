use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier for an interned symbol name. Stable for the lifetime of one
/// index store; assigned sequentially by the symbol name interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Identifier for an indexed file path, assigned by the path interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl SymbolId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl FileId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Source span of a single name occurrence.
///
/// Lines and columns are 1-based; `end_col` is exclusive, so the span of a
/// three-character name starting in column 5 is `[5, 8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }
}

/// How a name occurrence is used at its site.
///
/// Exactly one kind is recorded per reference. The kind is derived from the
/// syntactic context the occurrence was reached under; see
/// `indexing::ExprContext::ref_kind` for the precedence between
/// simultaneously active context flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    /// The value is read only to be called.
    Call,
    /// The value is read for any other use.
    Read,
    /// The lvalue is assigned to (plain assignment).
    Write,
    /// The lvalue is read and written (compound assignment, increment).
    Modify,
    /// The lvalue's address escapes.
    AddressTaken,
    /// The occurrence declares or defines the entity.
    Definition,
    /// No distinguishing context (discarded value, scope qualifier, ...).
    Use,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Call => "Call",
            RefKind::Read => "Read",
            RefKind::Write => "Write",
            RefKind::Modify => "Modify",
            RefKind::AddressTaken => "AddressTaken",
            RefKind::Definition => "Definition",
            RefKind::Use => "Use",
        }
    }
}

impl FromStr for RefKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Call" => Ok(RefKind::Call),
            "Read" => Ok(RefKind::Read),
            "Write" => Ok(RefKind::Write),
            "Modify" => Ok(RefKind::Modify),
            "AddressTaken" => Ok(RefKind::AddressTaken),
            "Definition" => Ok(RefKind::Definition),
            "Use" => Ok(RefKind::Use),
            _ => Err("Unknown reference kind"),
        }
    }
}

/// Kind of a declared entity.
///
/// `Unknown` is the sentinel used when a reference is recorded before the
/// declaring node has been visited. A sentinel entry may later be
/// reconciled to a concrete kind; a concrete kind is never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Struct,
    Enum,
    Constant,
    Field,
    Variable,
    Parameter,
    TypeAlias,
    Namespace,
    Macro,
    Unknown,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
            SymbolKind::Class => "Class",
            SymbolKind::Struct => "Struct",
            SymbolKind::Enum => "Enum",
            SymbolKind::Constant => "Constant",
            SymbolKind::Field => "Field",
            SymbolKind::Variable => "Variable",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::TypeAlias => "TypeAlias",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Macro => "Macro",
            SymbolKind::Unknown => "Unknown",
        }
    }

    /// Parse from string, falling back to the sentinel for unknown values.
    pub fn from_str_with_default(s: &str) -> Self {
        s.parse().unwrap_or(SymbolKind::Unknown)
    }
}

impl FromStr for SymbolKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Function" => Ok(SymbolKind::Function),
            "Method" => Ok(SymbolKind::Method),
            "Class" => Ok(SymbolKind::Class),
            "Struct" => Ok(SymbolKind::Struct),
            "Enum" => Ok(SymbolKind::Enum),
            "Constant" => Ok(SymbolKind::Constant),
            "Field" => Ok(SymbolKind::Field),
            "Variable" => Ok(SymbolKind::Variable),
            "Parameter" => Ok(SymbolKind::Parameter),
            "TypeAlias" => Ok(SymbolKind::TypeAlias),
            "Namespace" => Ok(SymbolKind::Namespace),
            "Macro" => Ok(SymbolKind::Macro),
            "Unknown" => Ok(SymbolKind::Unknown),
            _ => Err("Unknown symbol kind"),
        }
    }
}

/// One recorded occurrence of a symbol at a source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub file: FileId,
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
    pub symbol: SymbolId,
    pub kind: RefKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_newtypes() {
        let sym = SymbolId::new(42);
        assert_eq!(sym.value(), 42);
        let file = FileId::new(7);
        assert_eq!(file.value(), 7);
    }

    #[test]
    fn test_ref_kind_round_trip() {
        let kinds = [
            RefKind::Call,
            RefKind::Read,
            RefKind::Write,
            RefKind::Modify,
            RefKind::AddressTaken,
            RefKind::Definition,
            RefKind::Use,
        ];
        for kind in kinds {
            assert_eq!(kind.as_str().parse::<RefKind>().unwrap(), kind);
        }
        assert!("Frobnicate".parse::<RefKind>().is_err());
    }

    #[test]
    fn test_symbol_kind_sentinel_fallback() {
        assert_eq!(
            SymbolKind::from_str_with_default("Class"),
            SymbolKind::Class
        );
        assert_eq!(
            SymbolKind::from_str_with_default("NotAKind"),
            SymbolKind::Unknown
        );
    }

    #[test]
    fn test_id_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SymbolId::new(1));
        assert!(set.contains(&SymbolId::new(1)));
        assert!(!set.contains(&SymbolId::new(2)));
    }
}
