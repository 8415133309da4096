//! Scope-aware symbol table.
//!
//! Entries live in one arena; a `SymbolId` is the entry's creation index, so
//! ids are unique and strictly increasing in grammar-recognition order.
//! Names are not unique keys: the same name may be declared in many scopes,
//! and exact disambiguation is always the `(name, id)` pair.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

/// Primitive type tags plus the literal tags used while checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Bro,
    Sis,
    Bipolar,
    Mainchar,
    Zombie,
    NumLit,
    DecLit,
    BoolLit,
    CharLit,
    StrLit,
    NullLit,
    /// Sentinel for a sub-expression whose check already failed.
    Error,
}

impl DataType {
    /// Numeric conversion rank: char < num < dec. Non-numeric types have no
    /// rank.
    pub fn rank(self) -> Option<u8> {
        match self {
            DataType::CharLit | DataType::Mainchar => Some(0),
            DataType::NumLit | DataType::Bro => Some(1),
            DataType::DecLit | DataType::Sis => Some(2),
            _ => None,
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, DataType::BoolLit | DataType::Bipolar)
    }

    pub fn is_null(self) -> bool {
        matches!(self, DataType::NullLit | DataType::Zombie)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bro => "bro",
            DataType::Sis => "sis",
            DataType::Bipolar => "bipolar",
            DataType::Mainchar => "mainchar",
            DataType::Zombie => "zombie",
            DataType::NumLit => "num_lit",
            DataType::DecLit => "dec_lit",
            DataType::BoolLit => "bool_lit",
            DataType::CharLit => "char_lit",
            DataType::StrLit => "str_lit",
            DataType::NullLit => "null_lit",
            DataType::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

/// A type together with its array dimensions (`None` for scalars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    pub ty: DataType,
    pub dims: Option<Vec<usize>>,
}

impl Datatype {
    pub fn scalar(ty: DataType) -> Self {
        Self { ty, dims: None }
    }

    pub fn new(ty: DataType, dims: Option<Vec<usize>>) -> Self {
        Self { ty, dims }
    }

    pub fn is_error(&self) -> bool {
        self.ty == DataType::Error
    }

    /// Whether a value of type `actual` may flow into a slot of type
    /// `expected`: dimensions must match in count with each expected extent
    /// at least as large, and the expected type's rank must dominate (with
    /// booleans and nulls forming their own closed pairs).
    pub fn accepts(&self, actual: &Datatype) -> bool {
        dims_accept(self.dims.as_deref(), actual.dims.as_deref()) && type_accepts(self.ty, actual.ty)
    }

    /// Human-readable form used in diagnostics, e.g. `fam 3 bro`.
    pub fn message(&self) -> String {
        let mut out = String::new();
        if let Some(dims) = &self.dims {
            for dim in dims {
                out.push_str(&format!("fam {dim} "));
            }
        }
        out.push_str(&self.ty.to_string());
        out
    }
}

fn dims_accept(expected: Option<&[usize]>, actual: Option<&[usize]>) -> bool {
    match (expected, actual) {
        (None, None) => true,
        (Some(e), Some(a)) => e.len() == a.len() && e.iter().zip(a).all(|(e, a)| e >= a),
        _ => false,
    }
}

fn type_accepts(expected: DataType, actual: DataType) -> bool {
    if expected.is_boolean() && actual.is_boolean() {
        return true;
    }
    if expected.is_null() && actual.is_null() {
        return true;
    }
    match (expected.rank(), actual.rank()) {
        (Some(e), Some(a)) => e >= a,
        _ => false,
    }
}

/// Mutable per-symbol state maintained by the later frontend stages.
#[derive(Debug, Clone)]
pub struct SymbolFlags {
    pub declared: bool,
    pub initialized: bool,
    pub might_not_be_initialized: bool,
    pub read_only: bool,
}

impl Default for SymbolFlags {
    fn default() -> Self {
        Self {
            declared: false,
            initialized: false,
            might_not_be_initialized: true,
            read_only: false,
        }
    }
}

/// One row of the table: either an anonymous lexical block or a named,
/// typed symbol.
#[derive(Debug)]
pub enum SymbolEntry {
    Scope {
        id: SymbolId,
        parent: Option<SymbolId>,
    },
    Symbol {
        id: SymbolId,
        parent: Option<SymbolId>,
        name: String,
        data_type: DataType,
        dims: Option<Vec<usize>>,
        is_function: bool,
        flags: SymbolFlags,
        register: Option<String>,
    },
}

impl SymbolEntry {
    pub fn id(&self) -> SymbolId {
        match self {
            SymbolEntry::Scope { id, .. } | SymbolEntry::Symbol { id, .. } => *id,
        }
    }

    pub fn parent(&self) -> Option<SymbolId> {
        match self {
            SymbolEntry::Scope { parent, .. } | SymbolEntry::Symbol { parent, .. } => *parent,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            SymbolEntry::Symbol {
                is_function: true,
                ..
            }
        )
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SymbolEntry::Symbol { name, .. } => Some(name),
            SymbolEntry::Scope { .. } => None,
        }
    }

    pub fn datatype(&self) -> Datatype {
        match self {
            SymbolEntry::Symbol {
                data_type, dims, ..
            } => Datatype::new(*data_type, dims.clone()),
            SymbolEntry::Scope { .. } => Datatype::scalar(DataType::Error),
        }
    }

    pub fn flags(&self) -> &SymbolFlags {
        match self {
            SymbolEntry::Symbol { flags, .. } => flags,
            SymbolEntry::Scope { .. } => {
                panic!("scope markers carry no flags")
            }
        }
    }

    pub fn flags_mut(&mut self) -> &mut SymbolFlags {
        match self {
            SymbolEntry::Symbol { flags, .. } => flags,
            SymbolEntry::Scope { .. } => {
                panic!("scope markers carry no flags")
            }
        }
    }

    pub fn register(&self) -> Option<&str> {
        match self {
            SymbolEntry::Symbol { register, .. } => register.as_deref(),
            SymbolEntry::Scope { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    by_name: HashMap<String, Vec<SymbolId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_id(&self) -> SymbolId {
        SymbolId(self.entries.len())
    }

    pub fn insert_scope(&mut self, parent: Option<SymbolId>) -> SymbolId {
        let id = self.next_id();
        self.entries.push(SymbolEntry::Scope { id, parent });
        id
    }

    pub fn insert_symbol(
        &mut self,
        name: &str,
        data_type: DataType,
        dims: Option<Vec<usize>>,
        is_function: bool,
        parent: Option<SymbolId>,
    ) -> SymbolId {
        let id = self.next_id();
        self.entries.push(SymbolEntry::Symbol {
            id,
            parent,
            name: name.to_string(),
            data_type,
            dims,
            is_function,
            flags: SymbolFlags::default(),
            register: None,
        });
        self.by_name.entry(name.to_string()).or_default().push(id);
        id
    }

    pub fn entry(&self, id: SymbolId) -> &SymbolEntry {
        &self.entries[id.0]
    }

    pub fn entry_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.entries[id.0]
    }

    /// Exact lookup; a repeated lookup of the same pair always yields the
    /// same entry.
    pub fn lookup(&self, name: &str, id: SymbolId) -> Option<&SymbolEntry> {
        let ids = self.by_name.get(name)?;
        ids.contains(&id).then(|| self.entry(id))
    }

    pub fn lookup_mut(&mut self, name: &str, id: SymbolId) -> Option<&mut SymbolEntry> {
        let ids = self.by_name.get(name)?;
        if ids.contains(&id) {
            Some(&mut self.entries[id.0])
        } else {
            None
        }
    }

    pub fn set_register(&mut self, id: SymbolId, register: String) {
        if let SymbolEntry::Symbol { register: slot, .. } = &mut self.entries[id.0] {
            *slot = Some(register);
        }
    }

    pub fn ids_for(&self, name: &str) -> &[SymbolId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve `name` against the active scope stack, innermost scope first.
    ///
    /// Function lookups ignore scoping (functions are global). Variable
    /// lookups walk the stack outward, stop at the first enclosing function
    /// scope, and fall back to root-level globals when the function scope
    /// held no match. All matches along the way are returned so the caller
    /// can detect same-scope duplicates; the first entry is the innermost.
    pub fn resolve(&self, name: &str, scope_stack: &[SymbolId], is_function: bool) -> Vec<SymbolId> {
        let Some(candidates) = self.by_name.get(name) else {
            return Vec::new();
        };

        if is_function {
            return candidates
                .iter()
                .copied()
                .filter(|&id| self.entry(id).is_function())
                .collect();
        }

        let mut found = Vec::new();
        for &scope in scope_stack.iter().rev() {
            for &candidate in candidates {
                if self.entry(candidate).parent() == Some(scope) {
                    found.push(candidate);
                }
            }

            if self.entry(scope).is_function() {
                if !found.is_empty() {
                    return found;
                }
                for &candidate in candidates {
                    let entry = self.entry(candidate);
                    if !entry.is_function() && entry.parent() == Some(SymbolId(0)) {
                        found.push(candidate);
                    }
                }
                return found;
            }
        }
        found
    }

    /// True when two of the given entries were declared under the same
    /// immediate parent scope.
    pub fn has_duplicates(&self, entries: &[SymbolId]) -> bool {
        for (i, &a) in entries.iter().enumerate() {
            for &b in &entries[i + 1..] {
                if self.entry(a).parent() == self.entry(b).parent() {
                    return true;
                }
            }
        }
        false
    }
}
