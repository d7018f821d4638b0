// Symbol tables for OASIS script variables
//
// There are exactly two scopes: the global table, alive for the whole
// compilation, and the local table, emptied at every unit boundary.

use crate::oasis_compiler::ast::DeclType;
use std::collections::HashMap;
use std::fmt;

/// Largest address a variable can live at
pub const MAX_ADDRESS: u32 = 255;

/// Value-type tag shared by symbols, builtin signatures and expression results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Bool,
    Byte,
    /// Label reference (two-byte offset); only used by builtin parameters
    Word,
}

impl From<DeclType> for ValueType {
    fn from(decl_type: DeclType) -> Self {
        match decl_type {
            DeclType::Bool => ValueType::Bool,
            DeclType::Byte => ValueType::Byte,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueType::None => write!(f, "none"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Byte => write!(f, "byte"),
            ValueType::Word => write!(f, "word"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: ValueType,
    pub address: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineError {
    DuplicateSymbol(String),
}

#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
    base_address: u32,
    next_byte_address: u32,
    next_bool_address: u32,
}

impl SymbolTable {
    pub fn new(base_address: u32) -> Self {
        SymbolTable {
            symbols: HashMap::new(),
            base_address,
            next_byte_address: base_address,
            next_bool_address: base_address,
        }
    }

    pub fn define(&mut self, symbol: Symbol) -> Result<(), DefineError> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(DefineError::DuplicateSymbol(symbol.name));
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn is_address_used(&self, address: u32) -> bool {
        self.symbols.values().any(|s| s.address == address)
    }

    /// Claim the next automatic address for `kind`. Flags and bytes live in
    /// separate banks, so each kind has its own counter.
    pub fn allocate(&mut self, kind: ValueType) -> u32 {
        let counter = match kind {
            ValueType::Bool => &mut self.next_bool_address,
            _ => &mut self.next_byte_address,
        };
        let address = *counter;
        *counter += 1;
        address
    }

    /// Empty the table and reset both allocators to the base address
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.next_byte_address = self.base_address;
        self.next_bool_address = self.base_address;
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The global and local tables together, with local-first resolution
#[derive(Debug)]
pub struct SymbolScopes {
    pub global: SymbolTable,
    pub local: SymbolTable,
}

impl SymbolScopes {
    pub fn new(global_base: u32, local_base: u32) -> Self {
        SymbolScopes {
            global: SymbolTable::new(global_base),
            local: SymbolTable::new(local_base),
        }
    }

    /// Resolve a bare identifier; a local symbol hides a global one
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.local.resolve(name).or_else(|| self.global.resolve(name))
    }

    pub fn clear_local(&mut self) {
        if !self.local.is_empty() {
            log::debug!("dropping {} local symbols", self.local.len());
        }
        self.local.clear();
    }
}
