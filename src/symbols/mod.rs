//! Scope-stack symbol table
//!
//! This module tracks declared variables while the parser walks the program:
//! - [`SymbolTable`]: the live scope stack plus the history of archived scopes
//! - [`Scope`]: names declared in one block
//! - [`VariableRecord`]: a variable's type tag and last recorded value text
//! - [`TypeTag`]: untyped, numeric, text or list
//!
//! # Scoping
//!
//! The table starts with one global scope. `jeff` and `randy` push a scope and
//! pop it at their closing keyword; a `matt` branch shares the `jeff` scope. Lookup searches innermost
//! first; a declaration always goes into the innermost scope, so shadowing an
//! outer name is legal while redeclaring in the same scope is not.
//!
//! Every declaration gets a C binding. The first declaration of a name binds
//! the name itself; later ones, whether shadowing or in a sibling block, bind
//! `wwe_<n>_<name>`. Hoisted list records and nested C blocks therefore never
//! collide, and a shadowing list gets its own storage.
//!
//! A popped scope moves to the history stack and is never mutated again. The
//! history is only read for diagnostics (`wwec --emit symbols`).

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::trace;

/// Names the generated C relies on; declaring any of them would break the output
const RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "main", "printf", "scanf", "free",
    "malloc", "realloc", "calloc", "NULL", "WweList",
    // C23 keywords
    "alignas", "alignof", "bool", "constexpr", "false", "nullptr", "static_assert",
    "thread_local", "true", "typeof", "typeof_unqual",
    // Object-like macros from the headers the runtime pulls in
    "INFINITY", "NAN", "HUGE_VAL", "HUGE_VALF", "HUGE_VALL", "M_PI", "M_E", "EOF",
    "EXIT_SUCCESS", "EXIT_FAILURE", "RAND_MAX", "BUFSIZ", "FILE", "stdin", "stdout",
    "stderr", "errno",
    // Predefined by gcc and clang outside strict ISO mode
    "linux", "unix", "i386",
];

/// Check whether `name` collides with a C keyword, a header macro or a runtime identifier.
///
/// Identifiers starting with `__` or `_` plus an uppercase letter belong to the
/// C implementation (`_Bool`, `__STDC__`), so they are rejected too.
pub fn is_reserved(name: &str) -> bool {
    let implementation_name = name.starts_with("__")
        || (name.starts_with('_') && name[1..].starts_with(|c: char| c.is_ascii_uppercase()));

    RESERVED.contains(&name)
        || implementation_name
        || name.starts_with("list_")
        || name.starts_with(BINDING_PREFIX)
}

/// Prefix of the C names given to shadowing declarations; user names may not start with it
const BINDING_PREFIX: &str = "wwe_";

/// Runtime type tag of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Untyped,
    Numeric,
    Text,
    List,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Untyped => write!(f, "untyped"),
            TypeTag::Numeric => write!(f, "numeric"),
            TypeTag::Text => write!(f, "text"),
            TypeTag::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    pub name: String,
    /// Name the generated C uses for this declaration
    pub binding: String,
    pub tag: TypeTag,
    /// Rendered text of the last assigned expression
    pub text: String,
}

impl VariableRecord {
    pub fn new(name: &str, tag: TypeTag) -> Self {
        Self {
            name: name.to_string(),
            binding: name.to_string(),
            tag,
            text: String::new(),
        }
    }

    pub fn is_list(&self) -> bool {
        self.tag == TypeTag::List
    }
}

/// Variables declared in one block
#[derive(Debug, Clone, Default)]
pub struct Scope {
    depth: usize,
    vars: FxHashMap<String, VariableRecord>,
    insertion_order: Vec<String>,
}

impl Scope {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Nesting depth, 0 for the global scope
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get(&self, name: &str) -> Option<&VariableRecord> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Records in declaration order
    pub fn records(&self) -> impl Iterator<Item = &VariableRecord> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.vars.get(name))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scope depth {}", self.depth)?;
        for record in self.records() {
            if record.text.is_empty() {
                writeln!(f, "  {}: {}", record.name, record.tag)?;
            } else {
                writeln!(f, "  {}: {} = {}", record.name, record.tag, record.text)?;
            }
        }
        Ok(())
    }
}

/// Live scope stack plus archived history
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    history: Vec<Scope>,
    /// Declarations seen so far per source name
    declared: FxHashMap<String, usize>,
}

impl SymbolTable {
    /// Create a table holding only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(0)],
            history: Vec::new(),
            declared: FxHashMap::default(),
        }
    }

    /// Enter a new block
    pub fn push_scope(&mut self) {
        let depth = self.scopes.len();
        trace!(depth, "push scope");
        self.scopes.push(Scope::new(depth));
    }

    /// Leave the innermost block, archiving its scope
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            trace!(depth = scope.depth, vars = scope.len(), "pop scope");
            self.history.push(scope);
        }
    }

    /// Archive every live scope, innermost first
    pub fn archive_all(&mut self) {
        while !self.scopes.is_empty() {
            self.pop_scope();
        }
    }

    /// Number of live scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Insert `name` into the innermost scope and return its C binding.
    ///
    /// Returns `None` when the innermost scope already holds the name.
    pub fn declare(&mut self, name: &str, tag: TypeTag) -> Option<String> {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::new(0));
        }
        let scope = self.scopes.last_mut()?;
        if scope.contains(name) {
            return None;
        }

        let count = self.declared.entry(name.to_string()).or_insert(0);
        let binding = match *count {
            0 => name.to_string(),
            n => format!("{}{}_{}", BINDING_PREFIX, n, name),
        };
        *count += 1;

        trace!(name, %binding, %tag, depth = scope.depth, "declare");
        let mut record = VariableRecord::new(name, tag);
        record.binding = binding.clone();
        scope.insertion_order.push(name.to_string());
        scope.vars.insert(name.to_string(), record);
        Some(binding)
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<&VariableRecord> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut VariableRecord> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.vars.get_mut(name))
    }

    /// Forget the recorded value text of `name` before a new assignment
    pub fn clear_value(&mut self, name: &str) {
        if let Some(record) = self.lookup_mut(name) {
            record.text.clear();
        }
    }

    /// Store the tag and rendered text of a completed assignment
    pub fn record(&mut self, name: &str, tag: TypeTag, text: impl Into<String>) {
        if let Some(record) = self.lookup_mut(name) {
            record.tag = tag;
            record.text = text.into();
        }
    }

    /// Archived scopes in the order they were popped
    pub fn history(&self) -> &[Scope] {
        &self.history
    }

    /// Render the history stack for diagnostics
    pub fn dump_history(&self) -> String {
        self.history.iter().map(|scope| scope.to_string()).collect()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
