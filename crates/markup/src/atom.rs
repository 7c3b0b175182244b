//! Atom table for tag and attribute names.

use std::collections::HashMap;
use std::sync::Arc;

/// Opaque atom identifier, valid for the table that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

/// Document-level atom table.
///
/// Names interned through [`AtomTable::intern_ascii_folded`] are stored in
/// ASCII lowercase; [`AtomTable::intern_exact`] keeps case for XML input.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: Vec<Arc<str>>,
    map: HashMap<Arc<str>, AtomId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AtomError {
    #[error("atom table is full")]
    OutOfIds,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    fn insert(&mut self, name: &str) -> Result<AtomId, AtomError> {
        if let Some(id) = self.map.get(name) {
            return Ok(*id);
        }
        let idx: u32 = self
            .atoms
            .len()
            .try_into()
            .map_err(|_| AtomError::OutOfIds)?;
        let id = AtomId(idx);
        let atom = Arc::<str>::from(name);
        self.atoms.push(Arc::clone(&atom));
        self.map.insert(atom, id);
        Ok(id)
    }

    /// Intern a name with ASCII-lowercase folding; non-ASCII is preserved.
    pub fn intern_ascii_folded(&mut self, name: &str) -> Result<AtomId, AtomError> {
        if !name.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.insert(name);
        }
        self.insert(&name.to_ascii_lowercase())
    }

    /// Intern a name as written.
    pub fn intern_exact(&mut self, name: &str) -> Result<AtomId, AtomError> {
        self.insert(name)
    }

    /// Look up an already-interned name without inserting.
    pub fn get(&self, name: &str) -> Option<AtomId> {
        self.map.get(name).copied()
    }

    pub fn resolve(&self, id: AtomId) -> Option<&str> {
        self.atoms.get(id.0 as usize).map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_is_ascii_only() {
        let mut atoms = AtomTable::new();
        let a = atoms.intern_ascii_folded("DIV").unwrap();
        let b = atoms.intern_ascii_folded("div").unwrap();
        assert_eq!(a, b);
        assert_eq!(atoms.resolve(a), Some("div"));
        let c = atoms.intern_ascii_folded("ÄB").unwrap();
        assert_eq!(atoms.resolve(c), Some("Äb"));
    }

    #[test]
    fn exact_keeps_case() {
        let mut atoms = AtomTable::new();
        let a = atoms.intern_exact("svgElement").unwrap();
        let b = atoms.intern_ascii_folded("svgElement").unwrap();
        assert_ne!(a, b);
        assert_eq!(atoms.get("svgelement"), Some(b));
        assert_eq!(atoms.len(), 2);
    }
}
