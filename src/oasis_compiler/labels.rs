// Code label bookkeeping
//
// Labels are emitted as assembler labels and resolved by the assembler; the
// compiler only tracks whether each referenced label is declared somewhere,
// so it can report the ones that never are.

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScope {
    /// Visible inside the current unit only, cleared at every unit boundary
    Unit,
    /// Visible to the whole program, checked once at the end
    Exported,
}

impl LabelScope {
    /// Assembler name for a label in this scope
    pub fn render(self, name: &str) -> String {
        match self {
            LabelScope::Unit => format!("l_{}", name),
            LabelScope::Exported => format!("+l_{}", name),
        }
    }
}

/// Two independent namespaces of label name -> declared flag
#[derive(Debug, Default)]
pub struct LabelRegistry {
    unit: IndexMap<String, bool>,
    exported: IndexMap<String, bool>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace(&mut self, scope: LabelScope) -> &mut IndexMap<String, bool> {
        match scope {
            LabelScope::Unit => &mut self.unit,
            LabelScope::Exported => &mut self.exported,
        }
    }

    /// Record a use of `name`. An existing entry, declared or not, is left alone.
    pub fn reference(&mut self, scope: LabelScope, name: &str) {
        self.namespace(scope).entry(name.to_string()).or_insert(false);
    }

    /// Record the declaration of `name`. Redeclaring is allowed; the last
    /// declaration wins.
    pub fn declare(&mut self, scope: LabelScope, name: &str) {
        self.namespace(scope).insert(name.to_string(), true);
    }

    pub fn is_declared(&self, scope: LabelScope, name: &str) -> bool {
        let map = match scope {
            LabelScope::Unit => &self.unit,
            LabelScope::Exported => &self.exported,
        };
        map.get(name).copied().unwrap_or(false)
    }

    /// Names referenced but never declared, in first-seen order
    pub fn undeclared(&self, scope: LabelScope) -> Vec<String> {
        let map = match scope {
            LabelScope::Unit => &self.unit,
            LabelScope::Exported => &self.exported,
        };
        map.iter()
            .filter(|(_, declared)| !**declared)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn clear_unit(&mut self) {
        self.unit.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_reference_then_declaration() {
        let mut labels = LabelRegistry::new();
        labels.reference(LabelScope::Unit, "loop");
        assert_eq!(labels.undeclared(LabelScope::Unit), vec!["loop"]);

        labels.declare(LabelScope::Unit, "loop");
        assert!(labels.undeclared(LabelScope::Unit).is_empty());
        assert!(labels.is_declared(LabelScope::Unit, "loop"));
    }

    #[test]
    fn test_reference_after_declaration_keeps_it_declared() {
        let mut labels = LabelRegistry::new();
        labels.declare(LabelScope::Unit, "top");
        labels.reference(LabelScope::Unit, "top");
        assert!(labels.is_declared(LabelScope::Unit, "top"));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut labels = LabelRegistry::new();
        labels.declare(LabelScope::Exported, "greet");
        labels.reference(LabelScope::Unit, "greet");

        assert!(labels.undeclared(LabelScope::Exported).is_empty());
        assert_eq!(labels.undeclared(LabelScope::Unit), vec!["greet"]);
    }

    #[test]
    fn test_clear_unit_keeps_exported() {
        let mut labels = LabelRegistry::new();
        labels.reference(LabelScope::Unit, "a");
        labels.reference(LabelScope::Exported, "b");
        labels.clear_unit();

        assert!(labels.undeclared(LabelScope::Unit).is_empty());
        assert_eq!(labels.undeclared(LabelScope::Exported), vec!["b"]);
    }

    #[test]
    fn test_render_prefixes() {
        assert_eq!(LabelScope::Unit.render("start"), "l_start");
        assert_eq!(LabelScope::Exported.render("start"), "+l_start");
    }
}
