//! Ordered binding storage and lookup indices.
//!
//! The registry owns every declared [`Binding`] in declaration order, an
//! alias → binding index for flags, and the positional bindings in the order
//! they must be filled. Structural invariants that involve more than one
//! binding are enforced here, at registration time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::UsageError;
use crate::field::{Shape, Slot};
use crate::identifier::Identifier;
use crate::summary::BindingSummary;

/// How a binding is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Positional,
    Flag,
}

/// One declared destination.
pub(crate) struct Binding<'a> {
    /// Raw declaration string, e.g. `-b|--bar`.
    pub identifier: String,
    pub kind: Kind,
    pub shape: Shape,
    /// Flag aliases, or the single positional label.
    pub aliases: Vec<String>,
    pub choices: Vec<String>,
    pub help: Option<String>,
    pub has_default: bool,
    /// Boolean flag that must be followed by `true` / `false`.
    pub require_value: bool,
    pub slot: Box<dyn Slot + 'a>,
}

impl<'a> Binding<'a> {
    pub(crate) fn new(
        raw: &str,
        identifier: Identifier,
        shape: Shape,
        slot: Box<dyn Slot + 'a>,
    ) -> Self {
        let (kind, aliases) = match identifier {
            Identifier::Positional(label) => (Kind::Positional, vec![label]),
            Identifier::Flag(aliases) => (Kind::Flag, aliases),
        };
        Self {
            identifier: raw.to_string(),
            kind,
            shape,
            aliases,
            choices: Vec::new(),
            help: None,
            has_default: shape.is_implicitly_optional(),
            require_value: false,
            slot,
        }
    }

    /// Boolean flag that consumes no value token.
    pub(crate) fn is_switch(&self) -> bool {
        self.shape == Shape::Bool && !self.require_value
    }

    pub(crate) fn summary(&self) -> BindingSummary {
        BindingSummary {
            identifier: self.identifier.clone(),
            kind: self.kind,
            shape: self.shape,
            aliases: self.aliases.clone(),
            has_default: self.has_default,
            require_value: self.require_value,
            choices: self.choices.clone(),
            help: self.help.clone(),
        }
    }
}

#[derive(Default)]
pub(crate) struct Registry<'a> {
    bindings: Vec<Binding<'a>>,
    flags: HashMap<String, usize>,
    positionals: Vec<usize>,
}

impl<'a> Registry<'a> {
    /// Validates `binding` against the bindings already present and appends
    /// it. Nothing is modified on error.
    pub(crate) fn register(&mut self, binding: Binding<'a>) -> Result<(), UsageError> {
        let index = self.bindings.len();
        match binding.kind {
            Kind::Positional => {
                if binding.shape == Shape::Bool {
                    return Err(UsageError::BoolPositional(binding.identifier));
                }
                if self.positional_bindings().any(|b| b.aliases == binding.aliases) {
                    return Err(UsageError::DuplicatePositional(binding.identifier));
                }
                if self.has_list_positional() {
                    return Err(UsageError::ListNotLast(binding.identifier));
                }
                if !binding.has_default && self.first_optional_positional().is_some() {
                    return Err(UsageError::RequiredAfterOptional(binding.identifier));
                }
                self.positionals.push(index);
            }
            Kind::Flag => {
                if let Some(alias) = binding
                    .aliases
                    .iter()
                    .find(|alias| self.flags.contains_key(alias.as_str()))
                {
                    return Err(UsageError::DuplicateFlag(alias.clone()));
                }
                for alias in &binding.aliases {
                    self.flags.insert(alias.clone(), index);
                }
            }
        }
        self.bindings.push(binding);
        Ok(())
    }

    pub(crate) fn flag_index(&self, alias: &str) -> Option<usize> {
        self.flags.get(alias).copied()
    }

    /// Binding index of the `slot`-th positional, in declaration order.
    pub(crate) fn positional_index(&self, slot: usize) -> Option<usize> {
        self.positionals.get(slot).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn binding_mut(&mut self, index: usize) -> &mut Binding<'a> {
        &mut self.bindings[index]
    }

    pub(crate) fn bindings(&self) -> impl Iterator<Item = &Binding<'a>> {
        self.bindings.iter()
    }

    pub(crate) fn bindings_mut(&mut self) -> impl Iterator<Item = &mut Binding<'a>> {
        self.bindings.iter_mut()
    }

    fn positional_bindings(&self) -> impl Iterator<Item = &Binding<'a>> {
        self.positionals.iter().map(|&index| &self.bindings[index])
    }

    pub(crate) fn has_list_positional(&self) -> bool {
        self.positional_bindings().any(|b| b.shape.is_list())
    }

    /// First string-list binding of any kind.
    pub(crate) fn first_list(&self) -> Option<&Binding<'a>> {
        self.bindings.iter().find(|b| b.shape.is_list())
    }

    pub(crate) fn first_optional_positional(&self) -> Option<&Binding<'a>> {
        self.positional_bindings().find(|b| b.has_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TypedSlot;

    fn binding<'a, T: crate::field::FieldValue>(raw: &str, output: &'a mut T) -> Binding<'a> {
        let identifier = Identifier::parse(raw).expect("test identifier must be valid");
        Binding::new(raw, identifier, T::SHAPE, Box::new(TypedSlot::new(output, None)))
    }

    #[test]
    fn test_indices_follow_declaration_order() {
        let (mut a, mut b, mut bar) = (0_i32, 0_i32, String::new());
        let mut registry = Registry::default();
        registry.register(binding("a", &mut a)).unwrap();
        registry.register(binding("-b|--bar", &mut bar)).unwrap();
        registry.register(binding("b", &mut b)).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.positional_index(0), Some(0));
        assert_eq!(registry.positional_index(1), Some(2));
        assert_eq!(registry.positional_index(2), None);
        assert_eq!(registry.flag_index("-b"), Some(1));
        assert_eq!(registry.flag_index("--bar"), Some(1));
        assert_eq!(registry.flag_index("--baz"), None);
    }

    #[test]
    fn test_rejects_duplicate_flag_across_bindings() {
        let (mut first, mut second) = (String::new(), String::new());
        let mut registry = Registry::default();
        registry.register(binding("-f|--foo", &mut first)).unwrap();
        let err = registry.register(binding("--other|--foo", &mut second));
        assert_eq!(err, Err(UsageError::DuplicateFlag("--foo".into())));
        assert_eq!(registry.flag_index("--other"), None);
    }

    #[test]
    fn test_rejects_duplicate_positional() {
        let (mut first, mut second) = (0_i32, 0_i32);
        let mut registry = Registry::default();
        registry.register(binding("n", &mut first)).unwrap();
        assert_eq!(
            registry.register(binding("n", &mut second)),
            Err(UsageError::DuplicatePositional("n".into()))
        );
    }

    #[test]
    fn test_rejects_bool_positional() {
        let mut verbose = false;
        let mut registry = Registry::default();
        assert_eq!(
            registry.register(binding("verbose", &mut verbose)),
            Err(UsageError::BoolPositional("verbose".into()))
        );
    }

    #[test]
    fn test_list_positional_must_be_last() {
        let (mut words, mut tail) = (Vec::<String>::new(), 0_i32);
        let mut registry = Registry::default();
        registry.register(binding("words", &mut words)).unwrap();
        assert_eq!(
            registry.register(binding("tail", &mut tail)),
            Err(UsageError::ListNotLast("tail".into()))
        );
    }

    #[test]
    fn test_required_positional_after_optional() {
        let (mut maybe, mut needed) = (None::<i32>, 0_i32);
        let mut registry = Registry::default();
        registry.register(binding("maybe", &mut maybe)).unwrap();
        assert_eq!(
            registry.register(binding("needed", &mut needed)),
            Err(UsageError::RequiredAfterOptional("needed".into()))
        );
        assert!(registry.first_optional_positional().is_some());
    }

    #[test]
    fn test_flags_may_follow_list_positional() {
        let (mut words, mut verbose) = (Vec::<String>::new(), false);
        let mut registry = Registry::default();
        registry.register(binding("words", &mut words)).unwrap();
        registry.register(binding("-v|--verbose", &mut verbose)).unwrap();
        assert!(registry.has_list_positional());
        assert!(registry.first_list().is_some());
    }
}
