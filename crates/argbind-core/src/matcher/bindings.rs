//! Destructured match results

use crate::value::ArgValue;

/// The value bound to one slot
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Optional slot that received no value
    Absent,
    /// Scalar slot value (may be a `Null`/`Undefined` sentinel for optionals)
    Value(ArgValue),
    /// Values collected by a spread slot, in argument order
    Spread(Vec<ArgValue>),
}

impl Binding {
    pub fn is_absent(&self) -> bool {
        matches!(self, Binding::Absent)
    }

    pub fn as_value(&self) -> Option<&ArgValue> {
        match self {
            Binding::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_spread(&self) -> Option<&[ArgValue]> {
        match self {
            Binding::Spread(values) => Some(values),
            _ => None,
        }
    }
}

/// Output names mapped to their bindings, in schema order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bindings {
    entries: Vec<(String, Binding)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, binding: Binding) {
        self.entries.push((name.to_string(), binding));
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, binding)| binding)
    }

    /// The scalar value bound to `name`, if any
    pub fn value(&self, name: &str) -> Option<&ArgValue> {
        self.get(name).and_then(Binding::as_value)
    }

    /// The values collected by spread slot `name`
    pub fn spread(&self, name: &str) -> Option<&[ArgValue]> {
        self.get(name).and_then(Binding::as_spread)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Bindings {
    type Item = (String, Binding);
    type IntoIter = std::vec::IntoIter<(String, Binding)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Binding)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Binding)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
