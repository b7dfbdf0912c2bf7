use std::{borrow::Cow, collections::BTreeMap};

use roxmltree::Node;
use tracing::debug;

use crate::{
    value::{ScalarType, ScalarValue},
    xml,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    LowerCamel,
    Named(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    selector: Option<&'static str>,
    target: Option<Target>,
    coercion: Option<ScalarType>,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            selector: None,
            target: None,
            coercion: None,
        }
    }

    #[must_use]
    pub const fn bare(name: &'static str, coercion: Option<ScalarType>) -> Self {
        Self {
            name,
            selector: None,
            target: Some(Target::LowerCamel),
            coercion,
        }
    }

    #[must_use]
    pub const fn selected(
        name: &'static str,
        coercion: ScalarType,
        selector: &'static str,
    ) -> Self {
        Self {
            name,
            selector: Some(selector),
            target: Some(Target::Named(name)),
            coercion: Some(coercion),
        }
    }

    #[must_use]
    pub const fn selector(mut self, selector: &'static str) -> Self {
        self.selector = Some(selector);
        self
    }

    #[must_use]
    pub const fn target(mut self, target: &'static str) -> Self {
        self.target = Some(Target::Named(target));
        self
    }

    #[must_use]
    pub const fn coercion(mut self, coercion: ScalarType) -> Self {
        self.coercion = Some(coercion);
        self
    }

    #[must_use]
    pub fn selector_path(&self) -> &'static str {
        self.selector.unwrap_or(self.name)
    }

    #[must_use]
    pub fn target_name(&self) -> Cow<'static, str> {
        match self.target {
            None => Cow::Borrowed(self.name),
            Some(Target::Named(target)) => Cow::Borrowed(target),
            Some(Target::LowerCamel) => Cow::Owned(lower_first(self.name)),
        }
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    values: BTreeMap<String, Option<ScalarValue>>,
}

impl FieldValues {
    #[must_use]
    pub fn get(&self, target: &str) -> Option<&ScalarValue> {
        self.values.get(target).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.values.contains_key(target)
    }

    pub fn take(&mut self, target: &str) -> Option<ScalarValue> {
        self.values.remove(target).flatten()
    }

    pub fn take_text(&mut self, target: &str) -> Option<String> {
        self.take(target).map(|value| match value {
            ScalarValue::String(text) => text,
            other => other.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Values that fail their coercion are kept as the raw string.
#[must_use]
pub fn extract_fields(element: Node<'_, '_>, specs: &[FieldSpec]) -> FieldValues {
    let mut values = BTreeMap::new();
    for spec in specs {
        let raw = xml::value_at(element, spec.selector_path());
        let value = raw.map(|raw| match spec.coercion {
            None => ScalarValue::String(raw.to_owned()),
            Some(coercion) => coercion.coerce(raw).unwrap_or_else(|error| {
                debug!(field = spec.name, %error, "keeping raw field value");
                ScalarValue::String(raw.to_owned())
            }),
        });
        values.insert(spec.target_name().into_owned(), value);
    }
    FieldValues { values }
}
