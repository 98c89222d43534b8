use super::error::{Result, TemplateError};
use super::markers::{self, NO_DATA};
use super::models::{FieldKind, Template};

/// Values typed into a form, keyed by field id.
///
/// Insertion order is kept because substitution runs in that order: a value
/// that itself contains `[[other]]` is only filled if `other` comes later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(String, String)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty form with one slot per field, in field order.
    pub fn for_template(template: &Template) -> Self {
        let mut values = Self::new();
        for field in &template.fields {
            values.insert(&field.id, "");
        }
        values
    }

    /// Sets `id`, keeping its original position when it is already present.
    pub fn insert(&mut self, id: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == id) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((id.to_string(), value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = FormValues::new();
        for (k, v) in iter {
            let k: String = k.into();
            values.insert(&k, v);
        }
        values
    }
}

/// Normalises raw input for a field the way each control reads it: long text
/// is trimmed, everything else is taken as typed.
pub fn normalize_value(kind: &FieldKind, raw: &str) -> String {
    match kind {
        FieldKind::LongText => raw.trim().to_string(),
        _ => raw.to_string(),
    }
}

/// Fills `template` with `values` and blanks out whatever is left.
///
/// Each supplied value replaces every `[[id]]` occurrence, in the order the
/// values were inserted. Markers still present afterwards, including ones that
/// point at no field, become [`NO_DATA`]. Missing required fields do not stop
/// substitution; call [`validate`] first.
pub fn apply(template: &Template, values: &FormValues) -> String {
    let mut content = template.body.clone();
    for (id, value) in values.iter() {
        content = markers::replace_all(&content, id, value);
    }
    markers::replace_unmatched(&content, NO_DATA)
}

/// Display names of required fields whose value is absent or blank, in field
/// order.
pub fn validate(template: &Template, values: &FormValues) -> Vec<String> {
    template
        .fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| values.get(&f.id).map_or(true, |v| v.trim().is_empty()))
        .map(|f| f.name.clone())
        .collect()
}

/// [`validate`] then [`apply`], refusing to render when a required field is
/// missing.
pub fn render(template: &Template, values: &FormValues) -> Result<String> {
    let missing = validate(template, values);
    if !missing.is_empty() {
        return Err(TemplateError::MissingRequired(missing));
    }
    Ok(apply(template, values))
}
