use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::error::{Result, TemplateError};
use crate::utils::time;

/// Category given to templates that were saved without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// The kind of input a field collects. Choice carries its option list so a
/// choice field can never exist without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    ShortText,
    LongText,
    Choice(Vec<String>),
    Date,
}

impl FieldKind {
    /// Tag written to the `tipo` key of a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::ShortText => "texto",
            FieldKind::LongText => "textarea",
            FieldKind::Choice(_) => "seleccion",
            FieldKind::Date => "fecha",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::ShortText => "Short text",
            FieldKind::LongText => "Long text",
            FieldKind::Choice(_) => "Choice",
            FieldKind::Date => "Date",
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Choice(options) => options,
            _ => &[],
        }
    }

    /// Builds a kind from its record tag. Options are only kept for choices.
    pub fn from_tag(tag: &str, options: Vec<String>) -> Option<Self> {
        match tag {
            "texto" => Some(FieldKind::ShortText),
            "textarea" => Some(FieldKind::LongText),
            "seleccion" => Some(FieldKind::Choice(options)),
            "fecha" => Some(FieldKind::Date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord", into = "FieldRecord")]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn options(&self) -> &[String] {
        self.kind.options()
    }

    /// Checks the rules every stored field obeys: a non-empty id without
    /// whitespace, a non-empty name and, for choices, at least one option.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(TemplateError::EmptyFieldId);
        }
        if self.id.chars().any(char::is_whitespace) {
            return Err(TemplateError::InvalidFieldId(self.id.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(TemplateError::EmptyFieldName);
        }
        if let FieldKind::Choice(options) = &self.kind {
            if options.iter().all(|o| o.trim().is_empty()) {
                return Err(TemplateError::MissingOptions(self.id.clone()));
            }
        }
        Ok(())
    }
}

/// On-disk shape of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldRecord {
    id: String,
    #[serde(rename = "nombre", alias = "name", default)]
    name: String,
    #[serde(rename = "tipo", alias = "kind", default = "default_kind_tag")]
    kind: String,
    #[serde(rename = "descripcion", alias = "description", default)]
    description: String,
    #[serde(rename = "requerido", alias = "required", default)]
    required: bool,
    #[serde(
        rename = "opciones",
        alias = "options",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    options: Option<Vec<String>>,
}

fn default_kind_tag() -> String {
    FieldKind::ShortText.as_str().to_string()
}

impl TryFrom<FieldRecord> for FieldDescriptor {
    type Error = String;

    fn try_from(record: FieldRecord) -> std::result::Result<Self, Self::Error> {
        let options = record.options.unwrap_or_default();
        let kind = FieldKind::from_tag(&record.kind, options)
            .ok_or_else(|| format!("unknown field kind '{}' for field '{}'", record.kind, record.id))?;
        if matches!(&kind, FieldKind::Choice(o) if o.is_empty()) {
            return Err(format!("choice field '{}' has no options", record.id));
        }
        let field = FieldDescriptor::new(record.id, record.name, kind)
            .required(record.required)
            .with_description(Some(record.description));
        field.validate().map_err(|e| e.to_string())?;
        Ok(field)
    }
}

impl From<FieldDescriptor> for FieldRecord {
    fn from(field: FieldDescriptor) -> Self {
        let kind = field.kind.as_str().to_string();
        let options = match field.kind {
            FieldKind::Choice(options) => Some(options),
            _ => None,
        };
        FieldRecord {
            id: field.id,
            name: field.name,
            kind,
            description: field.description.unwrap_or_default(),
            required: field.required,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: String,
    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: String,
    #[serde(rename = "tipo", alias = "type", default = "default_category")]
    pub category: String,
    #[serde(rename = "fecha_creacion", with = "time::record", default = "time::now")]
    pub created_at: NaiveDateTime,
    #[serde(
        rename = "campos_personalizados",
        default,
        deserialize_with = "distinct_fields"
    )]
    pub fields: Vec<FieldDescriptor>,
    #[serde(rename = "contenido_base", default)]
    pub body: String,
    #[serde(rename = "documento_origen", default)]
    pub source_document: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

// Field ids key both markers and form values, so a record may not repeat one.
fn distinct_fields<'de, D>(deserializer: D) -> std::result::Result<Vec<FieldDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = Vec::<FieldDescriptor>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.id.as_str()) {
            return Err(D::Error::custom(TemplateError::DuplicateFieldId(field.id.clone())));
        }
    }
    Ok(fields)
}

impl Template {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: default_category(),
            created_at: time::now(),
            fields: Vec::new(),
            body: body.into(),
            source_document: String::new(),
        }
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }
}
