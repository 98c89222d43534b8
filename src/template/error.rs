use thiserror::Error;

/// Errors raised while building or editing a template.
///
/// Every variant is a user-input problem: the operation that returned it
/// performed no mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("a field with id '{0}' already exists")]
    DuplicateFieldId(String),

    #[error("field id is required")]
    EmptyFieldId,

    #[error("field id '{0}' cannot contain whitespace")]
    InvalidFieldId(String),

    #[error("field name is required")]
    EmptyFieldName,

    #[error("choice field '{0}' needs at least one option")]
    MissingOptions(String),

    #[error("template name is required")]
    EmptyTemplateName,

    #[error("a template needs at least one field")]
    NoFields,

    #[error("field '{0}' not found")]
    FieldNotFound(String),

    #[error("no text is selected")]
    NoSelection,

    #[error("selection {start}..{end} is outside the body or splits a character")]
    InvalidSpan { start: usize, end: usize },

    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
