use std::collections::HashMap;
use std::ops::Range;

use chrono::NaiveDateTime;

use super::error::{Result, TemplateError};
use super::markers;
use super::models::{FieldDescriptor, FieldKind, Template, DEFAULT_CATEGORY};
use crate::utils::time;

/// Where an editing session stands with respect to field extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    SpanSelected,
    FieldConfigured,
}

#[derive(Debug, Clone)]
struct Selection {
    span: Range<usize>,
    text: String,
}

/// Everything about a field that may change after it was created. The id is
/// not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<String>,
}

impl From<&FieldDescriptor> for FieldUpdate {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            kind: field.kind.clone(),
            required: field.required,
            description: field.description.clone(),
        }
    }
}

/// A template being built from a document body.
///
/// Fields created from a selection remember the text they replaced, so
/// deleting the field puts that text back.
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    name: String,
    description: String,
    category: String,
    source_document: String,
    created_at: Option<NaiveDateTime>,
    body: String,
    fields: Vec<FieldDescriptor>,
    originals: HashMap<String, String>,
    selection: Option<Selection>,
    state: EditorState,
}

impl TemplateEditor {
    pub fn new(body: impl Into<String>, source_document: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            source_document: source_document.into(),
            created_at: None,
            body: body.into(),
            fields: Vec::new(),
            originals: HashMap::new(),
            selection: None,
            state: EditorState::Idle,
        }
    }

    /// Reopens a saved template. Its fields have no remembered originals.
    pub fn from_template(template: Template) -> Self {
        Self {
            name: template.name,
            description: template.description,
            category: template.category,
            source_document: template.source_document,
            created_at: Some(template.created_at),
            body: template.body,
            fields: template.fields,
            originals: HashMap::new(),
            selection: None,
            state: EditorState::Idle,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.text.as_str())
    }

    /// Text a span-bound field replaced, if any.
    pub fn original_text(&self, id: &str) -> Option<&str> {
        self.originals.get(id).map(String::as_str)
    }

    pub fn set_metadata(&mut self, name: &str, description: &str, category: &str) {
        self.name = name.trim().to_string();
        self.description = description.trim().to_string();
        self.category = if category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.trim().to_string()
        };
    }

    /// Remembers the byte range `start..end` of the body as the selection.
    pub fn select_span(&mut self, start: usize, end: usize) -> Result<&str> {
        let text = self
            .body
            .get(start..end)
            .filter(|t| !t.is_empty())
            .ok_or(TemplateError::InvalidSpan { start, end })?
            .to_string();

        self.selection = Some(Selection { span: start..end, text });
        self.state = EditorState::SpanSelected;
        Ok(self.selected_text().unwrap_or_default())
    }

    /// Selects the first occurrence of `text` in the body that does not
    /// touch an existing marker.
    pub fn select_text(&mut self, text: &str) -> Result<&str> {
        if text.is_empty() {
            return Err(TemplateError::NoSelection);
        }
        let taken = markers::find_markers(&self.body);
        let start = self
            .body
            .match_indices(text)
            .map(|(start, _)| start)
            .find(|&start| {
                let end = start + text.len();
                !taken.iter().any(|m| start < m.span.end && m.span.start < end)
            })
            .ok_or(TemplateError::NoSelection)?;
        self.select_span(start, start + text.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        if self.state == EditorState::SpanSelected {
            self.state = EditorState::Idle;
        }
    }

    /// Binds the current selection to a new field.
    ///
    /// The selected range is replaced by the field's marker and the replaced
    /// text is remembered. On error nothing changes and the selection stays.
    pub fn create_field_from_selection(&mut self, field: FieldDescriptor) -> Result<()> {
        let selection = self.selection.as_ref().ok_or(TemplateError::NoSelection)?;
        self.check_new_field(&field)?;

        let span = selection.span.clone();
        let original = selection.text.clone();
        self.body.replace_range(span, &markers::marker_for(&field.id));
        self.originals.insert(field.id.clone(), original);
        log::debug!("created field '{}' from selection", field.id);
        self.fields.push(field);

        self.selection = None;
        self.state = EditorState::FieldConfigured;
        Ok(())
    }

    /// Adds a field that is not bound to any text of the body.
    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<()> {
        self.check_new_field(&field)?;
        log::debug!("added field '{}'", field.id);
        self.fields.push(field);
        Ok(())
    }

    pub fn edit_field(&mut self, id: &str, update: FieldUpdate) -> Result<()> {
        let index = self.index_of(id)?;
        let candidate = FieldDescriptor::new(id, update.name, update.kind)
            .required(update.required)
            .with_description(update.description);
        candidate.validate()?;
        self.fields[index] = candidate;
        Ok(())
    }

    /// Removes a field, restoring the text it replaced when it came from a
    /// selection. Returns the removed descriptor.
    pub fn delete_field(&mut self, id: &str) -> Result<FieldDescriptor> {
        let index = self.index_of(id)?;
        if let Some(original) = self.originals.remove(id) {
            self.body = markers::replace_all(&self.body, id, &original);
        }
        log::debug!("deleted field '{}'", id);
        Ok(self.fields.remove(index))
    }

    /// One line per field: `[[id]] - name (kind)`.
    pub fn marker_summary(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{} - {} ({})", markers::marker_for(&f.id), f.name, f.kind))
            .collect()
    }

    /// Produces the finished template. Requires a name and at least one
    /// field; the creation time of a reopened template is kept.
    pub fn finish(&self) -> Result<Template> {
        if self.name.is_empty() {
            return Err(TemplateError::EmptyTemplateName);
        }
        if self.fields.is_empty() {
            return Err(TemplateError::NoFields);
        }

        Ok(Template {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            created_at: self.created_at.unwrap_or_else(time::now),
            fields: self.fields.clone(),
            body: self.body.trim().to_string(),
            source_document: self.source_document.clone(),
        })
    }

    fn check_new_field(&self, field: &FieldDescriptor) -> Result<()> {
        field.validate()?;
        if self.fields.iter().any(|f| f.id == field.id) {
            return Err(TemplateError::DuplicateFieldId(field.id.clone()));
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| TemplateError::FieldNotFound(id.to_string()))
    }
}
