use anyhow::Result;
use colored::*;

use crate::template::{FieldUpdate, Template, TemplateEditor};
use super::prompts::{choose, confirm, prompt_field, prompt_text};

const ACTIONS: [&str; 8] = [
    "Create field from text",
    "Add field manually",
    "Edit field",
    "Delete field",
    "Show body",
    "Show markers",
    "Save template",
    "Cancel",
];

/// Menu-driven editing of a [`TemplateEditor`]. Rejected operations are
/// reported and the session carries on.
pub struct EditSession<'a> {
    editor: &'a mut TemplateEditor,
}

impl<'a> EditSession<'a> {
    pub fn new(editor: &'a mut TemplateEditor) -> Self {
        Self { editor }
    }

    /// Returns the finished template when the user saves, `None` when they
    /// cancel.
    pub fn run(&mut self) -> Result<Option<Template>> {
        let actions: Vec<String> = ACTIONS.iter().map(|a| a.to_string()).collect();
        loop {
            println!();
            println!(
                "{} {} ({} fields)",
                "Template:".blue().bold(),
                if self.editor.name().is_empty() { "<unnamed>" } else { self.editor.name() },
                self.editor.fields().len()
            );

            let Some(action) = choose("What next?", &actions)? else {
                return Ok(None);
            };

            match action {
                0 => self.create_from_text()?,
                1 => self.add_manual()?,
                2 => self.edit()?,
                3 => self.delete()?,
                4 => println!("{}", self.editor.body()),
                5 => self.show_markers(),
                6 => match self.editor.finish() {
                    Ok(template) => return Ok(Some(template)),
                    Err(e) => println!("{}", e.to_string().yellow()),
                },
                _ => {
                    if confirm("Discard changes?")? {
                        return Ok(None);
                    }
                }
            }
        }
    }

    fn create_from_text(&mut self) -> Result<()> {
        let Some(text) = prompt_text("Text to turn into a field", "")? else {
            return Ok(());
        };
        if let Err(e) = self.editor.select_text(&text) {
            println!("{}", format!("'{}' does not occur in the body ({})", text, e).yellow());
            return Ok(());
        }

        let Some(field) = prompt_field(&text, None)? else {
            self.editor.clear_selection();
            return Ok(());
        };
        let name = field.name.clone();
        match self.editor.create_field_from_selection(field) {
            Ok(()) => println!("{}", format!("Field '{}' created", name).green()),
            Err(e) => {
                println!("{}", e.to_string().yellow());
                self.editor.clear_selection();
            }
        }
        Ok(())
    }

    fn add_manual(&mut self) -> Result<()> {
        let Some(field) = prompt_field("", None)? else {
            return Ok(());
        };
        let name = field.name.clone();
        match self.editor.add_field(field) {
            Ok(()) => println!("{}", format!("Field '{}' added", name).green()),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
        Ok(())
    }

    fn pick_field(&self, prompt: &str) -> Result<Option<String>> {
        let labels: Vec<String> = self
            .editor
            .fields()
            .iter()
            .map(|f| format!("{}{} ({})", f.name, if f.required { " *" } else { "" }, f.kind))
            .collect();
        if labels.is_empty() {
            println!("{}", "No fields yet".dimmed());
            return Ok(None);
        }
        Ok(choose(prompt, &labels)?.map(|i| self.editor.fields()[i].id.clone()))
    }

    fn edit(&mut self) -> Result<()> {
        let Some(id) = self.pick_field("Field to edit")? else {
            return Ok(());
        };
        let Some(current) = self.editor.fields().iter().find(|f| f.id == id).cloned() else {
            return Ok(());
        };
        let Some(updated) = prompt_field("", Some(&current))? else {
            return Ok(());
        };
        match self.editor.edit_field(&id, FieldUpdate::from(&updated)) {
            Ok(()) => println!("{}", format!("Field '{}' updated", updated.name).green()),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(id) = self.pick_field("Field to delete")? else {
            return Ok(());
        };
        if !confirm(&format!("Delete field '{}'?", id))? {
            return Ok(());
        }
        let removed = self.editor.delete_field(&id)?;
        println!("{}", format!("Field '{}' deleted", removed.name).green());
        Ok(())
    }

    fn show_markers(&self) {
        let summary = self.editor.marker_summary();
        if summary.is_empty() {
            println!("{}", "No fields yet".dimmed());
            return;
        }
        println!("Markers available in the body:");
        for line in summary {
            println!("  {}", line);
        }
    }
}
