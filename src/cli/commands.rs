use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use colored::*;

use crate::document;
use crate::store::{StoreError, TemplateRepository};
use crate::template::engine::normalize_value;
use crate::template::markers::{find_markers, suggest_id, suggest_name};
use crate::template::{
    render, FieldDescriptor, FieldKind, FormValues, Template, TemplateEditor, TemplateError,
};
use crate::ui::prompts::{confirm, is_test_mode, prompt_field, prompt_text, prompt_value};
use crate::ui::EditSession;
use super::args::Commands;

const RULE: &str = "─────────────────────────────────────────────";

pub fn handle_command(command: Commands, repo: &TemplateRepository) -> Result<()> {
    match command {
        Commands::New { source, name, description, category, mark, batch } => {
            let body = document::read_source(&source)?;
            let mut editor = TemplateEditor::new(body, source.to_string_lossy());
            let interactive = !batch && !is_test_mode();

            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = match name {
                Some(name) => name,
                None if interactive => prompt_text("Template name", &stem)?.unwrap_or_default(),
                None => stem,
            };
            editor.set_metadata(&name, &description, &category);

            for text in &mark {
                editor
                    .select_text(text)
                    .with_context(|| format!("Cannot mark '{}'", text))?;
                let field = if interactive {
                    match prompt_field(text, None)? {
                        Some(field) => field,
                        None => {
                            editor.clear_selection();
                            continue;
                        }
                    }
                } else {
                    FieldDescriptor::new(suggest_id(text), suggest_name(text), FieldKind::ShortText)
                };
                editor.create_field_from_selection(field)?;
            }

            let template = if interactive {
                EditSession::new(&mut editor).run()?
            } else {
                Some(editor.finish()?)
            };

            match template {
                // Batch runs never stop to ask before replacing a record
                Some(template) if batch && repo.exists(&template.name) => {
                    return Err(StoreError::AlreadyExists(template.name).into());
                }
                Some(template) => save_template(repo, &template, None)?,
                None => println!("Template discarded"),
            }
        }
        Commands::Edit { name } => {
            let template = repo.load(&name)?;
            let old_name = template.name.clone();
            let mut editor = TemplateEditor::from_template(template.clone());

            let edited = if is_test_mode() {
                Some(editor.finish()?)
            } else {
                let new_name = prompt_text("Template name", &template.name)?.unwrap_or_default();
                let description = prompt_text("Description", &template.description)?.unwrap_or_default();
                let category = prompt_text("Category", &template.category)?.unwrap_or_default();
                editor.set_metadata(&new_name, &description, &category);
                EditSession::new(&mut editor).run()?
            };

            match edited {
                Some(template) => save_template(repo, &template, Some(&old_name))?,
                None => println!("No changes saved"),
            }
        }
        Commands::Ls => {
            let templates = repo.load_all()?;
            print_templates(&templates);
        }
        Commands::Show { name } => {
            let template = repo.load(&name)?;
            print_details(&template);
        }
        Commands::Markers { name } => {
            let template = repo.load(&name)?;
            print_markers(&template);
        }
        Commands::Fill { name, values, output, print, no_prompt } => {
            let template = repo.load(&name)?;
            let form = collect_values(&template, &values, !no_prompt)?;

            let rendered = match render(&template, &form) {
                Ok(rendered) => rendered,
                Err(TemplateError::MissingRequired(missing)) => {
                    bail!("The following fields are required:\n\n• {}", missing.join("\n• "))
                }
                Err(e) => return Err(e.into()),
            };
            if print {
                println!("{}", rendered);
            } else {
                let path = output.unwrap_or_else(document::default_output_path);
                document::write_generated(&rendered, &path)?;
                println!("Document generated: {}", path.display());
            }
        }
        Commands::Delete { name, yes } => {
            if !repo.exists(&name) {
                return Err(StoreError::NotFound(name).into());
            }
            if !yes && !confirm(&format!("Delete template '{}'?", name))? {
                println!("Deletion cancelled");
                return Ok(());
            }
            repo.delete(&name)?;
            println!("Template '{}' deleted", name);
        }
        Commands::Import { file, overwrite } => {
            let template = import(repo, &file, overwrite)?;
            if let Some(template) = template {
                println!("Template '{}' imported", template.name);
            }
        }
        Commands::Export { name, destination } => {
            repo.export_to(&name, &destination)?;
            println!("Template '{}' exported to {}", name, destination.display());
        }
    }
    Ok(())
}

/// Builds the form for `template`: values given up front first, then a prompt
/// for every field still unanswered when `prompt` is set.
pub fn collect_values(template: &Template, given: &[(String, String)], prompt: bool) -> Result<FormValues> {
    let mut form = FormValues::for_template(template);

    for (id, value) in given {
        match template.field(id) {
            Some(field) => form.insert(id, normalize_value(&field.kind, value)),
            None => {
                log::warn!("template '{}' has no field '{}'", template.name, id);
                form.insert(id, value.clone());
            }
        }
    }

    if prompt {
        for field in &template.fields {
            if given.iter().any(|(id, _)| id == &field.id) {
                continue;
            }
            let raw = prompt_value(field)?;
            form.insert(&field.id, normalize_value(&field.kind, &raw));
        }
    }

    Ok(form)
}

fn save_template(repo: &TemplateRepository, template: &Template, previous_name: Option<&str>) -> Result<()> {
    let renamed = previous_name.is_some_and(|old| old != template.name);
    if (previous_name.is_none() || renamed)
        && repo.exists(&template.name)
        && !confirm(&format!("Overwrite the existing template '{}'?", template.name))?
    {
        println!("Template not saved");
        return Ok(());
    }

    let path = repo.save(template)?;
    println!("Template '{}' saved to {}", template.name, path.display());

    // The record under the old name is left in place
    if let Some(old) = previous_name.filter(|_| renamed) {
        println!(
            "{}",
            format!(
                "Note: the template was renamed; '{}' still exists. Run `delete {}` to remove it.",
                old, old
            )
            .yellow()
        );
    }
    Ok(())
}

fn import(repo: &TemplateRepository, file: &Path, overwrite: bool) -> Result<Option<Template>> {
    match repo.import_from(file, overwrite) {
        Ok(template) => Ok(Some(template)),
        Err(StoreError::AlreadyExists(name)) => {
            if !confirm(&format!("Overwrite the existing template '{}'?", name))? {
                println!("Import cancelled");
                return Ok(None);
            }
            Ok(Some(repo.import_from(file, true)?))
        }
        Err(e) => Err(anyhow!(e).context(format!("Could not import {}", file.display()))),
    }
}

fn print_templates(templates: &[Template]) {
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    println!("\nFound {} templates:", templates.len());
    println!("{}", RULE);

    for template in templates {
        println!(
            "{} [{}] {} fields ({} required)",
            template.name.green().bold(),
            template.category,
            template.fields.len(),
            template.required_count()
        );
        if !template.description.is_empty() {
            println!("    {}", template.description);
        }
        println!("{}", RULE);
    }
}

fn print_details(template: &Template) {
    println!("{}", "TEMPLATE DETAILS".blue().bold());
    println!("{}", RULE);
    println!("Name: {}", template.name);
    println!("Description: {}", or_na(&template.description));
    println!("Category: {}", or_na(&template.category));
    println!("Created: {}", template.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Source document: {}", or_na(&template.source_document));
    println!();
    println!("{}", "FIELDS:".blue().bold());

    for (i, field) in template.fields.iter().enumerate() {
        println!(
            "{}. {} ({}) - Required: {}",
            i + 1,
            field.name,
            field.kind,
            if field.required { "YES" } else { "no" }
        );
        if let Some(description) = &field.description {
            println!("   Description: {}", description);
        }
        if !field.options().is_empty() {
            println!("   Options: {}", field.options().join(", "));
        }
    }
}

fn print_markers(template: &Template) {
    if template.fields.is_empty() {
        println!("No fields defined.");
    } else {
        println!("Markers available in the body:\n");
        for field in &template.fields {
            println!("[[{}]] - {} ({})", field.id, field.name, field.kind);
        }
    }

    let dangling: Vec<String> = find_markers(&template.body)
        .into_iter()
        .filter(|m| !template.has_field(&m.identifier))
        .map(|m| m.identifier)
        .collect();
    if !dangling.is_empty() {
        println!(
            "\n{} {}",
            "Markers without a field (filled with [SIN DATO]):".yellow(),
            dangling.join(", ")
        );
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}
