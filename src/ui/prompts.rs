use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input, Select};

use crate::template::markers::{suggest_id, suggest_name};
use crate::template::{FieldDescriptor, FieldKind};
use crate::utils::time;

/// Value every prompt answers with when running under test.
pub const TEST_VALUE: &str = "test_value";

pub fn is_test_mode() -> bool {
    std::env::var("TEMPLATE_VAULT_TEST").is_ok()
}

/// Kinds in the order the field dialog offers them.
fn kind_choices() -> [FieldKind; 4] {
    [FieldKind::ShortText, FieldKind::LongText, FieldKind::Choice(Vec::new()), FieldKind::Date]
}

/// The field dialog. Returns `None` when the user backs out.
///
/// With `existing` set the id is shown but cannot be changed, and the other
/// answers default to the current values.
pub fn prompt_field(selection: &str, existing: Option<&FieldDescriptor>) -> Result<Option<FieldDescriptor>> {
    if is_test_mode() {
        return Ok(Some(match existing {
            Some(field) => field.clone(),
            None => FieldDescriptor::new(suggest_id(selection), suggest_name(selection), FieldKind::ShortText),
        }));
    }

    let theme = ColorfulTheme::default();

    let id = match existing {
        Some(field) => {
            println!("Field id: {} (cannot be changed)", field.id);
            field.id.clone()
        }
        None => {
            let id: String = Input::with_theme(&theme)
                .with_prompt("Field id (empty to cancel)")
                .with_initial_text(suggest_id(selection))
                .allow_empty(true)
                .interact_text()?;
            let id = id.trim().to_string();
            if id.is_empty() {
                return Ok(None);
            }
            id
        }
    };

    let default_name = existing
        .map(|f| f.name.clone())
        .unwrap_or_else(|| suggest_name(selection));
    let name: String = Input::with_theme(&theme)
        .with_prompt("Display name")
        .with_initial_text(default_name)
        .allow_empty(true)
        .interact_text()?;

    let labels: Vec<&str> = kind_choices().iter().map(FieldKind::label).collect();
    let current_kind = existing.map(|f| kind_index(&f.kind)).unwrap_or(0);
    let Some(kind_choice) = Select::with_theme(&theme)
        .with_prompt("Field kind")
        .items(labels.as_slice())
        .default(current_kind)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let kind = match kind_choice {
        1 => FieldKind::LongText,
        2 => FieldKind::Choice(prompt_options(&theme, existing.map(|f| f.options()).unwrap_or(&[]))?),
        3 => FieldKind::Date,
        _ => FieldKind::ShortText,
    };

    let description: String = Input::with_theme(&theme)
        .with_prompt("Hint (optional)")
        .with_initial_text(existing.and_then(|f| f.description.clone()).unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let required = Confirm::with_theme(&theme)
        .with_prompt("Required?")
        .default(existing.map(|f| f.required).unwrap_or(true))
        .interact()?;

    Ok(Some(
        FieldDescriptor::new(id, name.trim(), kind)
            .required(required)
            .with_description(Some(description.trim().to_string())),
    ))
}

fn kind_index(kind: &FieldKind) -> usize {
    kind_choices()
        .iter()
        .position(|k| k.as_str() == kind.as_str())
        .unwrap_or(0)
}

// One option per line, empty line to finish.
fn prompt_options(theme: &ColorfulTheme, current: &[String]) -> Result<Vec<String>> {
    if !current.is_empty() {
        println!("Current options: {}", current.join(", "));
        let keep = Confirm::with_theme(theme)
            .with_prompt("Keep these options?")
            .default(true)
            .interact()?;
        if keep {
            return Ok(current.to_vec());
        }
    }

    let mut options = Vec::new();
    loop {
        let option: String = Input::with_theme(theme)
            .with_prompt(format!("Option {} (empty to finish)", options.len() + 1))
            .allow_empty(true)
            .interact_text()?;
        let option = option.trim();
        if option.is_empty() {
            break;
        }
        options.push(option.to_string());
    }
    Ok(options)
}

/// Asks for one form value using the control that suits the field's kind.
pub fn prompt_value(field: &FieldDescriptor) -> Result<String> {
    if is_test_mode() {
        return Ok(match &field.kind {
            FieldKind::Choice(options) => options.first().cloned().unwrap_or_default(),
            FieldKind::Date => time::today(),
            _ => TEST_VALUE.to_string(),
        });
    }

    let theme = ColorfulTheme::default();
    let mut prompt = field.name.clone();
    if field.required {
        prompt.push_str(" *");
    }
    if let Some(hint) = &field.description {
        prompt = format!("{} ({})", prompt, hint);
    }

    let value = match &field.kind {
        FieldKind::Choice(options) => FuzzySelect::with_theme(&theme)
            .with_prompt(&prompt)
            .items(options.as_slice())
            .interact_opt()?
            .map(|i| options[i].clone())
            .unwrap_or_default(),
        FieldKind::Date => Input::<String>::with_theme(&theme)
            .with_prompt(format!("{} [DD/MM/AAAA]", prompt))
            .default(time::today())
            .allow_empty(true)
            .interact_text()?,
        FieldKind::LongText => {
            // Lines typed one at a time, empty line ends the paragraph
            let mut lines: Vec<String> = Vec::new();
            loop {
                let line: String = Input::with_theme(&theme)
                    .with_prompt(if lines.is_empty() { prompt.clone() } else { "...".to_string() })
                    .allow_empty(true)
                    .interact_text()?;
                if line.is_empty() {
                    break;
                }
                lines.push(line);
            }
            lines.join("\n")
        }
        FieldKind::ShortText => Input::<String>::with_theme(&theme)
            .with_prompt(&prompt)
            .allow_empty(true)
            .interact_text()?,
    };

    Ok(value)
}

pub fn confirm(prompt: &str) -> Result<bool> {
    if is_test_mode() {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Free-form text entry. Returns `None` on an empty answer.
pub fn prompt_text(prompt: &str, initial: &str) -> Result<Option<String>> {
    if is_test_mode() {
        return Ok(Some(initial.to_string()).filter(|s| !s.is_empty()));
    }
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(text).filter(|s| !s.trim().is_empty()))
}

/// Lets the user pick one entry. Returns its index, `None` on Esc.
pub fn choose(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    if is_test_mode() {
        return Ok(if items.is_empty() { None } else { Some(0) });
    }
    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?)
}
