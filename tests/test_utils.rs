use anyhow::Result;
use template_vault::store::TemplateRepository;
use template_vault::template::{FieldDescriptor, FieldKind, Template};
use tempfile::TempDir;

pub fn create_test_repo() -> Result<(TemplateRepository, TempDir)> {
    let dir = tempfile::tempdir()?;
    let repo = TemplateRepository::open(dir.path().join("templates"))?;
    Ok((repo, dir))
}

pub fn create_test_template(name: &str) -> Template {
    let mut template = Template::new(
        name,
        "Contract between [[buyer]] and [[seller]].\n\nSigned on [[date]] in [[city]].",
    );
    template.description = "Sale contract".to_string();
    template.category = "Contracts".to_string();
    template.source_document = "/docs/contract.docx".to_string();
    template.fields = vec![
        FieldDescriptor::new("buyer", "Buyer", FieldKind::ShortText).required(true),
        FieldDescriptor::new("seller", "Seller", FieldKind::ShortText)
            .required(true)
            .with_description(Some("Full legal name".to_string())),
        FieldDescriptor::new("date", "Date", FieldKind::Date),
        FieldDescriptor::new(
            "city",
            "City",
            FieldKind::Choice(vec!["Lima".to_string(), "Cusco".to_string()]),
        ),
    ];
    template
}
