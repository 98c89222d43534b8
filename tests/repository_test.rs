use anyhow::Result;
use std::fs;
use template_vault::store::{sanitize_name, StoreError, TemplateRepository};
use template_vault::template::{FieldKind, Template};

mod test_utils;
use test_utils::{create_test_repo, create_test_template};

#[test]
fn test_save_load_round_trip() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    let template = create_test_template("contract");

    let path = repo.save(&template)?;
    assert!(path.ends_with("contract.json"));

    let loaded = repo.load("contract")?;
    assert_eq!(loaded, template);
    assert_eq!(loaded.fields[3].kind, FieldKind::Choice(vec!["Lima".to_string(), "Cusco".to_string()]));
    Ok(())
}

#[test]
fn test_list_after_save_and_delete() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    repo.save(&create_test_template("A"))?;
    repo.save(&create_test_template("B"))?;
    assert_eq!(repo.list()?, vec!["A", "B"]);

    repo.delete("A")?;
    assert_eq!(repo.list()?, vec!["B"]);
    assert!(!repo.exists("A"));
    Ok(())
}

#[test]
fn test_save_overwrites() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    let mut template = create_test_template("contract");
    repo.save(&template)?;

    template.body = "Replaced [[buyer]]".to_string();
    template.fields.truncate(1);
    repo.save(&template)?;

    let loaded = repo.load("contract")?;
    assert_eq!(loaded.body, "Replaced [[buyer]]");
    assert_eq!(loaded.fields.len(), 1);
    assert_eq!(repo.list()?.len(), 1);
    Ok(())
}

#[test]
fn test_rename_keeps_old_record() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    let mut template = create_test_template("old");
    repo.save(&template)?;

    template.name = "new".to_string();
    repo.save(&template)?;

    assert_eq!(repo.list()?, vec!["new", "old"]);
    Ok(())
}

#[test]
fn test_missing_template() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    assert!(matches!(repo.load("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(repo.delete("nope"), Err(StoreError::NotFound(_))));
    assert!(repo.list()?.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_record_is_skipped() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    repo.save(&create_test_template("good"))?;
    fs::write(repo.dir().join("broken.json"), "{ not json")?;
    fs::write(repo.dir().join("notes.txt"), "ignored")?;

    assert_eq!(repo.list()?, vec!["good"]);
    assert_eq!(repo.load_all()?.len(), 1);
    assert!(matches!(repo.load("broken"), Err(StoreError::Format { .. })));
    Ok(())
}

#[test]
fn test_reads_original_record_format() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    let record = r#"{
  "nombre": "Poder simple",
  "descripcion": "Carta poder",
  "tipo": "Poderes",
  "fecha_creacion": "2024-03-15T10:30:45.123456",
  "campos_personalizados": [
    {
      "id": "otorgante",
      "nombre": "Otorgante",
      "tipo": "texto",
      "descripcion": "",
      "requerido": true
    },
    {
      "id": "ciudad",
      "nombre": "Ciudad",
      "tipo": "seleccion",
      "descripcion": "Lugar de firma",
      "requerido": false,
      "opciones": ["Lima", "Arequipa"]
    },
    {
      "id": "detalle",
      "nombre": "Detalle",
      "tipo": "textarea",
      "descripcion": "",
      "requerido": false
    }
  ],
  "contenido_base": "Yo, [[otorgante]], en [[ciudad]].",
  "documento_origen": "C:/minutas/poder.docx"
}"#;
    fs::write(repo.dir().join("Poder simple.json"), record)?;

    let template = repo.load("Poder simple")?;
    assert_eq!(template.name, "Poder simple");
    assert_eq!(template.category, "Poderes");
    assert_eq!(template.created_at.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-15 10:30:45");
    assert_eq!(template.fields.len(), 3);
    assert!(template.fields[0].required);
    assert_eq!(template.fields[0].description, None);
    assert_eq!(template.fields[1].description.as_deref(), Some("Lugar de firma"));
    assert_eq!(template.fields[1].options(), ["Lima".to_string(), "Arequipa".to_string()]);
    assert_eq!(template.fields[2].kind, FieldKind::LongText);
    assert_eq!(template.source_document, "C:/minutas/poder.docx");
    Ok(())
}

#[test]
fn test_written_record_uses_original_keys() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    let path = repo.save(&create_test_template("contract"))?;
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;

    assert_eq!(json["nombre"], "contract");
    assert_eq!(json["tipo"], "Contracts");
    assert!(json["fecha_creacion"].is_string());
    assert_eq!(json["campos_personalizados"][0]["tipo"], "texto");
    assert_eq!(json["campos_personalizados"][0]["requerido"], true);
    assert!(json["campos_personalizados"][0].get("opciones").is_none());
    assert_eq!(json["campos_personalizados"][3]["tipo"], "seleccion");
    assert_eq!(json["campos_personalizados"][3]["opciones"][1], "Cusco");
    assert_eq!(json["contenido_base"], create_test_template("x").body);
    Ok(())
}

#[test]
fn test_rejects_unknown_kind_and_empty_choice() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    fs::write(
        repo.dir().join("odd.json"),
        r#"{"nombre":"odd","campos_personalizados":[{"id":"x","nombre":"X","tipo":"color"}]}"#,
    )?;
    fs::write(
        repo.dir().join("empty.json"),
        r#"{"nombre":"empty","campos_personalizados":[{"id":"x","nombre":"X","tipo":"seleccion"}]}"#,
    )?;
    assert!(matches!(repo.load("odd"), Err(StoreError::Format { .. })));
    assert!(matches!(repo.load("empty"), Err(StoreError::Format { .. })));
    assert!(repo.list()?.is_empty());
    Ok(())
}

#[test]
fn test_import_and_export() -> Result<()> {
    let (repo, dir) = create_test_repo()?;
    let template = create_test_template("contract");
    repo.save(&template)?;

    let exported = dir.path().join("shared.json");
    repo.export_to("contract", &exported)?;
    repo.delete("contract")?;

    let imported = repo.import_from(&exported, false)?;
    assert_eq!(imported, template);
    assert_eq!(repo.load("contract")?, template);

    // Same name again without overwrite is refused
    let err = repo.import_from(&exported, false).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(ref name) if name == "contract"));

    let mut changed = template.clone();
    changed.description = "Changed".to_string();
    fs::write(&exported, serde_json::to_string(&changed)?)?;
    repo.import_from(&exported, true)?;
    assert_eq!(repo.load("contract")?.description, "Changed");
    Ok(())
}

#[test]
fn test_import_nameless_record_uses_file_stem() -> Result<()> {
    let (repo, dir) = create_test_repo()?;
    let path = dir.path().join("from_stem.json");
    fs::write(&path, r#"{"contenido_base":"Hi [[x]]"}"#)?;

    let imported = repo.import_from(&path, false)?;
    assert_eq!(imported.name, "from_stem");
    assert_eq!(imported.category, "General");
    assert!(repo.exists("from_stem"));
    Ok(())
}

#[test]
fn test_export_missing() -> Result<()> {
    let (repo, dir) = create_test_repo()?;
    let result = repo.export_to("ghost", &dir.path().join("ghost.json"));
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    Ok(())
}

#[test]
fn test_sanitize_name() {
    assert_eq!(sanitize_name("Contrato de venta"), "Contrato de venta");
    assert_eq!(sanitize_name("a/b\\c:d"), "a_b_c_d");
    assert_eq!(sanitize_name(" ..hidden.. "), "hidden");
    assert_eq!(sanitize_name(""), "_");
}

#[test]
fn test_open_creates_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("a").join("b");
    let repo = TemplateRepository::open(&nested)?;
    assert!(nested.is_dir());
    repo.save(&Template::new("t", "body"))?;
    assert!(nested.join("t.json").is_file());
    Ok(())
}

#[test]
fn test_import_refuses_invalid_fields() -> Result<()> {
    let (repo, dir) = create_test_repo()?;
    let duplicated = dir.path().join("duplicated.json");
    fs::write(
        &duplicated,
        r#"{"nombre":"dup","campos_personalizados":[
            {"id":"a","nombre":"A","tipo":"texto"},
            {"id":"a","nombre":"Again","tipo":"texto"}]}"#,
    )?;
    let spaced = dir.path().join("spaced.json");
    fs::write(
        &spaced,
        r#"{"nombre":"spaced","campos_personalizados":[{"id":"a b","nombre":"A","tipo":"texto"}]}"#,
    )?;
    let unnamed = dir.path().join("unnamed.json");
    fs::write(
        &unnamed,
        r#"{"nombre":"unnamed","campos_personalizados":[{"id":"a","nombre":" ","tipo":"texto"}]}"#,
    )?;

    for path in [&duplicated, &spaced, &unnamed] {
        assert!(matches!(repo.import_from(path, false), Err(StoreError::Format { .. })));
    }
    assert!(repo.list()?.is_empty());
    Ok(())
}

#[test]
fn test_invalid_fields_skipped_on_listing() -> Result<()> {
    let (repo, _dir) = create_test_repo()?;
    repo.save(&create_test_template("good"))?;
    fs::write(
        repo.dir().join("dup.json"),
        r#"{"nombre":"dup","campos_personalizados":[
            {"id":"x","nombre":"X","tipo":"texto"},
            {"id":"x","nombre":"X","tipo":"fecha"}]}"#,
    )?;

    assert_eq!(repo.list()?, vec!["good"]);
    assert!(matches!(repo.load("dup"), Err(StoreError::Format { .. })));
    Ok(())
}
