use clap::Parser;
use std::path::PathBuf;
use template_vault::cli::args::{parse_assignment, Cli, Commands};

#[test]
fn test_parse_args_new() {
    let args = vec!["tv", "new", "contract.txt", "-n", "Sale", "-m", "Juan", "-m", "Lima", "--batch"];
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::New { source, name, description, category, mark, batch } => {
            assert_eq!(source, PathBuf::from("contract.txt"));
            assert_eq!(name.as_deref(), Some("Sale"));
            assert_eq!(description, "");
            assert_eq!(category, "General");
            assert_eq!(mark, vec!["Juan", "Lima"]);
            assert!(batch);
        }
        _ => panic!("Expected New command"),
    }
}

#[test]
fn test_parse_args_fill() {
    let args = vec!["tv", "fill", "Sale", "-s", "buyer=Ana", "--set", "note=a=b", "-p", "--no-prompt"];
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Fill { name, values, output, print, no_prompt } => {
            assert_eq!(name, "Sale");
            assert_eq!(
                values,
                vec![
                    ("buyer".to_string(), "Ana".to_string()),
                    ("note".to_string(), "a=b".to_string())
                ]
            );
            assert!(output.is_none());
            assert!(print);
            assert!(no_prompt);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn test_parse_args_fill_bad_assignment() {
    let result = Cli::try_parse_from(["tv", "fill", "Sale", "--set", "no-equals"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_args_global_dir() {
    let cli = Cli::parse_from(["tv", "ls", "--dir", "/tmp/templates"]);
    assert_eq!(cli.dir, Some(PathBuf::from("/tmp/templates")));
    assert!(matches!(cli.command, Commands::Ls));
}

#[test]
fn test_parse_args_delete_and_import() {
    let cli = Cli::parse_from(["tv", "delete", "Sale", "-y"]);
    match cli.command {
        Commands::Delete { name, yes } => {
            assert_eq!(name, "Sale");
            assert!(yes);
        }
        _ => panic!("Expected Delete command"),
    }

    let cli = Cli::parse_from(["tv", "import", "shared.json", "--overwrite"]);
    match cli.command {
        Commands::Import { file, overwrite } => {
            assert_eq!(file, PathBuf::from("shared.json"));
            assert!(overwrite);
        }
        _ => panic!("Expected Import command"),
    }
}

#[test]
fn test_parse_assignment() {
    assert_eq!(parse_assignment("id=value"), Ok(("id".to_string(), "value".to_string())));
    assert_eq!(parse_assignment("id="), Ok(("id".to_string(), String::new())));
    assert!(parse_assignment("=value").is_err());
    assert!(parse_assignment("novalue").is_err());
}
