use super::*;
use clap::Parser;
use std::fs;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mig").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_defaults_without_config() {
    let dir = tempdir().unwrap();
    let project = dir.path().display().to_string();

    let ctx = DeployContext::from_cli(&cli(&["-p", &project, "--timeout", "60"])).unwrap();

    assert_eq!(ctx.database, "minidebet");
    assert_eq!(ctx.migrations_dir, dir.path().join("backend/migrations"));
    assert_eq!(ctx.state_file, dir.path().join(".deployed_migrations"));
    assert_eq!(ctx.catalog, CatalogOptions::default());
    assert_eq!(ctx.tool.timeout_secs, 60);
    assert!(!ctx.dry_run);
}

#[test]
fn test_cli_overrides_config() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("mig.yml"),
        "database: from_config\nstate_file: config_state.json\n",
    )
    .unwrap();
    let project = dir.path().display().to_string();

    let ctx = DeployContext::from_cli(&cli(&["-p", &project])).unwrap();
    assert_eq!(ctx.database, "from_config");
    assert_eq!(ctx.state_file, dir.path().join("config_state.json"));

    let ctx = DeployContext::from_cli(&cli(&[
        "from_cli",
        "-p",
        &project,
        "--state-file",
        "cli_state.json",
        "--migrations-dir",
        "sql",
        "--dry-run",
    ]))
    .unwrap();
    assert_eq!(ctx.database, "from_cli");
    assert_eq!(ctx.state_file, dir.path().join("cli_state.json"));
    assert_eq!(ctx.migrations_dir, dir.path().join("sql"));
    assert!(ctx.dry_run);
}

#[test]
fn test_explicit_config_path() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("deploy.yml");
    fs::write(&config_path, "database: explicit\n").unwrap();
    let project = dir.path().display().to_string();
    let config_arg = config_path.display().to_string();

    let ctx = DeployContext::from_cli(&cli(&["-p", &project, "-c", &config_arg])).unwrap();
    assert_eq!(ctx.database, "explicit");
}

#[test]
fn test_invalid_config_is_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mig.yml"), "tool:\n  program: \"\"\n").unwrap();
    let project = dir.path().display().to_string();

    assert!(DeployContext::from_cli(&cli(&["-p", &project])).is_err());
}
