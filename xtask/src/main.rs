use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

const DEFAULT_CATALOG: &str = "crates/wasla-golive-core/catalog/default_probes.toml";

fn cargo(root: &Path, args: &[&str]) -> Result<(), String> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let rendered = format!("{cargo} {}", args.join(" "));
    let status = Command::new(&cargo)
        .args(args)
        .current_dir(root)
        .status()
        .map_err(|e| format!("failed to run `{rendered}`: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command failed: {rendered}"))
    }
}

fn fmt_check(root: &Path) -> Result<(), String> {
    cargo(root, &["fmt", "--all", "--", "--check"])
}

fn lint(root: &Path) -> Result<(), String> {
    cargo(
        root,
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test(root: &Path) -> Result<(), String> {
    cargo(root, &["test", "--workspace"])
}

fn catalog_check(root: &Path) -> Result<(), String> {
    cargo(
        root,
        &[
            "run",
            "--quiet",
            "-p",
            "wasla-golive-cli",
            "--",
            "catalog",
            "doctor",
            DEFAULT_CATALOG,
        ],
    )
}

fn workspace_root() -> Result<PathBuf, String> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| "xtask must live inside the workspace".to_string())
}

fn main() -> ExitCode {
    let arg = env::args().nth(1).unwrap_or_else(|| "help".to_string());
    let result = workspace_root().and_then(|root| match arg.as_str() {
        "fmt-check" => fmt_check(&root),
        "lint" => lint(&root),
        "test" => test(&root),
        "catalog-check" => catalog_check(&root),
        "ci" => fmt_check(&root)
            .and_then(|()| lint(&root))
            .and_then(|()| test(&root))
            .and_then(|()| catalog_check(&root)),
        "help" | "--help" | "-h" => {
            eprintln!("xtask commands:");
            eprintln!("  fmt-check");
            eprintln!("  lint");
            eprintln!("  test");
            eprintln!("  catalog-check");
            eprintln!("  ci");
            Ok(())
        }
        _ => Err(format!(
            "unknown xtask command: {arg} (try `cargo run -p xtask -- help`)"
        )),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
