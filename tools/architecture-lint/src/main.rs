//! `architecture-lint [CLIENT_DIR]`: check the client's layering.
//!
//! Without an argument the `client/` directory next to this tool's
//! workspace is checked.

use std::env;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

fn main() -> ExitCode {
    let client_dir = env::args()
        .nth(1)
        .map_or_else(default_client_dir, Utf8PathBuf::from);
    match architecture_lint::check_tree(&client_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn default_client_dir() -> Utf8PathBuf {
    let manifest = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .unwrap_or(manifest)
        .join("client")
}
