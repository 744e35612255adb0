//! Print the OpenAPI document as JSON.

use std::io::{self, Write};
use std::process::ExitCode;

use timers_backend::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(error) => {
            eprintln!("failed to render OpenAPI document: {error}");
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = io::stdout().lock();
    if let Err(error) = writeln!(stdout, "{json}") {
        eprintln!("failed to write OpenAPI document: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
