use formfill_core::ErrorKind;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: String,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    error: ErrorBody<'a>,
}

/// Write a failure to stderr: `error[Kind]: message`, or a JSON object with
/// `--json`. Errors outside the store taxonomy are labelled `Error`.
pub fn print_error(err: &anyhow::Error, kind: Option<ErrorKind>, json: bool) {
    let label = kind.map_or("Error", ErrorKind::as_str);
    // Full chain, including context added by the command handlers.
    let message = format!("{err:#}");
    if json {
        let report = ErrorReport {
            error: ErrorBody {
                kind: label,
                message,
            },
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("error[{label}]: {err:#}"),
        }
    } else {
        eprintln!("error[{label}]: {message}");
    }
}
