use crate::error::{Result, StoreError};
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Location constants
// ---------------------------------------------------------------------------

/// Environment variable overriding the data-file location.
pub const DATA_FILE_ENV: &str = "PDF_FORM_FILLER_DATA";
pub const XDG_CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";

pub const CONFIG_DIR: &str = ".config";
pub const APP_DIR: &str = "pdf-form-filler";
pub const DATA_FILE_NAME: &str = "personal_data.json";

// ---------------------------------------------------------------------------
// Data-file resolution
// ---------------------------------------------------------------------------

/// Resolve the data-file location from the process environment.
///
/// Priority:
/// 1. `--data-file` flag (passed in as `explicit`)
/// 2. `PDF_FORM_FILLER_DATA` env var
/// 3. `$XDG_CONFIG_HOME/pdf-form-filler/personal_data.json`
/// 4. `~/.config/pdf-form-filler/personal_data.json`
pub fn resolve_data_file(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_with(
        explicit,
        std::env::var_os(DATA_FILE_ENV),
        std::env::var_os(XDG_CONFIG_HOME_ENV),
        home::home_dir(),
    )
}

/// Environment-free core of [`resolve_data_file`]. Empty variables count as unset.
pub fn resolve_with(
    explicit: Option<&Path>,
    env_override: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = env_override.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    default_data_file(xdg_config_home, home)
}

pub fn default_data_file(
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    // XDG requires an absolute path; relative values are ignored.
    if let Some(xdg) = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(xdg.join(APP_DIR).join(DATA_FILE_NAME));
    }
    let home = home.ok_or(StoreError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR).join(APP_DIR).join(DATA_FILE_NAME))
}

// ---------------------------------------------------------------------------
// Member id validation
// ---------------------------------------------------------------------------

static MEMBER_ID_RE: OnceLock<Regex> = OnceLock::new();

fn member_id_re() -> &'static Regex {
    MEMBER_ID_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").expect("member id pattern is valid")
    })
}

pub fn validate_member_id(id: &str) -> Result<()> {
    if id.len() > 64 || !member_id_re().is_match(id) {
        return Err(StoreError::InvalidMemberId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
