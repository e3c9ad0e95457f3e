use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::qualifiers::QualifierCodes;

const CACHE_DIR: &str = "spadl_actions";
const DB_FILE: &str = "spadl.sqlite";

#[derive(Debug, Clone, PartialEq)]
pub struct SpadlConfig {
    pub field_length: f64,
    pub field_width: f64,
    pub min_dribble_length: f64,
    pub max_dribble_length: f64,
    // Seconds.
    pub max_dribble_duration: f64,
    pub qualifier_codes: QualifierCodes,
}

impl Default for SpadlConfig {
    fn default() -> Self {
        Self {
            field_length: 100.0,
            field_width: 100.0,
            min_dribble_length: 3.0,
            max_dribble_length: 60.0,
            max_dribble_duration: 10.0,
            qualifier_codes: QualifierCodes::default(),
        }
    }
}

impl SpadlConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let qualifier_codes = match env::var("SPADL_QUALIFIER_CODES") {
            Ok(path) if !path.trim().is_empty() => load_qualifier_codes(Path::new(path.trim()))?,
            _ => d.qualifier_codes.clone(),
        };
        Ok(Self {
            field_length: positive_env_or("SPADL_FIELD_LENGTH", d.field_length),
            field_width: positive_env_or("SPADL_FIELD_WIDTH", d.field_width),
            min_dribble_length: positive_env_or("SPADL_MIN_DRIBBLE_LENGTH", d.min_dribble_length),
            max_dribble_length: positive_env_or("SPADL_MAX_DRIBBLE_LENGTH", d.max_dribble_length),
            max_dribble_duration: positive_env_or(
                "SPADL_MAX_DRIBBLE_DURATION",
                d.max_dribble_duration,
            ),
            qualifier_codes,
        })
    }
}

pub fn load_qualifier_codes(path: &Path) -> Result<QualifierCodes> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read qualifier codes {}", path.display()))?;
    let codes =
        serde_json::from_str::<QualifierCodes>(&raw).context("invalid qualifier codes json")?;
    codes
        .validate()
        .with_context(|| format!("ambiguous qualifier codes in {}", path.display()))?;
    Ok(codes)
}

/// `--db <path>` or `--db=<path>` from the process arguments.
pub fn parse_db_path_arg() -> Option<PathBuf> {
    db_path_from_args(&env::args().skip(1).collect::<Vec<_>>())
}

fn db_path_from_args(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--db=")
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path.trim()));
        }
        if arg == "--db"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn convert_parallelism() -> usize {
    env::var("CONVERT_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(1, 32)
}

/// Loads `.env.local` then `.env`; both are optional.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Installs the fmt subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn positive_env_or(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_pitch() {
        let cfg = SpadlConfig::default();
        assert_eq!(cfg.field_length, 100.0);
        assert_eq!(cfg.field_width, 100.0);
        assert_eq!(cfg.min_dribble_length, 3.0);
        assert_eq!(cfg.max_dribble_length, 60.0);
        assert_eq!(cfg.max_dribble_duration, 10.0);
        assert_eq!(cfg.qualifier_codes.goal_mouth_y, 102);
    }

    #[test]
    fn bad_env_values_fall_back() {
        assert_eq!(positive_env_or("SPADL_TEST_UNSET_KEY_FOR_DEFAULTS", 7.5), 7.5);
    }

    #[test]
    fn ambiguous_override_file_is_rejected() {
        let path = env::temp_dir().join(format!("spadl_codes_{}.json", std::process::id()));
        fs::write(&path, r#"{"goal_mouth_y": 2}"#).unwrap();
        let err = load_qualifier_codes(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("GoalMouthY"));
    }

    #[test]
    fn db_flag_in_both_forms() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            db_path_from_args(&args(&["a.json", "--db", "x.sqlite"])),
            Some(PathBuf::from("x.sqlite"))
        );
        assert_eq!(
            db_path_from_args(&args(&["--db= y.sqlite "])),
            Some(PathBuf::from("y.sqlite"))
        );
        assert_eq!(db_path_from_args(&args(&["--db"])), None);
        assert_eq!(db_path_from_args(&args(&["--db=", "a.json"])), None);
    }
}
