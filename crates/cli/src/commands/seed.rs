//! Seed dataset commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the demo dataset
//! sr-cli seed
//!
//! # Write it to a file for STORE_RATINGS_SEED_FILE
//! sr-cli seed --output data/seed.json
//!
//! # Check that a dataset loads
//! sr-cli verify-seed data/seed.json
//! ```

use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use store_ratings_server::db::{SeedData, SeedError};

/// Errors that can occur in the seed commands.
#[derive(Debug, Error)]
pub enum SeedCommandError {
    /// The dataset could not be loaded or built.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// The dataset could not be serialized.
    #[error("failed to serialize seed data: {0}")]
    Json(#[from] serde_json::Error),

    /// The output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the demo dataset as pretty-printed JSON to `output`, or stdout.
///
/// # Errors
///
/// Returns an error if the dataset cannot be serialized or written.
pub fn export_demo(output: Option<&Path>) -> Result<(), SeedCommandError> {
    let json = serde_json::to_string_pretty(&SeedData::demo()?)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            info!(path = %path.display(), "Wrote demo dataset");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Load a dataset the way the server does and report its size.
///
/// # Errors
///
/// Returns an error if the file is unreadable, malformed, or has duplicate
/// IDs, emails or rating pairs.
pub fn verify(path: &Path) -> Result<(), SeedCommandError> {
    let tables = SeedData::from_file(path)?.into_tables()?;

    info!(
        path = %path.display(),
        users = tables.users.len(),
        stores = tables.stores.len(),
        ratings = tables.ratings.len(),
        "Seed dataset is valid"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sr-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_export_then_verify() {
        let path = temp_path("demo.json");

        export_demo(Some(&path)).unwrap();
        verify(&path).unwrap();

        let written: SeedData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.users.len(), 3);
        assert_eq!(written.stores.len(), 2);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_verify_rejects_duplicate_email() {
        let path = temp_path("dup.json");
        std::fs::write(
            &path,
            r#"{"users": [
                {"id": 1, "name": "First Duplicate Email User", "email": "a@b.co", "address": "x", "role": "user"},
                {"id": 2, "name": "Second Duplicate Email User", "email": "a@b.co", "address": "y", "role": "user"}
            ]}"#,
        )
        .unwrap();

        let err = verify(&path).unwrap_err();
        assert!(matches!(
            err,
            SeedCommandError::Seed(SeedError::DuplicateEmail(_))
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_verify_missing_file() {
        let err = verify(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, SeedCommandError::Seed(SeedError::Io(_))));
    }
}
