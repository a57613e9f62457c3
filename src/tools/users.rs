use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, ToolError};

/// Users younger than this are considered underage
pub const ADULT_AGE: f64 = 18.0;

/// A user record; fields other than `age` are carried through untouched
///
/// Ages are any JSON number, so `17.5` and `30.0` load as well as `17`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub age: f64,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Top-level shape of the user database file: `{"users": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDatabase {
    pub users: Vec<User>,
}

impl UserDatabase {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ToolError::MalformedJson {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Read and parse a user database file
pub fn load_users<P: AsRef<Path>>(path: P) -> Result<UserDatabase> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ToolError::InputMissing {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ToolError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let db = UserDatabase::from_json(&content)?;
    debug!("Loaded {} users from {:?}", db.users.len(), path);
    Ok(db)
}

/// Users strictly younger than `threshold`, in file order
pub fn filter_underage(db: &UserDatabase, threshold: f64) -> Vec<&User> {
    db.users.iter().filter(|user| user.age < threshold).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const USERS: &str = r#"{
        "users": [
            {"name": "Ana", "age": 17, "email": "ana@example.com"},
            {"name": "Ben", "age": 18},
            {"name": "Cy", "age": 4},
            {"name": "Dee", "age": 40}
        ]
    }"#;

    #[test]
    fn test_filter_keeps_only_minors_in_order() {
        let db = UserDatabase::from_json(USERS).unwrap();
        let minors = filter_underage(&db, ADULT_AGE);

        let names: Vec<&str> = minors
            .iter()
            .map(|u| u.fields["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ana", "Cy"]);
        assert_eq!(minors[0].fields["email"], "ana@example.com");
    }

    #[test]
    fn test_no_minors() {
        let db = UserDatabase::from_json(r#"{"users": [{"age": 30}]}"#).unwrap();
        assert!(filter_underage(&db, ADULT_AGE).is_empty());
    }

    #[test]
    fn test_fractional_ages_are_compared_numerically() {
        let db = UserDatabase::from_json(
            r#"{"users": [{"age": 17.5}, {"age": 30}, {"age": 17.999}, {"age": 18.0}]}"#,
        )
        .unwrap();
        let minors = filter_underage(&db, ADULT_AGE);

        let ages: Vec<f64> = minors.iter().map(|u| u.age).collect();
        assert_eq!(ages, vec![17.5, 17.999]);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = UserDatabase::from_json("{\"users\": [").unwrap_err();
        assert!(matches!(err, crate::error::ComposerError::Tool(ToolError::MalformedJson { .. })));

        assert!(UserDatabase::from_json(r#"{"people": []}"#).is_err());
    }

    #[test]
    fn test_load_users_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users_db.json");
        std::fs::write(&path, USERS).unwrap();

        let db = load_users(&path).unwrap();
        assert_eq!(db.users.len(), 4);

        let missing = load_users(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, crate::error::ComposerError::Tool(ToolError::InputMissing { .. })));
    }
}
