//! External document placeholders.
//!
//! The finishing stage scans the produced document for paragraphs of the
//! form `!!(<absolute path>){<json dict>}` and replaces each with the content
//! of the referenced Word file after substituting the dictionary.
use std::path::Path;

use crate::common::{Error, Result};
use crate::document::ExternalDoc;

/// Extension the finishing stage can expand.
const EXTERNAL_EXTENSION: &str = "docx";

/// Placeholder text for `doc`, with the path resolved against `workdir`.
pub fn placeholder(workdir: &Path, doc: &ExternalDoc) -> Result<String> {
    let path = workdir.join(&doc.path);
    if !path.exists() {
        return Err(Error::MissingFile(path));
    }
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTERNAL_EXTENSION));
    if !is_docx {
        return Err(Error::InvalidExternalDoc(path));
    }
    let absolute = std::path::absolute(&path)?;
    let dict = serde_json::to_string(&doc.dict)?;
    Ok(format!("!!({}){}", absolute.display(), dict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn external(path: &str) -> ExternalDoc {
        let mut dict = BTreeMap::new();
        dict.insert("name".to_string(), "Иван".to_string());
        dict.insert("group".to_string(), "ИУ7".to_string());
        ExternalDoc {
            path: path.to_string(),
            dict,
        }
    }

    #[test]
    fn test_placeholder_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("title.docx"), b"PK").unwrap();
        let text = placeholder(dir.path(), &external("title.docx")).unwrap();
        assert!(text.starts_with("!!("));
        assert!(text.ends_with(r#"title.docx){"group":"ИУ7","name":"Иван"}"#));
    }

    #[test]
    fn test_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let err = placeholder(dir.path(), &external("nope.docx")).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("title.odt"), b"x").unwrap();
        let err = placeholder(dir.path(), &external("title.odt")).unwrap_err();
        assert!(matches!(err, Error::InvalidExternalDoc(_)));
    }
}
