use std::fs;
use std::io::{IsTerminal, Read};

use crate::portfolio::invalid_input_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

/// `-` reads stdin; anything else is a file path.
pub(crate) fn resolve_source(
    path: &str,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    if path == "-" {
        let Some(stdin_value) = read_stdin(stdin_override)? else {
            return Err(invalid_input_error(
                "Path `-` means stdin input, but stdin was empty. Pipe JSON/CSV input or pass a file path.",
            ));
        };
        return Ok(ResolvedSource {
            source_kind: SourceKind::Stdin,
            source_ref: None,
            content: stdin_value,
        });
    }

    let content = fs::read_to_string(path).map_err(|error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Could not read portfolio file `{path}`: {error}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Pass `-` to read the portfolio from stdin.".to_string(),
            ],
        )
    })?;

    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        source_ref: Some(path.to_string()),
        content,
    })
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|body| !body.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            ClientError::invalid_argument_with_recovery(
                &format!("Could not read stdin: {error}"),
                vec!["Retry with an explicit file path argument.".to_string()],
            )
        })?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{SourceKind, resolve_source};

    #[test]
    fn dash_reads_stdin_override() {
        let resolved = resolve_source("-", Some("[]".to_string()));
        assert!(resolved.is_ok());
        if let Ok(source) = resolved {
            assert_eq!(source.source_kind, SourceKind::Stdin);
            assert_eq!(source.content, "[]");
            assert!(source.source_ref.is_none());
        }
    }

    #[test]
    fn dash_with_blank_stdin_is_rejected() {
        let resolved = resolve_source("-", Some("  \n".to_string()));
        assert!(resolved.is_err());
        if let Err(error) = resolved {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn file_path_is_read() {
        let file = tempfile::NamedTempFile::new();
        assert!(file.is_ok());
        if let Ok(mut file) = file {
            assert!(file.write_all(b"name,issuer\n").is_ok());
            let path = file.path().display().to_string();
            let resolved = resolve_source(&path, None);
            assert!(resolved.is_ok());
            if let Ok(source) = resolved {
                assert_eq!(source.source_kind, SourceKind::File);
                assert_eq!(source.source_ref, Some(path));
            }
        }
    }

    #[test]
    fn missing_file_reports_recovery_steps() {
        let resolved = resolve_source("/definitely/not/here.json", None);
        assert!(resolved.is_err());
        if let Err(error) = resolved {
            assert!(error.message.contains("Could not read portfolio file"));
            assert_eq!(error.recovery_steps.len(), 2);
        }
    }
}
