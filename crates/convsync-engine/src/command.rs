//! Converter command templates and placeholder substitution
//!
//! A template is an ordered argument vector containing the literal tokens
//! `@source` and `@dest` where the real paths belong. Substitution matches
//! whole tokens only, never substrings, so a path containing `@source` as a
//! fragment passes through untouched.

use convsync_types::{Error, Result};
use std::ffi::OsString;
use std::path::Path;

/// Placeholder token replaced by the absolute source path
pub const SOURCE_PLACEHOLDER: &str = "@source";
/// Placeholder token replaced by the absolute destination path
pub const DEST_PLACEHOLDER: &str = "@dest";

/// A validated converter command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<String>,
}

impl CommandTemplate {
    /// Validate and wrap a raw argument vector.
    ///
    /// The template must be non-empty and contain both placeholder tokens at
    /// least once; the whole run fails fast on this before any work starts.
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::config("converter command must not be empty"));
        }
        for placeholder in [SOURCE_PLACEHOLDER, DEST_PLACEHOLDER] {
            if !tokens.iter().any(|token| token == placeholder) {
                return Err(Error::config(format!(
                    "converter command does not contain '{placeholder}'"
                )));
            }
        }
        Ok(Self { tokens })
    }

    /// Build the concrete argument vector for one source/destination pair.
    ///
    /// Every occurrence of each placeholder is replaced; paths are carried
    /// as `OsString` so non-UTF-8 file names survive.
    pub fn materialize(&self, source: &Path, dest: &Path) -> Vec<OsString> {
        self.tokens
            .iter()
            .map(|token| {
                if token == SOURCE_PLACEHOLDER {
                    source.as_os_str().to_os_string()
                } else if token == DEST_PLACEHOLDER {
                    dest.as_os_str().to_os_string()
                } else {
                    OsString::from(token)
                }
            })
            .collect()
    }

    /// Render an argument vector as a copy-pasteable shell line.
    ///
    /// POSIX single-quote escaping; only needed for dry-run echoes, so a
    /// lossy rendering of non-UTF-8 arguments is acceptable here.
    pub fn shell_join(args: &[OsString]) -> String {
        args.iter()
            .map(|arg| Self::shell_quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn shell_quote(arg: &str) -> String {
        let safe = !arg.is_empty()
            && arg
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "@%_-+=:,./".contains(c));
        if safe {
            arg.to_string()
        } else {
            format!("'{}'", arg.replace('\'', r"'\''"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn template(tokens: &[&str]) -> Result<CommandTemplate> {
        CommandTemplate::new(tokens.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_valid_template() {
        assert!(template(&["ffmpeg", "-i", "@source", "@dest"]).is_ok());
    }

    #[rstest]
    #[case(&[])]
    #[case(&["ffmpeg", "-i", "@source"])]
    #[case(&["ffmpeg", "-i", "@dest"])]
    #[case(&["ffmpeg", "-i", "in.wav", "out.mp3"])]
    fn test_invalid_templates_fail_fast(#[case] tokens: &[&str]) {
        let result = template(tokens);
        assert!(result.is_err());
        assert!(result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_substitution_replaces_whole_tokens_only() {
        let template = template(&["conv", "--out=@dest", "@source", "@dest"]).unwrap();
        let args = template.materialize(Path::new("/s/a.wav"), Path::new("/d/a.mp3"));

        // "--out=@dest" is not a standalone placeholder token
        assert_eq!(args[1], OsString::from("--out=@dest"));
        assert_eq!(args[2], OsString::from("/s/a.wav"));
        assert_eq!(args[3], OsString::from("/d/a.mp3"));
    }

    #[test]
    fn test_substitution_replaces_every_occurrence() {
        let template = template(&["conv", "@source", "@source", "@dest"]).unwrap();
        let args = template.materialize(Path::new("in.wav"), Path::new("out.mp3"));
        assert_eq!(args[1], args[2]);
    }

    #[test]
    fn test_shell_join_quotes_unsafe_arguments() {
        let args: Vec<OsString> = vec![
            OsString::from("ffmpeg"),
            OsString::from(PathBuf::from("/music/My Album/01 - It's Time.wav")),
            OsString::from("/out/01.mp3"),
        ];
        let line = CommandTemplate::shell_join(&args);
        assert_eq!(
            line,
            r"ffmpeg '/music/My Album/01 - It'\''s Time.wav' /out/01.mp3"
        );
    }

    #[test]
    fn test_shell_join_leaves_safe_arguments_bare() {
        let args: Vec<OsString> = vec![OsString::from("cp"), OsString::from("a.wav")];
        assert_eq!(CommandTemplate::shell_join(&args), "cp a.wav");
    }
}
