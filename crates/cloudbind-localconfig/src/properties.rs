//! Single-key properties resources parsed with `nom`.
//!
//! The format is deliberately minimal: `key=value` lines, `#` or `!` line
//! comments, blank lines ignored, surrounding whitespace trimmed. Later
//! duplicate keys win, matching the common properties-file convention.

use cloudbind_common::env::EnvironmentAccessor;
use cloudbind_common::error::{CloudbindError, Result};
use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, not_line_ending, space0},
};

/// Parsed content of one properties resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<(String, String)>,
}

impl PropertySet {
    /// Parses resource text into an ordered property set.
    ///
    /// # Errors
    ///
    /// Returns an error naming the line number when a non-comment line is
    /// not a `key=value` entry.
    pub fn parse(input: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, raw_line) in input.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            match property_line(line) {
                Ok((_, entry)) => entries.push(entry),
                Err(_) => {
                    return Err(CloudbindError::Config {
                        message: format!("malformed property at line {}: {line}", index + 1),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Returns the value for `key`; when the key repeats, the last entry
    /// wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the parsed entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Parses one trimmed `key=value` line.
fn property_line(input: &str) -> IResult<&str, (String, String)> {
    let (input, key) = take_while1(|c: char| c != '=' && !c.is_whitespace()).parse(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = space0(input)?;
    let (input, value) = not_line_ending(input)?;
    Ok((input, (key.to_string(), value.trim_end().to_string())))
}

/// Substitutes every `${variableName}` placeholder in `template` with the
/// accessor's current value.
///
/// Any placeholder that cannot be resolved (the variable is unset, the
/// read is denied, or the placeholder is unterminated) makes the whole
/// template absent rather than producing a partial path.
#[must_use]
pub fn expand_template(template: &str, env: &dyn EnvironmentAccessor) -> Option<String> {
    let mut expanded = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}')?;
        let name = &after[..end];
        match env.var(name) {
            Ok(Some(value)) => expanded.push_str(&value),
            Ok(None) => {
                tracing::debug!(variable = name, "template variable unset, treating template as absent");
                return None;
            }
            Err(denied) => {
                tracing::warn!(variable = name, %denied, "environment read denied, treating template as absent");
                return None;
            }
        }
        rest = &after[end + 1..];
    }

    expanded.push_str(rest);
    Some(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbind_common::env::{EnvAccessDenied, MapEnvironment};

    #[test]
    fn parses_entries_comments_and_blanks() {
        let input = "\n# a comment\nconfig.path=/foo/bar.properties\n! another\n\nother.key = value with spaces \n";
        let props = PropertySet::parse(input).expect("should parse");
        assert_eq!(props.entries().len(), 2);
        assert_eq!(props.get("config.path"), Some("/foo/bar.properties"));
        assert_eq!(props.get("other.key"), Some("value with spaces"));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let props = PropertySet::parse("k=first\nk=second\n").expect("should parse");
        assert_eq!(props.get("k"), Some("second"));
    }

    #[test]
    fn malformed_line_is_a_config_error() {
        let err = PropertySet::parse("just some words\n").expect_err("no equals sign");
        let msg = err.to_string();
        assert!(msg.contains("line 1"), "got: {msg}");
    }

    #[test]
    fn empty_value_is_preserved_as_empty() {
        let props = PropertySet::parse("k=\n").expect("should parse");
        assert_eq!(props.get("k"), Some(""));
    }

    #[test]
    fn expands_single_placeholder() {
        let mut env = MapEnvironment::new();
        env.set("user.home", "/foo");
        assert_eq!(
            expand_template("${user.home}/bar.properties", &env),
            Some("/foo/bar.properties".to_string())
        );
    }

    #[test]
    fn expands_multiple_placeholders() {
        let mut env = MapEnvironment::new();
        env.set("base", "/opt");
        env.set("name", "app");
        assert_eq!(
            expand_template("${base}/${name}/cloud.properties", &env),
            Some("/opt/app/cloud.properties".to_string())
        );
    }

    #[test]
    fn unresolved_placeholder_makes_whole_template_absent() {
        let mut env = MapEnvironment::new();
        env.set("base", "/opt");
        assert_eq!(expand_template("${base}/${missing}/x", &env), None);
    }

    #[test]
    fn unterminated_placeholder_is_absent() {
        let env = MapEnvironment::new();
        assert_eq!(expand_template("${never-closed", &env), None);
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let env = MapEnvironment::new();
        assert_eq!(
            expand_template("/plain/path.properties", &env),
            Some("/plain/path.properties".to_string())
        );
    }

    #[test]
    fn denied_lookup_is_absent_not_an_error() {
        struct DenyingEnvironment;

        impl EnvironmentAccessor for DenyingEnvironment {
            fn var(&self, key: &str) -> std::result::Result<Option<String>, EnvAccessDenied> {
                Err(EnvAccessDenied { key: key.to_string() })
            }
        }

        assert_eq!(expand_template("${user.home}/x", &DenyingEnvironment), None);
    }
}
