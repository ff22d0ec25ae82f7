use std::{borrow::Borrow, collections::BTreeMap, fmt::Display};

use crate::error::{ConvertError, Result};

/// Replaces every `{start}name{end}` in `template` with the value of `name`.
///
/// A name without a value or a start delimiter without its end is an error.
pub fn fill_template<K, V>(
    template: &str,
    variables: &BTreeMap<K, V>,
    start: &str,
    end: &str,
) -> Result<String>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    if start.is_empty() || end.is_empty() {
        return Err(ConvertError::invalid("template delimiters can't be empty"));
    }

    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(start) {
        let after_open = &rest[open + start.len()..];
        let close = after_open.find(end).ok_or_else(|| {
            ConvertError::invalid(format!("unterminated template variable after '{start}'"))
        })?;

        let name = &after_open[..close];
        let value = variables.get(name).ok_or_else(|| {
            ConvertError::invalid(format!("no value for template variable '{name}'"))
        })?;

        filled.push_str(&rest[..open]);
        filled.push_str(&value.to_string());
        rest = &after_open[close + end.len()..];
    }
    filled.push_str(rest);

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_occurrence() {
        let variables = BTreeMap::from([("symbol", "Fe".to_owned()), ("a", "2.87".to_owned())]);

        assert_eq!(
            fill_template("<symbol> bcc a=<a> (<symbol>)", &variables, "<", ">").unwrap(),
            "Fe bcc a=2.87 (Fe)"
        );
        assert_eq!(
            fill_template("no variables", &variables, "<", ">").unwrap(),
            "no variables"
        );
    }

    #[test]
    fn multi_character_delimiters() {
        let variables = BTreeMap::from([("natoms".to_owned(), 250)]);

        assert_eq!(
            fill_template("atoms: {{natoms}}\n", &variables, "{{", "}}").unwrap(),
            "atoms: 250\n"
        );
    }

    #[test]
    fn errors() {
        let variables = BTreeMap::from([("a", 1.0)]);

        assert!(fill_template("<b>", &variables, "<", ">").is_err());
        assert!(fill_template("x = <a", &variables, "<", ">").is_err());
        assert!(fill_template("<a>", &variables, "", ">").is_err());
    }
}
