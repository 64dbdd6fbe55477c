//! Environment variable substitution in image build arguments.

use crate::publish::PublishError;
use std::collections::BTreeMap;

/// Substitute `$NAME` and `${NAME}` in every build argument value.
///
/// `$$` produces a literal `$`, as does a `$` not followed by a variable
/// name. Unset variables are an error.
pub fn resolve_build_args<F>(
    args: &BTreeMap<String, String>,
    lookup: F,
) -> Result<Vec<(String, String)>, PublishError>
where
    F: Fn(&str) -> Option<String>,
{
    args.iter()
        .map(|(key, value)| Ok((key.clone(), substitute(key, value, &lookup)?)))
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn substitute<F>(argument: &str, value: &str, lookup: &F) -> Result<String, PublishError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let name = match chars.peek() {
            Some('$') => {
                chars.next();
                out.push('$');
                continue;
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(PublishError::UnterminatedPlaceholder {
                                argument: argument.to_string(),
                            })
                        }
                    }
                }
                name
            }
            Some(&c) if c == '_' || c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                name
            }
            _ => {
                out.push('$');
                continue;
            }
        };

        let resolved = lookup(&name).ok_or_else(|| PublishError::MissingVariable {
            argument: argument.to_string(),
            variable: name.clone(),
        })?;
        out.push_str(&resolved);
    }

    Ok(out)
}
