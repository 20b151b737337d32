//! Custom display names.
//!
//! Most bodies are known only by their catalog designator, but some carry an
//! in-universe name (`Earth`, `Mitterand Hollow`). The custom name is kept
//! separately from the designator so the hierarchy can be built from the
//! catalog path while consumers still show the familiar name.

use crate::decompose::eq_ignore_case;

/// Extract the custom name of a body, if it has one.
///
/// `remainder` is the decomposition remainder for the body (see
/// [`DecomposedPath::remainder`](crate::DecomposedPath::remainder)).
pub fn custom_name(
    full_name: &str,
    system_name: &str,
    remainder: Option<&str>,
    is_star: bool,
) -> Option<String> {
    if let Some(rest) = strip_system_prefix(full_name, system_name) {
        let rest = rest.trim_matches(|c: char| c == ' ' || c == '-');
        if rest.is_empty() {
            // A non-star named exactly like its system keeps the full name.
            return (!is_star).then(|| full_name.to_owned());
        }
        if remainder.is_some_and(|r| same_tokens(rest, r)) {
            return None;
        }
        return Some(rest.to_owned());
    }

    match remainder {
        Some(r) if ends_with_tokens(full_name, r) => None,
        _ => Some(full_name.to_owned()),
    }
}

// Prefix match that must end at a space, a dash or the end of the name.
fn strip_system_prefix<'a>(full_name: &'a str, system_name: &str) -> Option<&'a str> {
    let system_name = system_name.trim();
    if system_name.is_empty() {
        return None;
    }
    let (head, tail) = full_name.split_at_checked(system_name.len())?;
    if !eq_ignore_case(head, system_name) {
        return None;
    }
    match tail.chars().next() {
        None | Some(' ') | Some('-') => Some(tail),
        Some(_) => None,
    }
}

fn same_tokens(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}

fn ends_with_tokens(name: &str, suffix: &str) -> bool {
    let suffix: Vec<&str> = suffix.split_whitespace().collect();
    let name: Vec<&str> = name.split_whitespace().collect();
    !suffix.is_empty() && name.ends_with(&suffix)
}
