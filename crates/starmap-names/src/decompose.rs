//! Body designator decomposition.
//!
//! A designator such as `Sol A 1 a` is split into the path that leads from a
//! top-level star (or barycentre group) down to the body. The system name is
//! stripped first; what is left is tokenised on whitespace and a handful of
//! multi-token forms are folded back into single segments:
//!
//! | remainder                  | segments                                   |
//! |----------------------------|--------------------------------------------|
//! | (empty)                    | `[MAIN]`                                   |
//! | `A 1 a`                    | `[A, 1, a]`                                |
//! | `1 a`                      | `[MAIN, 1, a]`                             |
//! | `A Belt Cluster 4`         | `[MAIN, A Belt, Cluster 4]`                |
//! | `B A Belt Cluster 4`       | `[B, A Belt, Cluster 4]`                   |
//! | `3 A Ring`                 | `[MAIN, 3, A Ring]`                        |
//! | `A Belt`                   | `[MAIN, A Belt]`                           |
//! | `B A Belt`                 | `[B, A Belt]`                              |
//!
//! Designators that do not start with the system name keep every token and
//! hang off the synthetic main star.

use std::fmt;

use crate::{MAIN_STAR, MAX_SEGMENTS};

/// Provisional kind of the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootKind {
    /// A single-letter designator or the synthetic main star.
    Star,
    /// A multi-letter designator (`AB`) naming a group of stars.
    Barycentre,
}

/// Why a designator could not be turned into a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecomposeError {
    /// The designator contained no usable tokens.
    #[error("designator has no path segments")]
    Empty,
    /// The path is deeper than the hierarchy allows.
    #[error("designator decomposes into {segments} segments (at most 5 allowed)")]
    TooDeep { segments: usize },
}

/// Root-to-leaf path of a body inside its system.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecomposedPath {
    segments: Vec<String>,
    remainder: Option<String>,
    belt_cluster: bool,
    root_kind: RootKind,
}

impl DecomposedPath {
    /// Path segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (1..=5).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a successfully decomposed path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path is `star / belt / cluster`.
    pub fn is_belt_cluster(&self) -> bool {
        self.belt_cluster
    }

    /// Provisional kind of the first segment.
    pub fn root_kind(&self) -> RootKind {
        self.root_kind
    }

    /// The designator with the system name stripped, whitespace normalised.
    ///
    /// `None` when the designator is unrelated to the system name.
    pub fn remainder(&self) -> Option<&str> {
        self.remainder.as_deref()
    }

    /// Whether the first segment is the synthetic main star.
    pub fn starts_at_main_star(&self) -> bool {
        self.segments.first().is_some_and(|s| s == MAIN_STAR)
    }

    /// The last segment, which distinguishes the body from its siblings.
    pub fn own_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for DecomposedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(" / "))
    }
}

/// Decompose a body name into its hierarchy path.
///
/// `designation`, when present and non-blank, is decomposed instead of
/// `full_name`; callers pass it when they know the catalog designator of a
/// body that carries a unique in-universe name.
pub fn decompose(
    full_name: &str,
    system_name: &str,
    designation: Option<&str>,
) -> Result<DecomposedPath, DecomposeError> {
    let designator = designation
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(full_name);

    let remainder = related_remainder(designator, system_name);

    let (segments, belt_cluster) = match remainder.as_deref() {
        Some("") => (vec![MAIN_STAR.to_owned()], false),
        Some(rest) => split_related(rest),
        None => {
            let tokens: Vec<&str> = designator.split_whitespace().collect();
            if tokens.is_empty() {
                return Err(DecomposeError::Empty);
            }
            let mut segments = Vec::with_capacity(tokens.len() + 1);
            segments.push(MAIN_STAR.to_owned());
            segments.extend(tokens.into_iter().map(str::to_owned));
            (segments, false)
        }
    };

    if segments.is_empty() {
        return Err(DecomposeError::Empty);
    }
    if segments.len() > MAX_SEGMENTS {
        return Err(DecomposeError::TooDeep {
            segments: segments.len(),
        });
    }

    let root_kind = if segments[0] != MAIN_STAR && segments[0].chars().count() > 1 {
        RootKind::Barycentre
    } else {
        RootKind::Star
    };

    Ok(DecomposedPath {
        segments,
        remainder,
        belt_cluster,
        root_kind,
    })
}

/// Strip the system name from the front of a designator.
///
/// Returns the remaining tokens joined by single spaces, or `None` when the
/// designator does not begin with every token of the system name. Tokens
/// compare case-insensitively, so `HIP 1234 A` and `Hip  1234 A` both relate
/// to the system `HIP 1234`.
pub fn related_remainder(designator: &str, system_name: &str) -> Option<String> {
    let mut system = system_name.split_whitespace().peekable();
    system.peek()?;

    let mut body = designator.split_whitespace();
    for expected in system {
        let token = body.next()?;
        if !eq_ignore_case(token, expected) {
            return None;
        }
    }
    Some(body.collect::<Vec<_>>().join(" "))
}

fn split_related(rest: &str) -> (Vec<String>, bool) {
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    if let Some(segments) = fold_belt_cluster(&tokens) {
        return (segments, true);
    }

    let mut segments = fold_trailing_pair(&tokens);
    // A bare planet number, or a belt or ring with no star letter before it,
    // belongs to the primary star.
    if segments
        .first()
        .is_some_and(|s| s.starts_with(|c: char| c.is_ascii_digit()) || s.contains(' '))
    {
        segments.insert(0, MAIN_STAR.to_owned());
    }
    (segments, false)
}

fn fold_belt_cluster(tokens: &[&str]) -> Option<Vec<String>> {
    match *tokens {
        [star, belt, cluster, number]
            if is_single_letter(star)
                && eq_ignore_case(belt, "belt")
                && eq_ignore_case(cluster, "cluster") =>
        {
            Some(vec![
                MAIN_STAR.to_owned(),
                format!("{star} {belt}"),
                format!("{cluster} {number}"),
            ])
        }
        [designator, star, belt, cluster, number]
            if designator.chars().all(char::is_alphabetic)
                && is_single_letter(star)
                && eq_ignore_case(belt, "belt")
                && eq_ignore_case(cluster, "cluster") =>
        {
            Some(vec![
                designator.to_owned(),
                format!("{star} {belt}"),
                format!("{cluster} {number}"),
            ])
        }
        _ => None,
    }
}

// `3 A Ring` keeps the ring directly under planet 3, `B A Belt` keeps the
// belt directly under star B.
fn fold_trailing_pair(tokens: &[&str]) -> Vec<String> {
    match tokens {
        [head @ .., letter, suffix]
            if is_single_letter(letter)
                && (eq_ignore_case(suffix, "ring") || eq_ignore_case(suffix, "belt")) =>
        {
            let mut segments: Vec<String> = head.iter().map(|t| (*t).to_owned()).collect();
            segments.push(format!("{letter} {suffix}"));
            segments
        }
        _ => tokens.iter().map(|t| (*t).to_owned()).collect(),
    }
}

fn is_single_letter(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &DecomposedPath) -> Vec<&str> {
        path.segments().iter().map(String::as_str).collect()
    }

    #[test]
    fn primary_star_is_main_segment() {
        let path = decompose("Sol", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR]);
        assert_eq!(path.remainder(), Some(""));
        assert_eq!(path.root_kind(), RootKind::Star);
        assert!(!path.is_belt_cluster());
    }

    #[test]
    fn lettered_star_chain() {
        let path = decompose("Sol A 1 a", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec!["A", "1", "a"]);
        assert_eq!(path.root_kind(), RootKind::Star);
        assert_eq!(path.own_segment(), "a");
    }

    #[test]
    fn bare_planet_number_gets_main_star() {
        let path = decompose("Sol 3", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "3"]);
        assert!(path.starts_at_main_star());
    }

    #[test]
    fn multi_letter_designator_is_barycentre() {
        let path = decompose("Sol AB 1", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec!["AB", "1"]);
        assert_eq!(path.root_kind(), RootKind::Barycentre);
    }

    #[test]
    fn four_token_belt_cluster() {
        let path = decompose("Sol A Belt Cluster 4", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "A Belt", "Cluster 4"]);
        assert!(path.is_belt_cluster());
        assert_eq!(path.root_kind(), RootKind::Star);
    }

    #[test]
    fn five_token_belt_cluster() {
        let path = decompose("Sol B A Belt Cluster 2", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec!["B", "A Belt", "Cluster 2"]);
        assert!(path.is_belt_cluster());
    }

    #[test]
    fn belt_cluster_keyword_case_is_ignored() {
        let path = decompose("Sol A belt cluster 7", "Sol", None).unwrap();
        assert!(path.is_belt_cluster());
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn ring_pair_is_folded() {
        let path = decompose("Sol 3 A Ring", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "3", "A Ring"]);
    }

    #[test]
    fn belt_of_primary_star_matches_its_clusters() {
        let belt = decompose("Sol A Belt", "Sol", None).unwrap();
        let cluster = decompose("Sol A Belt Cluster 1", "Sol", None).unwrap();
        assert_eq!(segs(&belt), vec![MAIN_STAR, "A Belt"]);
        assert_eq!(belt.segments(), &cluster.segments()[..2]);
        assert!(!belt.is_belt_cluster());
    }

    #[test]
    fn belt_of_lettered_star() {
        let path = decompose("Sol B A Belt", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec!["B", "A Belt"]);
        assert_eq!(path.root_kind(), RootKind::Star);
    }

    #[test]
    fn unrelated_name_hangs_off_main_star() {
        let path = decompose("Earth", "Sol", None).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "Earth"]);
        assert_eq!(path.remainder(), None);
    }

    #[test]
    fn designation_takes_precedence() {
        let path = decompose("Earth", "Sol", Some("Sol 3")).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "3"]);
        assert_eq!(path.remainder(), Some("3"));
    }

    #[test]
    fn blank_designation_is_ignored() {
        let path = decompose("Sol 3", "Sol", Some("  ")).unwrap();
        assert_eq!(segs(&path), vec![MAIN_STAR, "3"]);
    }

    #[test]
    fn system_prefix_must_end_on_token_boundary() {
        assert_eq!(related_remainder("Solaris 1", "Sol"), None);
        assert_eq!(related_remainder("Sol 1", "Sol").as_deref(), Some("1"));
    }

    #[test]
    fn survey_names_compare_loosely() {
        assert_eq!(
            related_remainder("hip  1234 A 2", "HIP 1234").as_deref(),
            Some("A 2")
        );
    }

    #[test]
    fn empty_name_fails() {
        assert_eq!(decompose("", "Sol", None), Err(DecomposeError::Empty));
        assert_eq!(decompose("   ", "Sol", None), Err(DecomposeError::Empty));
    }

    #[test]
    fn six_segments_is_too_deep() {
        assert_eq!(
            decompose("Sol A 1 a b c d", "Sol", None),
            Err(DecomposeError::TooDeep { segments: 6 })
        );
        // main star prefix counts toward the limit
        assert_eq!(
            decompose("Sol 1 a b c d", "Sol", None),
            Err(DecomposeError::TooDeep { segments: 6 })
        );
    }

    #[test]
    fn five_segments_is_allowed() {
        let path = decompose("Sol 1 a b c", "Sol", None).unwrap();
        assert_eq!(path.len(), 5);
    }
}
