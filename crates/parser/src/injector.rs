//! Identifier Injector
//!
//! Gives every JSX element in a design file a unique `id` attribute:
//!
//! 1. Elements without an `id` get `id_<slug>_<n>`.
//! 2. The whole file is re-scanned; repeated values, and values already
//!    claimed outside this file, are re-minted.
//!
//! The rewrite is a list of byte-offset edits on the original text, so
//! formatting and comments survive untouched.

use design_studio_core::CoreResult;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::jsx::{scan_elements, IdAttr, ID_ATTRIBUTE};
use crate::slug::slugify;

/// Rewritten source plus what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    pub rewritten_source: String,
    /// Elements that received a freshly minted identifier
    pub added: usize,
    /// Duplicate identifier attributes that were replaced or dropped
    pub removed: usize,
    /// Distinct identifier values that were duplicated
    pub duplicates_found: usize,
    /// Elements whose identifier was kept as written
    pub unchanged: usize,
}

/// Mints `id_<slug>_<n>` values that are not yet taken.
struct IdMinter {
    prefix: String,
    counter: usize,
    taken: HashSet<String>,
}

impl IdMinter {
    fn new(namespace: &str, taken: HashSet<String>) -> Self {
        Self {
            prefix: format!("id_{}_", slugify(namespace)),
            counter: 0,
            taken,
        }
    }

    fn mint(&mut self) -> String {
        loop {
            let candidate = format!("{}{}", self.prefix, self.counter);
            self.counter += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

struct Edit {
    range: Range<usize>,
    text: String,
}

fn id_attribute(value: &str) -> String {
    format!("{}=\"{}\"", ID_ATTRIBUTE, value)
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.range.start);
    let extra: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            tracing::warn!(at = edit.range.start, "Skipping overlapping identifier edit");
            continue;
        }
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.text);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Assign identifiers to every element of `source`.
///
/// `existing_ids` are identifiers used elsewhere (other design files); any
/// element in `source` carrying one of them is re-minted. `namespace` is
/// usually the design file stem and only affects new identifiers.
pub fn inject(
    source: &str,
    existing_ids: &HashSet<String>,
    namespace: &str,
) -> CoreResult<InjectionResult> {
    let elements = scan_elements(source)?;

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for element in &elements {
        if let Some(IdAttr::Static { value, .. }) = &element.id {
            *occurrences.entry(value.as_str()).or_default() += 1;
        }
        for value in &element.extra_values {
            *occurrences.entry(value.as_str()).or_default() += 1;
        }
    }

    let mut taken = existing_ids.clone();
    taken.extend(occurrences.keys().map(|v| v.to_string()));
    let mut minter = IdMinter::new(namespace, taken);

    let mut edits = Vec::new();
    let mut added = 0;

    // First pass: elements with no identifier, or a blank one.
    for element in &elements {
        let edit = match &element.id {
            None => {
                let id = minter.mint();
                Edit {
                    range: element.insert_at..element.insert_at,
                    text: format!(" {}", id_attribute(&id)),
                }
            }
            Some(IdAttr::Blank { span }) => Edit {
                range: span.clone(),
                text: id_attribute(&minter.mint()),
            },
            Some(_) => continue,
        };
        edits.push(edit);
        added += 1;
    }

    // Second pass: repair repeated or externally claimed values.
    let duplicated: HashSet<&str> = occurrences
        .iter()
        .filter(|(value, count)| **count > 1 || existing_ids.contains(**value))
        .map(|(value, _)| *value)
        .collect();

    let mut kept: HashSet<&str> = HashSet::new();
    let mut removed = 0;
    let mut unchanged = 0;
    for element in &elements {
        // An element keeps at most one `id`.
        for span in &element.extra_ids {
            edits.push(Edit {
                range: span.clone(),
                text: String::new(),
            });
            removed += 1;
        }
        match &element.id {
            None | Some(IdAttr::Blank { .. }) => {}
            Some(IdAttr::Dynamic) => unchanged += 1,
            Some(IdAttr::Static { value, span }) => {
                let value = value.as_str();
                let keep = !duplicated.contains(value)
                    || (!existing_ids.contains(value) && kept.insert(value));
                if keep {
                    unchanged += 1;
                    continue;
                }
                let id = minter.mint();
                edits.push(Edit {
                    range: span.clone(),
                    text: id_attribute(&id),
                });
                removed += 1;
                added += 1;
            }
        }
    }

    if removed > 0 {
        tracing::debug!(
            namespace,
            duplicates = duplicated.len(),
            removed,
            "Repaired duplicate identifiers"
        );
    }

    Ok(InjectionResult {
        rewritten_source: apply_edits(source, edits),
        added,
        removed,
        duplicates_found: duplicated.len(),
        unchanged,
    })
}
