//! String table validation.
//!
//! Checks the structural invariants of a table:
//! - every id is unique across the whole table
//! - every entry of a context starts with that context's bus prefix
//! - every parameter entry has a sibling `<BUS>_<METHOD>_NAME` entry
//! - parameter indices of a method are 0-based and contiguous
//!
//! Violations are reported for tooling; they are never fatal at lookup time.

use crate::i18n::ids::{context_id_prefix, MessageId};
use crate::i18n::Document;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// A broken table invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// An id that already appeared earlier in the table
    DuplicateId {
        id: String,
        first_context: String,
        context: String,
    },

    /// A parameter entry whose method has no `NAME` entry in the same context
    OrphanParam {
        id: String,
        context: String,
        expected_parent: String,
    },

    /// A run of parameter indices missing from a method's 0..=max range
    ParamGap {
        context: String,
        method: String,
        first: u32,
        last: u32,
    },

    /// An entry whose id does not start with its context's bus prefix
    PrefixMismatch {
        id: String,
        context: String,
        expected_prefix: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateId {
                id,
                first_context,
                context,
            } => write!(
                f,
                "Duplicate id {} in context '{}' (first defined in '{}')",
                id, context, first_context
            ),
            Violation::OrphanParam {
                id,
                context,
                expected_parent,
            } => write!(
                f,
                "Parameter entry {} in context '{}' has no sibling {}",
                id, context, expected_parent
            ),
            Violation::ParamGap {
                context,
                method,
                first,
                last,
            } if first == last => write!(
                f,
                "Method {} in context '{}' is missing PARAM{}",
                method, context, first
            ),
            Violation::ParamGap {
                context,
                method,
                first,
                last,
            } => write!(
                f,
                "Method {} in context '{}' is missing PARAM{} through PARAM{}",
                method, context, first, last
            ),
            Violation::PrefixMismatch {
                id,
                context,
                expected_prefix,
            } => write!(
                f,
                "Entry {} does not start with {} required by context '{}'",
                id, expected_prefix, context
            ),
        }
    }
}

/// Validation report containing violations and warnings about a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Broken invariants
    pub violations: Vec<Violation>,

    /// Non-critical findings (ids outside the naming scheme, ordering)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no violations or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_violations() && !self.has_warnings()
    }

    /// Whether the table passes: no violations, and no warnings when strict.
    pub fn passes(&self, strict: bool) -> bool {
        !self.has_violations() && !(strict && self.has_warnings())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for table invariants.
pub struct TableValidator;

impl TableValidator {
    /// Validate every invariant over a parsed document.
    pub fn validate(document: &Document) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.violations.extend(Self::duplicate_ids(document));

        for context in &document.contexts {
            let prefix = context_id_prefix(&context.name);
            let ids: HashSet<&str> = context.entries.iter().map(|e| e.id.as_str()).collect();
            // method -> param indices in file order
            let mut params: BTreeMap<String, Vec<u32>> = BTreeMap::new();

            for entry in &context.entries {
                if !entry.id.starts_with(&prefix) {
                    report.violations.push(Violation::PrefixMismatch {
                        id: entry.id.clone(),
                        context: context.name.clone(),
                        expected_prefix: prefix.clone(),
                    });
                }

                let Some(parsed) = MessageId::parse(&entry.id) else {
                    report.warnings.push(format!(
                        "Id {} in context '{}' does not follow the naming scheme",
                        entry.id, context.name
                    ));
                    continue;
                };

                let (Some(index), Some(parent)) = (parsed.param(), parsed.method_name_id()) else {
                    continue;
                };

                let parent = parent.to_string();
                if !ids.contains(parent.as_str()) {
                    report.violations.push(Violation::OrphanParam {
                        id: entry.id.clone(),
                        context: context.name.clone(),
                        expected_parent: parent,
                    });
                }

                let method = parsed.method().unwrap_or_default().to_string();
                params.entry(method).or_default().push(index);
            }

            for (method, indices) in &params {
                for (first, last) in gaps(indices) {
                    report.violations.push(Violation::ParamGap {
                        context: context.name.clone(),
                        method: method.clone(),
                        first,
                        last,
                    });
                }

                if indices.windows(2).any(|pair| pair[0] > pair[1]) {
                    report.warnings.push(format!(
                        "Parameters of {} in context '{}' are not in index order",
                        method, context.name
                    ));
                }
            }
        }

        report
    }

    /// One violation per repeated occurrence of an id, reported against the
    /// context of its first occurrence.
    ///
    /// Two copies of an id give one violation; three copies give two, not one
    /// per pair of copies.
    pub fn duplicate_ids(document: &Document) -> Vec<Violation> {
        let mut first_seen: HashMap<&str, &str> = HashMap::new();
        let mut violations = Vec::new();

        for (context, entry) in document.entries() {
            match first_seen.get(entry.id.as_str()) {
                Some(first_context) => violations.push(Violation::DuplicateId {
                    id: entry.id.clone(),
                    first_context: first_context.to_string(),
                    context: context.to_string(),
                }),
                None => {
                    first_seen.insert(entry.id.as_str(), context);
                }
            }
        }

        violations
    }
}

/// Inclusive runs of indices missing below the highest present index.
///
/// Work is bounded by the number of entries, not by the index values.
fn gaps(indices: &[u32]) -> Vec<(u32, u32)> {
    let present: BTreeSet<u32> = indices.iter().copied().collect();
    let mut gaps = Vec::new();
    let mut expected: u64 = 0;

    for &index in &present {
        if u64::from(index) > expected {
            gaps.push((expected as u32, index - 1));
        }
        expected = u64::from(index) + 1;
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Context, Entry, Language};

    fn document(entries: &[&str]) -> Document {
        let mut doc = Document::new("2.1", Language::ENGLISH_US);
        let mut ctx = Context::new("EBus: Bus");
        ctx.entries
            .extend(entries.iter().map(|id| Entry::keyed(*id, "")));
        doc.contexts.push(ctx);
        doc
    }

    // ==================== Clean Table Tests ====================

    #[test]
    fn test_validate_clean_table() {
        let doc = document(&[
            "BUS_NAME",
            "BUS_TOOLTIP",
            "BUS_CATEGORY",
            "BUS_METHOD_NAME",
            "BUS_METHOD_PARAM0_NAME",
            "BUS_METHOD_PARAM0_TOOLTIP",
            "BUS_METHOD_PARAM1_NAME",
        ]);
        let report = TableValidator::validate(&doc);
        assert!(report.is_clean(), "{report:?}");
    }

    // ==================== Uniqueness Tests ====================

    #[test]
    fn test_duplicate_pair_reported_once() {
        let doc = document(&["BUS_NAME", "BUS_TOOLTIP", "BUS_NAME"]);
        let report = TableValidator::validate(&doc);

        assert_eq!(
            report.violations,
            vec![Violation::DuplicateId {
                id: "BUS_NAME".to_string(),
                first_context: "EBus: Bus".to_string(),
                context: "EBus: Bus".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_across_contexts() {
        let mut doc = document(&["BUS_NAME"]);
        let mut other = Context::new("EBus: Bus");
        other.entries.push(Entry::keyed("BUS_NAME", "Again"));
        doc.contexts.push(other);

        let violations = TableValidator::duplicate_ids(&doc);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_triplicate_reports_each_repeat() {
        let doc = document(&["BUS_NAME", "BUS_NAME", "BUS_NAME"]);
        assert_eq!(TableValidator::duplicate_ids(&doc).len(), 2);
    }

    // ==================== Hierarchy Tests ====================

    #[test]
    fn test_orphan_param() {
        let doc = document(&["BUS_NAME", "BUS_METHOD_PARAM0_NAME"]);
        let report = TableValidator::validate(&doc);

        assert_eq!(
            report.violations,
            vec![Violation::OrphanParam {
                id: "BUS_METHOD_PARAM0_NAME".to_string(),
                context: "EBus: Bus".to_string(),
                expected_parent: "BUS_METHOD_NAME".to_string(),
            }]
        );
    }

    #[test]
    fn test_param_gap() {
        let doc = document(&[
            "BUS_METHOD_NAME",
            "BUS_METHOD_PARAM0_NAME",
            "BUS_METHOD_PARAM2_NAME",
        ]);
        let report = TableValidator::validate(&doc);

        assert_eq!(
            report.violations,
            vec![Violation::ParamGap {
                context: "EBus: Bus".to_string(),
                method: "METHOD".to_string(),
                first: 1,
                last: 1,
            }]
        );
    }

    #[test]
    fn test_param_gap_huge_index_is_one_violation() {
        let doc = document(&[
            "BUS_METHOD_NAME",
            "BUS_METHOD_PARAM0_NAME",
            "BUS_METHOD_PARAM4294967295_NAME",
        ]);
        let report = TableValidator::validate(&doc);

        assert_eq!(
            report.violations,
            vec![Violation::ParamGap {
                context: "EBus: Bus".to_string(),
                method: "METHOD".to_string(),
                first: 1,
                last: u32::MAX - 1,
            }]
        );
        assert!(report.violations[0]
            .to_string()
            .contains("PARAM1 through PARAM4294967294"));
    }

    #[test]
    fn test_gaps_between_several_runs() {
        assert_eq!(gaps(&[0, 1, 2]), vec![]);
        assert_eq!(gaps(&[3, 0, 6]), vec![(1, 2), (4, 5)]);
        assert_eq!(gaps(&[2, 2]), vec![(0, 1)]);
        assert_eq!(gaps(&[]), vec![]);
    }

    #[test]
    fn test_param_not_starting_at_zero() {
        let doc = document(&["BUS_METHOD_NAME", "BUS_METHOD_PARAM1_NAME"]);
        let report = TableValidator::validate(&doc);
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].to_string().contains("PARAM0"));
    }

    #[test]
    fn test_params_out_of_order_warns() {
        let doc = document(&[
            "BUS_METHOD_NAME",
            "BUS_METHOD_PARAM1_NAME",
            "BUS_METHOD_PARAM0_NAME",
        ]);
        let report = TableValidator::validate(&doc);
        assert!(!report.has_violations());
        assert!(report.warnings[0].contains("not in index order"));
    }

    // ==================== Prefix and Scheme Tests ====================

    #[test]
    fn test_prefix_mismatch() {
        let doc = document(&["BUS_NAME", "OTHERBUS_NAME"]);
        let report = TableValidator::validate(&doc);
        assert_eq!(
            report.violations,
            vec![Violation::PrefixMismatch {
                id: "OTHERBUS_NAME".to_string(),
                context: "EBus: Bus".to_string(),
                expected_prefix: "BUS_".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_scheme_id_warns() {
        let doc = document(&["BUS_NAME", "BUS_LABEL"]);
        let report = TableValidator::validate(&doc);
        assert!(!report.has_violations());
        assert!(report.warnings[0].contains("BUS_LABEL"));
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(!report.has_violations());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_passes_clean_report() {
        let report = ValidationReport::new();
        assert!(report.passes(false));
        assert!(report.passes(true));
    }

    #[test]
    fn test_passes_warnings_only_fail_when_strict() {
        let report = TableValidator::validate(&document(&["BUS_NAME", "BUS_LABEL"]));
        assert!(report.has_warnings());
        assert!(report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_passes_violations_always_fail() {
        let report = TableValidator::validate(&document(&["BUS_NAME", "BUS_NAME"]));
        assert!(!report.has_warnings());
        assert!(!report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_violation_serializes_with_kind() {
        let violation = Violation::ParamGap {
            context: "EBus: Bus".to_string(),
            method: "METHOD".to_string(),
            first: 1,
            last: 3,
        };
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["kind"], "param_gap");
        assert_eq!(json["first"], 1);
        assert_eq!(json["last"], 3);
    }
}
