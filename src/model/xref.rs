//! Cross-reference index between part identifiers and display names.
//!
//! The index is built once per run from the full set of part records and is
//! read-only afterwards. It maintains two derived mappings: identifier to
//! display name (last writer wins) and normalized name to an ordered list of
//! candidate identifiers, each candidate carrying the metadata needed for
//! deterministic tie-breaking. A case-folded companion of the name map backs
//! the case-insensitive resolution stage.
//!
//! Construction never fails on data content: records without a usable
//! identifier are dropped and counted, records without a name are indexed by
//! identifier only.

use super::normalize::{fold_token, normalize_token};
use super::part::{PartId, PartMeta, PartRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One identifier candidate for a display name, with the metadata recorded
/// alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCandidate {
    /// The candidate part identifier
    pub id: PartId,
    /// Metadata captured from the record that produced this candidate
    pub meta: PartMeta,
}

/// Data-quality counters accumulated while building the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefStats {
    /// Total records seen
    pub records_total: usize,
    /// Records dropped for a missing identifier
    pub dropped_records: usize,
    /// Records indexed by identifier only (empty name)
    pub unnamed_records: usize,
}

/// Immutable identifier/name cross-reference.
///
/// Built with [`CrossRefIndex::build`]; all other operations are read-only
/// queries, so a shared reference can be handed to any number of concurrent
/// resolvers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossRefIndex {
    /// Identifier -> display name (last writer wins; empty when unnamed)
    by_identifier: IndexMap<PartId, String>,
    /// Identifier -> metadata of the last record seen (last writer wins)
    meta_by_identifier: IndexMap<PartId, PartMeta>,
    /// Normalized case-preserved name -> ordered candidates
    by_name: IndexMap<String, Vec<NameCandidate>>,
    /// Case-folded name -> ordered candidates
    by_name_folded: IndexMap<String, Vec<NameCandidate>>,
    /// Every distinct name each identifier was recorded under
    names_by_identifier: IndexMap<PartId, Vec<String>>,
    /// Build counters
    stats: XrefStats,
}

impl CrossRefIndex {
    /// Build the index from part records in a single pass.
    ///
    /// O(records). Later records overwrite the display name and metadata of
    /// earlier records for the same identifier; name candidate lists keep one
    /// entry per (name, identifier) pair, with the metadata of the last record
    /// that contributed it.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PartRecord>,
    {
        let mut index = Self::default();

        for record in records {
            index.stats.records_total += 1;

            let id = record.id();
            if id.is_empty() {
                index.stats.dropped_records += 1;
                tracing::debug!(name = %record.name, "dropping record with missing identifier");
                continue;
            }

            let name = normalize_token(&record.name);
            index.by_identifier.insert(id.clone(), name.clone());
            index.meta_by_identifier.insert(id.clone(), record.meta.clone());

            if name.is_empty() {
                index.stats.unnamed_records += 1;
                continue;
            }

            upsert_candidate(&mut index.by_name, name.clone(), &id, &record.meta);
            upsert_candidate(&mut index.by_name_folded, fold_token(&name), &id, &record.meta);

            let names = index.names_by_identifier.entry(id).or_default();
            if !names.contains(&name) {
                names.push(name);
            }
        }

        index.log_build_summary();
        index
    }

    /// Display name recorded for an identifier, if any.
    ///
    /// Returns `None` both for unknown identifiers and for identifiers whose
    /// records carried no usable name.
    #[must_use]
    pub fn identifier_to_name(&self, id: &PartId) -> Option<&str> {
        self.by_identifier
            .get(id)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Candidate identifiers for a normalized, case-preserved name.
    #[must_use]
    pub fn name_to_identifiers(&self, name: &str) -> &[NameCandidate] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate identifiers for a case-folded name.
    #[must_use]
    pub fn name_to_identifiers_folded(&self, folded: &str) -> &[NameCandidate] {
        self.by_name_folded
            .get(folded)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Metadata of the last record seen for an identifier.
    #[must_use]
    pub fn identifier_meta(&self, id: &PartId) -> Option<&PartMeta> {
        self.meta_by_identifier.get(id)
    }

    /// Whether a raw token denotes a known identifier (numeric fallback).
    #[must_use]
    pub fn is_known_identifier(&self, token: &str) -> bool {
        self.by_identifier.contains_key(&PartId::new(token))
    }

    /// Number of distinct identifiers indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    /// True if no identifiers are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }

    /// All indexed identifiers with their display names, in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = (&PartId, &str)> {
        self.by_identifier.iter().map(|(id, name)| (id, name.as_str()))
    }

    /// Build counters.
    #[must_use]
    pub fn stats(&self) -> XrefStats {
        self.stats
    }

    /// Names mapped to more than one candidate identifier.
    pub fn ambiguous_names(&self) -> impl Iterator<Item = (&str, &[NameCandidate])> {
        self.by_name
            .iter()
            .filter(|(_, candidates)| candidates.len() > 1)
            .map(|(name, candidates)| (name.as_str(), candidates.as_slice()))
    }

    /// Identifiers recorded under more than one distinct name.
    ///
    /// Disagreeing sources are reported, never silently merged: every name an
    /// identifier was seen under keeps its own candidate entry.
    pub fn identifiers_with_multiple_names(&self) -> impl Iterator<Item = (&PartId, &[String])> {
        self.names_by_identifier
            .iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(id, names)| (id, names.as_slice()))
    }

    fn log_build_summary(&self) {
        let ambiguous = self.ambiguous_names().count();
        let multi_named = self.identifiers_with_multiple_names().count();
        tracing::info!(
            identifiers = self.by_identifier.len(),
            names = self.by_name.len(),
            dropped = self.stats.dropped_records,
            unnamed = self.stats.unnamed_records,
            ambiguous_names = ambiguous,
            "cross-reference index built"
        );
        if multi_named > 0 {
            tracing::warn!(
                count = multi_named,
                "identifiers recorded under multiple names; sources disagree"
            );
        }
    }
}

/// Insert or refresh the candidate entry for `id` under `key`.
///
/// One entry per (name, identifier) pair; a repeated record refreshes the
/// metadata in place (last writer wins) instead of growing the list.
fn upsert_candidate(
    map: &mut IndexMap<String, Vec<NameCandidate>>,
    key: String,
    id: &PartId,
    meta: &PartMeta,
) {
    let candidates = map.entry(key).or_default();
    match candidates.iter_mut().find(|c| &c.id == id) {
        Some(existing) => existing.meta = meta.clone(),
        None => candidates.push(NameCandidate {
            id: id.clone(),
            meta: meta.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<PartRecord> {
        vec![
            PartRecord::new("E1", "Engine").with_revision("2"),
            PartRecord::new("E2", "Engine").with_revision("1"),
            PartRecord::new("F1", "Frame"),
            PartRecord::new("0114032", ""),
            PartRecord::new("", "Orphan"),
        ]
    }

    #[test]
    fn test_build_counts() {
        let index = CrossRefIndex::build(sample_records());
        assert_eq!(index.len(), 4);
        assert_eq!(index.stats().records_total, 5);
        assert_eq!(index.stats().dropped_records, 1);
        assert_eq!(index.stats().unnamed_records, 1);
    }

    #[test]
    fn test_identifier_to_name() {
        let index = CrossRefIndex::build(sample_records());
        assert_eq!(index.identifier_to_name(&PartId::new("F1")), Some("Frame"));
        // Unnamed part is indexed but has no name
        assert_eq!(index.identifier_to_name(&PartId::new("0114032")), None);
        assert_eq!(index.identifier_to_name(&PartId::new("ZZ")), None);
    }

    #[test]
    fn test_name_candidates_ordered() {
        let index = CrossRefIndex::build(sample_records());
        let candidates = index.name_to_identifiers("Engine");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id.value(), "E1");
        assert_eq!(candidates[1].id.value(), "E2");
    }

    #[test]
    fn test_folded_lookup() {
        let index = CrossRefIndex::build(sample_records());
        assert!(index.name_to_identifiers("frame").is_empty());
        assert_eq!(index.name_to_identifiers_folded("frame").len(), 1);
    }

    #[test]
    fn test_known_identifier_fallback_probe() {
        let index = CrossRefIndex::build(sample_records());
        assert!(index.is_known_identifier("0114032"));
        // Float artifact normalizes to the same identifier
        assert!(index.is_known_identifier("0114032.0"));
        assert!(!index.is_known_identifier("9999"));
    }

    #[test]
    fn test_last_writer_wins() {
        let records = vec![
            PartRecord::new("P1", "Old Name").with_revision("1"),
            PartRecord::new("P1", "New Name").with_revision("2"),
        ];
        let index = CrossRefIndex::build(records);
        assert_eq!(
            index.identifier_to_name(&PartId::new("P1")),
            Some("New Name")
        );
        // Both names keep a candidate entry; the disagreement is reported
        assert_eq!(index.name_to_identifiers("Old Name").len(), 1);
        assert_eq!(index.name_to_identifiers("New Name").len(), 1);
        let multi: Vec<_> = index.identifiers_with_multiple_names().collect();
        assert_eq!(multi.len(), 1);
        let names: Vec<&str> = multi[0].1.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Old Name", "New Name"]);
    }

    #[test]
    fn test_identifier_meta_last_writer_wins() {
        let records = vec![
            PartRecord::new("P1", "Widget").with_revision("1").with_view("Design"),
            PartRecord::new("P1", "Widget").with_revision("2"),
        ];
        let index = CrossRefIndex::build(records);
        let meta = index.identifier_meta(&PartId::new("P1")).expect("meta");
        assert_eq!(meta.revision.as_deref(), Some("2"));
        assert!(meta.view.is_none());
    }

    #[test]
    fn test_repeated_record_refreshes_metadata() {
        let records = vec![
            PartRecord::new("P1", "Widget").with_revision("1"),
            PartRecord::new("P1", "Widget").with_revision("3"),
        ];
        let index = CrossRefIndex::build(records);
        let candidates = index.name_to_identifiers("Widget");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].meta.revision.as_deref(), Some("3"));
    }

    #[test]
    fn test_ambiguous_names_report() {
        let index = CrossRefIndex::build(sample_records());
        let ambiguous: Vec<_> = index.ambiguous_names().collect();
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(ambiguous[0].0, "Engine");
    }

    #[test]
    fn test_name_normalized_on_build() {
        let records = vec![PartRecord::new("P1", "  Drive   Shaft ")];
        let index = CrossRefIndex::build(records);
        assert_eq!(index.name_to_identifiers("Drive Shaft").len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = CrossRefIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.name_to_identifiers("anything").is_empty());
    }
}
