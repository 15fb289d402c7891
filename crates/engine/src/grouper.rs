use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::config::{GroupConfig, MatchingType, DEFAULT_ID_COLUMN};
use crate::error::GroupError;
use crate::model::{Grouping, Table};
use crate::strategy::{MatchKey, MatchStrategy};
use crate::union_find::DisjointSet;

/// A validated grouping run over one input source.
///
/// Construction checks the source exists and the matching type is known,
/// before anything is read.
#[derive(Debug, Clone)]
pub struct Grouper {
    input: PathBuf,
    matching: MatchingType,
    config: GroupConfig,
}

impl Grouper {
    pub fn new(input: impl Into<PathBuf>, matching_type: &str) -> Result<Self, GroupError> {
        Self::with_config(input, matching_type, GroupConfig::default())
    }

    pub fn with_config(
        input: impl Into<PathBuf>,
        matching_type: &str,
        config: GroupConfig,
    ) -> Result<Self, GroupError> {
        let input = input.into();
        if !input.exists() {
            return Err(GroupError::FileNotFound(input));
        }
        let matching = matching_type.parse()?;
        config.validate()?;
        Ok(Self { input, matching, config })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn matching(&self) -> MatchingType {
        self.matching
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn strategy(&self, headers: &[String]) -> MatchStrategy {
        MatchStrategy::with_patterns(self.matching, headers, &self.config.columns)
    }

    pub fn group(&self, table: &Table) -> Grouping {
        group_rows(&table.rows, &self.strategy(&table.headers))
    }

    /// Header row plus one annotated row per input row.
    pub fn process(&self, table: &Table) -> Vec<Vec<String>> {
        if table.is_empty() {
            return Vec::new();
        }
        let grouping = self.group(table);
        annotate(&self.config.id_column, table, &grouping)
    }
}

/// Group `rows` under `headers` and prefix each with its `PersonID`.
pub fn process(headers: &[String], rows: &[Vec<String>], matching: MatchingType) -> Vec<Vec<String>> {
    if headers.is_empty() && rows.is_empty() {
        return Vec::new();
    }
    let grouping = group_rows(rows, &MatchStrategy::new(matching, headers));
    annotate_rows(DEFAULT_ID_COLUMN, headers, rows, &grouping)
}

/// Link rows sharing any key and number the resulting components.
pub fn group_rows(rows: &[Vec<String>], strategy: &MatchStrategy) -> Grouping {
    // Buckets keep first-use order so union order is reproducible.
    let mut bucket_of: FxHashMap<MatchKey, usize> = FxHashMap::default();
    let mut buckets: Vec<Vec<usize>> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        for key in strategy.extract_keys(row) {
            let slot = *bucket_of.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(idx);
        }
    }

    let mut uf = DisjointSet::new();
    for positions in &buckets {
        if let Some((&first, rest)) = positions.split_first() {
            for &idx in rest {
                uf.union(first, idx);
            }
        }
    }

    // Keyless rows still need a group of their own.
    for idx in 0..rows.len() {
        uf.find(idx);
    }

    let groups = uf.groups();
    let mut assignments = vec![0usize; rows.len()];
    for (n, group) in groups.iter().enumerate() {
        for &idx in &group.members {
            assignments[idx] = n + 1;
        }
    }

    Grouping {
        assignments,
        group_count: groups.len(),
    }
}

pub fn annotate(id_column: &str, table: &Table, grouping: &Grouping) -> Vec<Vec<String>> {
    annotate_rows(id_column, &table.headers, &table.rows, grouping)
}

fn annotate_rows(
    id_column: &str,
    headers: &[String],
    rows: &[Vec<String>],
    grouping: &Grouping,
) -> Vec<Vec<String>> {
    let mut output = Vec::with_capacity(rows.len() + 1);

    let mut header_row = Vec::with_capacity(headers.len() + 1);
    header_row.push(id_column.to_string());
    header_row.extend(headers.iter().cloned());
    output.push(header_row);

    for (idx, row) in rows.iter().enumerate() {
        let group = grouping.group_of(idx).unwrap_or_default();
        let mut out = Vec::with_capacity(row.len() + 1);
        out.push(group.to_string());
        out.extend(row.iter().cloned());
        output.push(out);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnPatterns;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn headers() -> Vec<String> {
        strings(&["FirstName", "LastName", "Email", "Phone"])
    }

    fn ids(output: &[Vec<String>]) -> Vec<usize> {
        output[1..].iter().map(|r| r[0].parse().unwrap()).collect()
    }

    #[test]
    fn groups_by_email() {
        let rows = vec![
            strings(&["John", "Doe", "john@example.com", "555-1234"]),
            strings(&["Jane", "Doe", "jane@example.com", "555-5678"]),
            strings(&["Jack", "Doe", "john@example.com", "555-9999"]),
        ];
        let out = process(&headers(), &rows, MatchingType::Email);
        assert_eq!(out[0], strings(&["PersonID", "FirstName", "LastName", "Email", "Phone"]));
        let ids = ids(&out);
        assert_eq!(ids[0], ids[2]);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn groups_by_phone() {
        let rows = vec![
            strings(&["John", "Doe", "john@example.com", "555-1234"]),
            strings(&["Jane", "Doe", "jane@example.com", "(555) 1234"]),
            strings(&["Jack", "Doe", "jack@example.com", "555-9999"]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::Phone));
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn email_or_phone_is_transitive() {
        let rows = vec![
            strings(&["John", "Doe", "john@example.com", "555-1234"]),
            strings(&["Jane", "Doe", "jane@example.com", "555-1234"]),
            strings(&["Jack", "Doe", "john@example.com", "555-9999"]),
            strings(&["Jill", "Roe", "jill@example.com", "555-0000"]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::EmailOrPhone));
        assert_eq!(ids, vec![1, 1, 1, 2]);
    }

    #[test]
    fn transitive_through_middle_row() {
        // A-B share email, B-C share phone; A and C share nothing directly.
        let rows = vec![
            strings(&["A", "", "a@x.com", "111"]),
            strings(&["B", "", "a@x.com", "222"]),
            strings(&["C", "", "c@x.com", "222"]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::EmailOrPhone));
        assert_eq!(ids, vec![1, 1, 1]);
    }

    #[test]
    fn empty_identifiers_are_singletons() {
        let rows = vec![
            strings(&["A", "", "", ""]),
            strings(&["B", "", "", ""]),
            strings(&["C", "", "", ""]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::EmailOrPhone));
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn numbering_follows_first_seen_order() {
        let rows = vec![
            strings(&["A", "", "", ""]),
            strings(&["B", "", "b@x.com", ""]),
            strings(&["C", "", "", ""]),
            strings(&["D", "", "b@x.com", ""]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::Email));
        // B and D are tracked by the union pass before the singleton sweep.
        assert_eq!(ids, vec![2, 1, 3, 1]);
    }

    #[test]
    fn row_count_preserved_and_cells_untouched() {
        let rows = vec![
            strings(&["John", "Doe", "JOHN@example.com ", "555-1234"]),
            strings(&["Jack", "Doe", "john@example.com", "555-9999"]),
        ];
        let out = process(&headers(), &rows, MatchingType::Email);
        assert_eq!(out.len(), rows.len() + 1);
        assert_eq!(&out[1][1..], &rows[0][..]);
        assert_eq!(&out[2][1..], &rows[1][..]);
    }

    #[test]
    fn deterministic_across_runs() {
        let rows: Vec<Vec<String>> = (0..50)
            .map(|i| {
                strings(&[
                    &format!("P{i}"),
                    "",
                    &format!("user{}@x.com", i % 7),
                    &format!("555-{:04}", i % 11),
                ])
            })
            .collect();
        let a = process(&headers(), &rows, MatchingType::EmailOrPhone);
        let b = process(&headers(), &rows, MatchingType::EmailOrPhone);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_source_yields_empty_output() {
        assert!(process(&[], &[], MatchingType::Email).is_empty());
    }

    #[test]
    fn headers_only_yields_header_row() {
        let out = process(&headers(), &[], MatchingType::Email);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0][0], "PersonID");
    }

    #[test]
    fn short_rows_are_tolerated() {
        let rows = vec![
            strings(&["John", "Doe", "john@example.com"]),
            strings(&["Jack"]),
            strings(&["Jim", "Doe", "john@example.com", "555", "extra"]),
        ];
        let out = process(&headers(), &rows, MatchingType::EmailOrPhone);
        assert_eq!(ids(&out), vec![1, 2, 1]);
        assert_eq!(out[2], strings(&["2", "Jack"]));
        assert_eq!(out[3].last().map(String::as_str), Some("extra"));
    }

    #[test]
    fn country_code_prefix_does_not_match() {
        let rows = vec![
            strings(&["A", "", "", "1-555-123-4567"]),
            strings(&["B", "", "", "555-123-4567"]),
            strings(&["C", "", "", "(555) 123-4567"]),
        ];
        let ids = ids(&process(&headers(), &rows, MatchingType::Phone));
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);
    }

    #[test]
    fn grouping_summary() {
        let rows = vec![
            strings(&["A", "", "a@x.com", ""]),
            strings(&["B", "", "a@x.com", ""]),
            strings(&["C", "", "a@x.com", ""]),
            strings(&["D", "", "", ""]),
        ];
        let grouping = group_rows(&rows, &MatchStrategy::new(MatchingType::Email, &headers()));
        let summary = grouping.summary();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.groups, 2);
        assert_eq!(summary.singletons, 1);
        assert_eq!(summary.largest_group, 3);
    }

    #[test]
    fn grouper_rejects_invalid_matching_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "Email\n").unwrap();

        let err = Grouper::new(&path, "fax").unwrap_err();
        assert!(matches!(err, GroupError::InvalidInput(_)));
    }

    #[test]
    fn grouper_rejects_missing_file() {
        let err = Grouper::new("/definitely/not/here.csv", "email").unwrap_err();
        assert!(matches!(err, GroupError::FileNotFound(_)));
        assert!(err.to_string().contains("here.csv"));
    }

    #[test]
    fn grouper_uses_config_id_column_and_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "").unwrap();

        let config = GroupConfig {
            matching: None,
            id_column: "ClusterID".into(),
            columns: ColumnPatterns { email: "mail".into(), phone: "mobile".into() },
        };
        let grouper = Grouper::with_config(&path, "email_or_phone", config).unwrap();
        assert_eq!(grouper.matching(), MatchingType::EmailOrPhone);
        assert_eq!(grouper.input(), path.as_path());

        let table = Table::new(
            strings(&["Name", "Mail", "Mobile"]),
            vec![
                strings(&["A", "a@x.com", ""]),
                strings(&["B", "", "07700 900123"]),
                strings(&["C", "A@X.COM", "07700900123"]),
            ],
        );
        let out = grouper.process(&table);
        assert_eq!(out[0][0], "ClusterID");
        assert_eq!(ids(&out), vec![1, 1, 1]);
    }

    #[test]
    fn grouper_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let grouper = Grouper::new(&path, "phone").unwrap();
        assert!(grouper.process(&Table::default()).is_empty());
    }
}
