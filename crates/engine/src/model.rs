use serde::Serialize;

/// Materialized tabular input: the first record as headers, the rest as rows.
///
/// Rows are positional; a row may be shorter or longer than `headers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// True for an empty source: no header record at all.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Row position → 1-based group number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    pub assignments: Vec<usize>,
    pub group_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub groups: usize,
    pub singletons: usize,
    pub largest_group: usize,
}

impl Grouping {
    pub fn group_of(&self, row: usize) -> Option<usize> {
        self.assignments.get(row).copied()
    }

    pub fn summary(&self) -> Summary {
        let mut sizes = vec![0usize; self.group_count];
        for &g in &self.assignments {
            if let Some(n) = g.checked_sub(1).and_then(|i| sizes.get_mut(i)) {
                *n += 1;
            }
        }
        Summary {
            rows: self.assignments.len(),
            groups: self.group_count,
            singletons: sizes.iter().filter(|&&n| n == 1).count(),
            largest_group: sizes.iter().copied().max().unwrap_or(0),
        }
    }
}
