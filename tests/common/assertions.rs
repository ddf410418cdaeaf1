//! Domain-specific assertion helpers for tvstat harnesses.

use std::collections::HashMap;
use std::path::Path;

/// Assert two floats are equal to within `1e-9`.
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr) => {{
        let actual: f64 = $actual;
        let expected: f64 = $expected;
        if (actual - expected).abs() > 1e-9 {
            panic!(
                "assert_close! failed: {}\n  expected: {}\n  actual:   {}",
                stringify!($actual),
                expected,
                actual
            );
        }
    }};
}

/// Parsed CSV table: header plus rows keyed by column name.
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| {
                r.get(name)
                    .unwrap_or_else(|| panic!("column {name:?} not in {:?}", self.header))
                    .as_str()
            })
            .collect()
    }
}

pub fn read_table(path: &Path) -> Table {
    let mut reader = csv::Reader::from_path(path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()));
    let header: Vec<String> = reader.headers().expect("csv header").iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.expect("csv row");
            header.iter().cloned().zip(r.iter().map(str::to_string)).collect()
        })
        .collect();
    Table { header, rows }
}
