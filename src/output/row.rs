//! Result rows

/// Header of the exported table, in column order
pub const COLUMNS: [&str; 7] = [
    "Program",
    "Full URL",
    "Relative Path",
    "Reserved 1",
    "Reserved 2",
    "Reserved 3",
    "Pattern",
];

/// One program found on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub program_name: String,
    pub full_url: String,
    pub relative_path: String,
    /// Placeholder columns kept blank for manual annotation
    pub reserved: [String; 3],
    pub pattern: String,
}

impl ResultRow {
    /// Creates a row with blank reserved columns
    pub fn new(
        program_name: impl Into<String>,
        full_url: impl Into<String>,
        relative_path: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            program_name: program_name.into(),
            full_url: full_url.into(),
            relative_path: relative_path.into(),
            reserved: Default::default(),
            pattern: pattern.into(),
        }
    }

    /// Cell values in `COLUMNS` order
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.program_name,
            &self.full_url,
            &self.relative_path,
            &self.reserved[0],
            &self.reserved[1],
            &self.reserved[2],
            &self.pattern,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_has_blank_reserved_columns() {
        let row = ResultRow::new(
            "Biology (B.S.)",
            "https://example.edu/majors/biology-bs",
            "majors/biology-bs",
            "/majors/.*bs",
        );
        assert_eq!(row.reserved, [String::new(), String::new(), String::new()]);
        assert_eq!(
            row.cells(),
            [
                "Biology (B.S.)",
                "https://example.edu/majors/biology-bs",
                "majors/biology-bs",
                "",
                "",
                "",
                "/majors/.*bs"
            ]
        );
    }
}
