//! Database schema types for db-narrate.
//!
//! A lightweight description of the store's tables, used to tell the
//! translation collaborator what it can query.

/// Represents the complete schema of a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// All tables in the schema.
    pub tables: Vec<Table>,

    /// Foreign key relationships between tables.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table with the given name, if present.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Formats the schema for inclusion in an LLM system prompt.
    pub fn format_for_llm(&self) -> String {
        let tables_text = self
            .tables
            .iter()
            .map(|table| self.format_table_for_llm(table))
            .collect::<Vec<_>>()
            .join("");

        let foreign_keys_text = if self.foreign_keys.is_empty() {
            String::new()
        } else {
            let fk_lines = self
                .foreign_keys
                .iter()
                .map(|fk| {
                    format!(
                        "  - {}.{} -> {}.{}\n",
                        fk.from_table, fk.from_column, fk.to_table, fk.to_column
                    )
                })
                .collect::<Vec<_>>()
                .join("");
            format!("Foreign Keys:\n{}", fk_lines)
        };

        format!("Database Schema:\n\n{}{}", tables_text, foreign_keys_text)
    }

    fn format_table_for_llm(&self, table: &Table) -> String {
        let column_lines = table
            .columns
            .iter()
            .map(|column| {
                let annotations = [
                    table.primary_key.contains(&column.name).then_some("PK"),
                    (!column.is_nullable).then_some("NOT NULL"),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();

                if annotations.is_empty() {
                    format!("  - {}: {}\n", column.name, column.data_type)
                } else {
                    format!(
                        "  - {}: {} ({})\n",
                        column.name,
                        column.data_type,
                        annotations.join(", ")
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("");

        format!("Table: {}\n{}\n", table.name, column_lines)
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,

    /// Column names that form the primary key.
    pub primary_key: Vec<String>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Declared type (e.g., "INTEGER", "TEXT").
    pub data_type: String,

    /// Whether the column allows NULL values.
    pub is_nullable: bool,
}

impl Column {
    /// Creates a nullable column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(self, nullable: bool) -> Self {
        Self {
            is_nullable: nullable,
            ..self
        }
    }
}

/// A single-column foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKey {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

impl ForeignKey {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
        }
    }
}
