//! Columnar attribute reconciliation.
//!
//! Records of one kind arrive with arbitrary, differing property keys. The
//! table folds them into a single column set in one pass: a key first seen
//! at row `i` opens a column padded with `i` absent cells, and every known
//! column receives exactly one cell per pushed row afterwards. Rows are
//! therefore always total over the columns known at the time they were
//! pushed, and the final table is total over all columns.

use std::collections::HashMap;

use serde_json::Value;

use crate::record::Properties;

/// Column carrying the record's declared type.
pub const TYPE_COLUMN: &str = "type";

/// Column carrying the canonical identifier (populated for node tables).
pub const NAME_COLUMN: &str = "name";

const RESERVED: [&str; 2] = [TYPE_COLUMN, NAME_COLUMN];

/// A single reconciled value. `None` is the absent sentinel.
pub type Cell = Option<Value>;

/// Which record kind a table reconciles. Node and edge columns are separate
/// namespaces; only node tables populate the `name` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Node,
    Edge,
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    /// Property key feeding this column. None for reserved columns.
    source_key: Option<String>,
    cells: Vec<Cell>,
}

/// Reconciled, insertion-ordered attribute storage for one record kind.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    kind: TableKind,
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
    rows: usize,
}

impl AttributeTable {
    pub fn new(kind: TableKind) -> Self {
        let mut table = Self {
            kind,
            columns: Vec::new(),
            by_name: HashMap::new(),
            by_key: HashMap::new(),
            rows: 0,
        };
        table.add_column(TYPE_COLUMN.to_string(), None);
        if kind == TableKind::Node {
            table.add_column(NAME_COLUMN.to_string(), None);
        }
        table
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Append one record. `name` is the node Identifier and is ignored for
    /// edge tables.
    pub fn push(&mut self, name: Option<&str>, record_type: &str, properties: &Properties) {
        let row = self.rows;

        for key in properties.keys() {
            if !self.by_key.contains_key(key) {
                let alias = self.free_alias(key);
                let position = self.add_column(alias, Some(key.clone()));
                self.columns[position].cells.resize(row, None);
                self.by_key.insert(key.clone(), position);
            }
        }

        for column in &mut self.columns {
            let cell = match (&column.source_key, column.name.as_str()) {
                (Some(key), _) => properties.get(key).filter(|v| !v.is_null()).cloned(),
                (None, TYPE_COLUMN) => Some(Value::String(record_type.to_string())),
                (None, _) => name.map(|n| Value::String(n.to_string())),
            };
            column.cells.push(cell);
        }

        self.rows += 1;
    }

    /// Column name for a newly observed property key. Reserved names and
    /// names already taken get an underscore prefix until unique.
    fn free_alias(&self, key: &str) -> String {
        let mut alias = if RESERVED.contains(&key) {
            format!("_{}", key)
        } else {
            key.to_string()
        };
        while self.by_name.contains_key(&alias) || RESERVED.contains(&alias.as_str()) {
            alias.insert(0, '_');
        }
        alias
    }

    fn add_column(&mut self, name: String, source_key: Option<String>) -> usize {
        let position = self.columns.len();
        self.by_name.insert(name.clone(), position);
        self.columns.push(Column {
            name,
            source_key,
            cells: Vec::new(),
        });
        position
    }

    /// Number of rows (records) pushed.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in creation order; reserved columns first.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Full column, aligned with record insertion order.
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.by_name
            .get(name)
            .map(|&i| self.columns[i].cells.as_slice())
    }

    /// Value at `row` in column `name`. Missing column, out-of-range row
    /// and absent cell all resolve to None.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name)
            .and_then(|cells| cells.get(row))
            .and_then(|cell| cell.as_ref())
    }

    /// The property key that feeds column `name`, if it is not reserved.
    pub fn source_key(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .and_then(|&i| self.columns[i].source_key.as_deref())
    }

    /// The column a property key was reconciled into.
    pub fn column_for_key(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(|&i| self.columns[i].name.as_str())
    }

    /// All `(column, value)` pairs of one row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.columns.iter().map(move |c| {
            (
                c.name.as_str(),
                c.cells.get(row).and_then(|cell| cell.as_ref()),
            )
        })
    }
}
