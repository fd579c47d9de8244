//! Analysis visitors built on the generic walk

use crate::ast::*;

use super::{walk_alter_table, walk_create_table, walk_insert, walk_query, DepthCounter, Visitor};

/// Parameter ordinals in tree order
#[derive(Debug, Default)]
pub struct ParamCollector {
    pub indexes: Vec<u32>,
}

impl ParamCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for ParamCollector {
    fn visit_param_marker(&mut self, param: &ParamMarker) {
        self.indexes.push(param.index);
    }
}

/// A table referenced by a statement
#[derive(Debug, Clone, PartialEq)]
pub struct TableUse {
    pub name: Identifier,
    pub alias: Option<String>,
    /// Number of enclosing query expressions; 0 for DML/DDL targets
    pub depth: usize,
}

/// Collects referenced tables, e.g. for routing a statement to a shard
#[derive(Debug, Default)]
pub struct TableCollector {
    pub tables: Vec<TableUse>,
    queries: DepthCounter,
}

impl TableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct table names in first-use order, qualified names dotted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for t in &self.tables {
            let name = t.name.parts().join(".");
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn record(&mut self, name: &Identifier, alias: Option<&String>) {
        self.tables.push(TableUse {
            name: name.clone(),
            alias: alias.cloned(),
            depth: self.queries.depth(),
        });
    }
}

impl Visitor for TableCollector {
    fn visit_query(&mut self, query: &Query) {
        self.queries.push();
        walk_query(self, query);
        self.queries.pop();
    }

    fn visit_table_factor(&mut self, factor: &TableFactor) {
        self.record(&factor.name, factor.alias.as_ref());
    }

    fn visit_insert(&mut self, insert: &InsertStmt) {
        self.record(&insert.table, None);
        walk_insert(self, insert);
    }

    fn visit_replace(&mut self, insert: &InsertStmt) {
        self.visit_insert(insert);
    }

    fn visit_create_table(&mut self, create: &CreateTableStmt) {
        self.record(&create.name, None);
        walk_create_table(self, create);
    }

    fn visit_alter_table(&mut self, alter: &AlterTableStmt) {
        self.record(&alter.table, None);
        walk_alter_table(self, alter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_param_collector_tree_order() {
        let stmt = parse("SELECT ? FROM t WHERE a = ? AND b IN (?, ?) LIMIT ?").unwrap();
        let mut params = ParamCollector::new();
        stmt.accept(&mut params);
        assert_eq!(params.indexes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_table_collector_depths() {
        let stmt = parse(
            "SELECT * FROM orders o JOIN db.users u ON o.uid = u.id \
             WHERE o.id IN (SELECT oid FROM refunds)",
        )
        .unwrap();
        let mut tables = TableCollector::new();
        stmt.accept(&mut tables);
        assert_eq!(tables.names(), vec!["orders", "db.users", "refunds"]);
        let depths: Vec<usize> = tables.tables.iter().map(|t| t.depth).collect();
        assert_eq!(depths, vec![1, 1, 2]);
        assert_eq!(tables.tables[0].alias.as_deref(), Some("o"));
    }

    #[test]
    fn test_table_collector_insert_select() {
        let stmt = parse("INSERT INTO archive SELECT * FROM events WHERE ts < 10").unwrap();
        let mut tables = TableCollector::new();
        stmt.accept(&mut tables);
        let found: Vec<(String, usize)> = tables
            .tables
            .iter()
            .map(|t| (t.name.name.clone(), t.depth))
            .collect();
        assert_eq!(found, vec![("archive".to_string(), 0), ("events".to_string(), 1)]);
    }
}
