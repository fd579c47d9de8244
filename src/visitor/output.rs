//! SQL regeneration
//!
//! [`OutputVisitor`] writes a tree back out as SQL with uppercase keywords,
//! single spaces around operators and `, ` between list items. Parentheses
//! appear only where precedence and combine direction require them:
//!
//! - binary operator with precedence P: the left child is parenthesized iff
//!   its precedence is `< P` (`<= P` when the operator does not combine to
//!   the left), the right child iff `<= P` (`< P` when it does not)
//! - prefix operators, `IS`, `COLLATE`: operand iff `< P`
//! - BETWEEN / LIKE .. ESCAPE and AND / OR chains: operands iff `<= P`
//! - joins follow the binary rule at `JOIN` precedence
//!
//! Each emitted `?` is renumbered in output order; [`OutputVisitor::arguments`]
//! returns the bound arguments in that order. The tree is never modified.

use std::collections::HashMap;

use log::debug;

use crate::ast::precedence::{JOIN, PREDICATE, PRIMARY};
use crate::ast::*;
use crate::lexer::keywords;
use crate::types::Value;

use super::Visitor;

/// Writes SQL text for a tree
pub struct OutputVisitor<'a> {
    buf: String,
    args: &'a [Value],
    /// Source argument slot of every emitted `?`, in output order
    args_index: Vec<usize>,
    placeholders: HashMap<String, String>,
}

impl<'a> OutputVisitor<'a> {
    /// Append output to `buf`; `args` are the arguments bound to the source `?`s
    pub fn new(buf: String, args: &'a [Value]) -> Self {
        Self {
            buf,
            args,
            args_index: Vec::new(),
            placeholders: HashMap::new(),
        }
    }

    /// Text substituted for `${name}` placeholders
    pub fn with_placeholders(mut self, placeholders: HashMap<String, String>) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn sql(&self) -> &str {
        &self.buf
    }

    pub fn into_sql(self) -> String {
        self.buf
    }

    /// Source argument slot for each emitted `?`
    pub fn args_index(&self) -> &[usize] {
        &self.args_index
    }

    /// Bound arguments in output order.
    ///
    /// The source arguments are returned as they are when output order
    /// matches source order; without source arguments the result is empty.
    ///
    /// # Panics
    /// If an emitted `?` has no bound argument.
    pub fn arguments(&self) -> Vec<Value> {
        if self.args.is_empty() {
            return Vec::new();
        }
        let identity = self.args_index.len() == self.args.len()
            && self.args_index.iter().enumerate().all(|(i, &slot)| i == slot);
        if identity {
            return self.args.to_vec();
        }
        debug!(
            "Re-ordering {} bound arguments into {} parameter slots",
            self.args.len(),
            self.args_index.len()
        );
        self.args_index
            .iter()
            .map(|&slot| match self.args.get(slot) {
                Some(v) => v.clone(),
                None => panic!(
                    "parameter {} has no bound argument ({} given)",
                    slot + 1,
                    self.args.len()
                ),
            })
            .collect()
    }

    //-------------------------------------------------------------------------
    // Text helpers
    //-------------------------------------------------------------------------

    fn push(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Identifier, back-tick quoted when needed
    fn name(&mut self, name: &str) {
        if needs_quotes(name) {
            self.quoted_name(name);
        } else {
            self.buf.push_str(name);
        }
    }

    fn quoted_name(&mut self, name: &str) {
        self.buf.push('`');
        self.buf.push_str(&name.replace('`', "``"));
        self.buf.push('`');
    }

    fn names(&mut self, names: &[String]) {
        for (i, n) in names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.name(n);
        }
    }

    fn string(&mut self, value: &str) {
        self.buf.push('\'');
        for c in value.chars() {
            match c {
                '\\' => self.buf.push_str("\\\\"),
                '\'' => self.buf.push_str("''"),
                '\0' => self.buf.push_str("\\0"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\x1a' => self.buf.push_str("\\Z"),
                c => self.buf.push(c),
            }
        }
        self.buf.push('\'');
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_expr(e);
        }
    }

    fn operand(&mut self, expr: &Expr, parenthesize: bool) {
        if parenthesize {
            self.buf.push('(');
            self.visit_expr(expr);
            self.buf.push(')');
        } else {
            self.visit_expr(expr);
        }
    }

    fn parenthesized_query(&mut self, query: &Query) {
        self.buf.push('(');
        self.visit_query(query);
        self.buf.push(')');
    }

    fn order_list(&mut self, keyword: &str, items: &[OrderByClause]) {
        if items.is_empty() {
            return;
        }
        self.push(keyword);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_order_by(item);
        }
    }

    fn table_list(&mut self, tables: &[TableRef]) {
        for (i, t) in tables.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_table_ref(t);
        }
    }

    fn identifiers(&mut self, idents: &[Identifier]) {
        for (i, id) in idents.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_identifier(id);
        }
    }

    fn assignments(&mut self, assignments: &[Assignment]) {
        for (i, a) in assignments.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_assignment(a);
        }
    }

    fn where_clause(&mut self, e: &Option<Expr>) {
        if let Some(e) = e {
            self.push(" WHERE ");
            self.visit_expr(e);
        }
    }

    fn limit(&mut self, limit: &Option<Limit>) {
        if let Some(limit) = limit {
            self.push(" ");
            self.visit_limit(limit);
        }
    }

    //-------------------------------------------------------------------------
    // Expressions
    //-------------------------------------------------------------------------

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Null => self.push("NULL"),
            Literal::Boolean(true) => self.push("TRUE"),
            Literal::Boolean(false) => self.push("FALSE"),
            Literal::Integer(v) => self.push(&v.to_string()),
            Literal::Decimal(text) => self.push(text),
            Literal::String(s) => {
                if let Some(cs) = &s.introducer {
                    self.buf.push('_');
                    self.push(cs);
                } else if s.national {
                    self.buf.push('N');
                }
                self.string(&s.value);
            }
            Literal::Hex { digits, quoted: true } => {
                self.push("X'");
                self.push(digits);
                self.buf.push('\'');
            }
            Literal::Hex { digits, quoted: false } => {
                self.push("0x");
                self.push(digits);
            }
            Literal::Bit { digits, quoted: true } => {
                self.push("b'");
                self.push(digits);
                self.buf.push('\'');
            }
            Literal::Bit { digits, quoted: false } => {
                self.push("0b");
                self.push(digits);
            }
        }
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr) {
        self.push(op.symbol());
        if matches!(op, UnaryOp::Not | UnaryOp::Binary) {
            self.buf.push(' ');
        }
        let mark = self.buf.len();
        self.operand(operand, operand.precedence() < op.precedence());
        // `--` followed by a space would start a comment
        if op == UnaryOp::Minus && self.buf[mark..].starts_with('-') {
            self.buf.insert(mark, ' ');
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) {
        let p = op.precedence();
        let (lp, rp) = (left.precedence(), right.precedence());
        if op.left_combine() {
            self.operand(left, lp < p);
        } else {
            self.operand(left, lp <= p);
        }
        self.buf.push(' ');
        self.push(op.symbol());
        self.buf.push(' ');
        if op.left_combine() {
            self.operand(right, rp <= p);
        } else {
            self.operand(right, rp < p);
        }
    }

    fn ternary(&mut self, op: TernaryOp, first: &Expr, second: &Expr, third: &Expr) {
        let p = PREDICATE;
        let (kw1, kw2) = op.keywords();
        self.operand(first, first.precedence() <= p);
        self.buf.push(' ');
        self.push(kw1);
        self.buf.push(' ');
        self.operand(second, second.precedence() <= p);
        self.buf.push(' ');
        self.push(kw2);
        self.buf.push(' ');
        self.operand(third, third.precedence() <= p);
    }

    fn polyadic(&mut self, op: PolyadicOp, operands: &[Expr]) {
        assert!(!operands.is_empty(), "{} chain without operands", op.keyword());
        let p = op.precedence();
        for (i, e) in operands.iter().enumerate() {
            if i > 0 {
                self.buf.push(' ');
                self.push(op.keyword());
                self.buf.push(' ');
            }
            self.operand(e, e.precedence() <= p);
        }
    }

    fn case(&mut self, case: &CaseExpr) {
        assert!(!case.whens.is_empty(), "CASE expression without WHEN");
        self.push("CASE ");
        if let Some(e) = &case.operand {
            self.visit_expr(e);
            self.buf.push(' ');
        }
        for (when, then) in &case.whens {
            self.push("WHEN ");
            self.visit_expr(when);
            self.push(" THEN ");
            self.visit_expr(then);
            self.buf.push(' ');
        }
        if let Some(e) = &case.else_result {
            self.push("ELSE ");
            self.visit_expr(e);
            self.buf.push(' ');
        }
        self.push("END");
    }

    fn cast_type(&mut self, target: &CastType) {
        self.push(&target.name);
        if let Some(len) = target.length {
            self.buf.push('(');
            self.push(&len.to_string());
            if let Some(scale) = target.scale {
                self.push(", ");
                self.push(&scale.to_string());
            }
            self.buf.push(')');
        }
        if let Some(cs) = &target.charset {
            self.push(" CHARACTER SET ");
            self.name(cs);
        }
    }

    fn user_variable(&mut self, name: &str) {
        self.buf.push('@');
        let plain = !name.is_empty()
            && name.bytes().all(|b| is_name_byte(b) || b == b'.');
        if plain {
            self.push(name);
        } else {
            self.quoted_name(name);
        }
    }

    fn function_name(&mut self, name: &str) {
        self.push(name);
        self.buf.push('(');
    }

    //-------------------------------------------------------------------------
    // Statements
    //-------------------------------------------------------------------------

    fn body(&mut self, body: &[Statement]) {
        for s in body {
            self.visit_statement(s);
            self.push("; ");
        }
    }

    fn label(&mut self, label: &Option<String>) {
        if let Some(l) = label {
            self.name(l);
            self.push(": ");
        }
    }

    fn end_label(&mut self, label: &Option<String>) {
        if let Some(l) = label {
            self.buf.push(' ');
            self.name(l);
        }
    }

    fn branches(&mut self, branches: &[ConditionalBranch], first: &str, next: &str) {
        for (i, branch) in branches.iter().enumerate() {
            self.push(if i == 0 { first } else { next });
            self.visit_expr(&branch.condition);
            self.push(" THEN ");
            self.body(&branch.body);
        }
    }

    fn else_body(&mut self, body: &Option<Vec<Statement>>) {
        if let Some(body) = body {
            self.push("ELSE ");
            self.body(body);
        }
    }

    fn condition_value(&mut self, value: &ConditionValue) {
        match value {
            ConditionValue::ErrorCode(code) => self.push(&code.to_string()),
            ConditionValue::SqlState(state) => {
                self.push("SQLSTATE ");
                self.string(state);
            }
            ConditionValue::Name(name) => self.name(name),
            ConditionValue::SqlWarning => self.push("SQLWARNING"),
            ConditionValue::NotFound => self.push("NOT FOUND"),
            ConditionValue::SqlException => self.push("SQLEXCEPTION"),
        }
    }

    fn signal(&mut self, keyword: &str, signal: &SignalStmt) {
        self.push(keyword);
        if let Some(c) = &signal.condition {
            self.buf.push(' ');
            self.condition_value(c);
        }
        for (i, item) in signal.items.iter().enumerate() {
            self.push(if i == 0 { " SET " } else { ", " });
            self.push(&item.name);
            self.push(" = ");
            self.visit_expr(&item.value);
        }
    }

    fn insert(&mut self, keyword: &str, insert: &InsertStmt) {
        self.push(keyword);
        if let Some(p) = insert.priority {
            self.buf.push(' ');
            self.push(p.keyword());
        }
        if insert.ignore {
            self.push(" IGNORE");
        }
        self.push(" INTO ");
        self.visit_identifier(&insert.table);
        if !insert.columns.is_empty() {
            self.push(" (");
            self.identifiers(&insert.columns);
            self.buf.push(')');
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                self.push(" VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.buf.push('(');
                    self.exprs(row);
                    self.buf.push(')');
                }
            }
            InsertSource::Set(assignments) => {
                self.push(" SET ");
                self.assignments(assignments);
            }
            InsertSource::Query(query) => {
                self.buf.push(' ');
                self.visit_query(query);
            }
        }
        if !insert.on_duplicate.is_empty() {
            self.push(" ON DUPLICATE KEY UPDATE ");
            self.assignments(&insert.on_duplicate);
        }
    }

    fn data_type(&mut self, t: &DataType) {
        self.push(&t.name);
        if !t.args.is_empty() {
            self.buf.push('(');
            let args: Vec<String> = t.args.iter().map(|a| a.to_string()).collect();
            self.push(&args.join(", "));
            self.buf.push(')');
        }
        if !t.values.is_empty() {
            self.buf.push('(');
            for (i, v) in t.values.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.string(v);
            }
            self.buf.push(')');
        }
        if t.unsigned {
            self.push(" UNSIGNED");
        }
        if t.zerofill {
            self.push(" ZEROFILL");
        }
        if let Some(cs) = &t.charset {
            self.push(" CHARACTER SET ");
            self.name(cs);
        }
        if let Some(c) = &t.collation {
            self.push(" COLLATE ");
            self.name(c);
        }
    }

    fn index_columns(&mut self, columns: &[IndexColumn]) {
        self.buf.push('(');
        for (i, c) in columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.name(&c.name);
            if let Some(len) = c.length {
                self.buf.push('(');
                self.push(&len.to_string());
                self.buf.push(')');
            }
            match c.direction {
                Some(SortOrder::Asc) => self.push(" ASC"),
                Some(SortOrder::Desc) => self.push(" DESC"),
                None => {}
            }
        }
        self.buf.push(')');
    }

    fn constraint(&mut self, constraint: &Option<String>) {
        if let Some(c) = constraint {
            self.push("CONSTRAINT ");
            self.name(c);
            self.buf.push(' ');
        }
    }

    fn key_def(&mut self, key: &KeyDef) {
        self.constraint(&key.constraint);
        self.push(match key.kind {
            KeyKind::Primary => "PRIMARY KEY",
            KeyKind::Unique => "UNIQUE KEY",
            KeyKind::Index => "KEY",
            KeyKind::Fulltext => "FULLTEXT KEY",
        });
        self.buf.push(' ');
        if let Some(name) = &key.name {
            self.name(name);
            self.buf.push(' ');
        }
        self.index_columns(&key.columns);
    }

    fn foreign_key(&mut self, fk: &ForeignKeyDef) {
        self.constraint(&fk.constraint);
        self.push("FOREIGN KEY ");
        if let Some(name) = &fk.name {
            self.name(name);
            self.buf.push(' ');
        }
        self.buf.push('(');
        self.names(&fk.columns);
        self.push(") REFERENCES ");
        self.visit_identifier(&fk.ref_table);
        self.push(" (");
        self.names(&fk.ref_columns);
        self.buf.push(')');
        if let Some(action) = &fk.on_delete {
            self.push(" ON DELETE ");
            self.push(action);
        }
        if let Some(action) = &fk.on_update {
            self.push(" ON UPDATE ");
            self.push(action);
        }
    }

    fn table_option(&mut self, option: &TableOption) {
        self.push(&option.name);
        self.buf.push('=');
        self.visit_expr(&option.value);
    }

    fn column_position(&mut self, position: &Option<ColumnPosition>) {
        match position {
            Some(ColumnPosition::First) => self.push(" FIRST"),
            Some(ColumnPosition::After(c)) => {
                self.push(" AFTER ");
                self.name(c);
            }
            None => {}
        }
    }

    fn alter_action(&mut self, action: &AlterAction) {
        match action {
            AlterAction::AddColumn { column, position } => {
                self.push("ADD COLUMN ");
                self.visit_column_def(column);
                self.column_position(position);
            }
            AlterAction::DropColumn(name) => {
                self.push("DROP COLUMN ");
                self.name(name);
            }
            AlterAction::ModifyColumn { column, position } => {
                self.push("MODIFY COLUMN ");
                self.visit_column_def(column);
                self.column_position(position);
            }
            AlterAction::ChangeColumn { old_name, column, position } => {
                self.push("CHANGE COLUMN ");
                self.name(old_name);
                self.buf.push(' ');
                self.visit_column_def(column);
                self.column_position(position);
            }
            AlterAction::AddKey(key) => {
                self.push("ADD ");
                self.key_def(key);
            }
            AlterAction::AddForeignKey(fk) => {
                self.push("ADD ");
                self.foreign_key(fk);
            }
            AlterAction::DropIndex(name) => {
                self.push("DROP INDEX ");
                self.name(name);
            }
            AlterAction::DropPrimaryKey => self.push("DROP PRIMARY KEY"),
            AlterAction::DropForeignKey(name) => {
                self.push("DROP FOREIGN KEY ");
                self.name(name);
            }
            AlterAction::RenameTo(name) => {
                self.push("RENAME TO ");
                self.visit_identifier(name);
            }
            AlterAction::Option(option) => self.table_option(option),
        }
    }
}

impl<'a> Visitor for OutputVisitor<'a> {
    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Select(query) => self.visit_query(query),
            Statement::Insert(insert) => self.visit_insert(insert),
            Statement::Replace(insert) => self.visit_replace(insert),
            Statement::Update(update) => self.visit_update(update),
            Statement::Delete(delete) => self.visit_delete(delete),
            Statement::Call { name, args } => {
                self.push("CALL ");
                self.visit_identifier(name);
                self.buf.push('(');
                self.exprs(args);
                self.buf.push(')');
            }
            Statement::Set(assignments) => {
                self.push("SET ");
                for (i, a) in assignments.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.visit_expr(&a.target);
                    self.push(" = ");
                    self.visit_expr(&a.value);
                }
            }
            Statement::SetNames { charset, collation } => {
                self.push("SET NAMES ");
                self.name(charset);
                if let Some(c) = collation {
                    self.push(" COLLATE ");
                    self.name(c);
                }
            }
            Statement::Use(db) => {
                self.push("USE ");
                self.name(db);
            }
            Statement::ShowTables { full, database, like } => {
                self.push(if *full { "SHOW FULL TABLES" } else { "SHOW TABLES" });
                if let Some(db) = database {
                    self.push(" FROM ");
                    self.name(db);
                }
                if let Some(pattern) = like {
                    self.push(" LIKE ");
                    self.string(pattern);
                }
            }
            Statement::ShowDatabases { like } => {
                self.push("SHOW DATABASES");
                if let Some(pattern) = like {
                    self.push(" LIKE ");
                    self.string(pattern);
                }
            }
            Statement::Describe(table) => {
                self.push("DESCRIBE ");
                self.visit_identifier(table);
            }
            Statement::StartTransaction => self.push("START TRANSACTION"),
            Statement::Commit => self.push("COMMIT"),
            Statement::Rollback => self.push("ROLLBACK"),
            Statement::CreateTable(create) => self.visit_create_table(create),
            Statement::CreateIndex(create) => {
                self.push(if create.unique { "CREATE UNIQUE INDEX " } else { "CREATE INDEX " });
                self.name(&create.name);
                self.push(" ON ");
                self.visit_identifier(&create.table);
                self.buf.push(' ');
                self.index_columns(&create.columns);
            }
            Statement::AlterTable(alter) => self.visit_alter_table(alter),
            Statement::DropTable { temporary, if_exists, tables, behavior } => {
                self.push(if *temporary { "DROP TEMPORARY TABLE " } else { "DROP TABLE " });
                if *if_exists {
                    self.push("IF EXISTS ");
                }
                self.identifiers(tables);
                match behavior {
                    Some(DropBehavior::Restrict) => self.push(" RESTRICT"),
                    Some(DropBehavior::Cascade) => self.push(" CASCADE"),
                    None => {}
                }
            }
            Statement::DropIndex { name, table } => {
                self.push("DROP INDEX ");
                self.name(name);
                self.push(" ON ");
                self.visit_identifier(table);
            }
            Statement::Truncate(table) => {
                self.push("TRUNCATE TABLE ");
                self.visit_identifier(table);
            }
            Statement::RenameTable(pairs) => {
                self.push("RENAME TABLE ");
                for (i, (from, to)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.visit_identifier(from);
                    self.push(" TO ");
                    self.visit_identifier(to);
                }
            }
            Statement::Block { label, body } => {
                self.label(label);
                self.push("BEGIN ");
                self.body(body);
                self.push("END");
                self.end_label(label);
            }
            Statement::If { branches, else_body } => {
                assert!(!branches.is_empty(), "IF statement without condition");
                self.branches(branches, "IF ", "ELSEIF ");
                self.else_body(else_body);
                self.push("END IF");
            }
            Statement::Case { operand, branches, else_body } => {
                assert!(!branches.is_empty(), "CASE statement without WHEN");
                self.push("CASE ");
                if let Some(e) = operand {
                    self.visit_expr(e);
                    self.buf.push(' ');
                }
                self.branches(branches, "WHEN ", "WHEN ");
                self.else_body(else_body);
                self.push("END CASE");
            }
            Statement::Loop { label, body } => {
                self.label(label);
                self.push("LOOP ");
                self.body(body);
                self.push("END LOOP");
                self.end_label(label);
            }
            Statement::While { label, condition, body } => {
                self.label(label);
                self.push("WHILE ");
                self.visit_expr(condition);
                self.push(" DO ");
                self.body(body);
                self.push("END WHILE");
                self.end_label(label);
            }
            Statement::Repeat { label, body, until } => {
                self.label(label);
                self.push("REPEAT ");
                self.body(body);
                self.push("UNTIL ");
                self.visit_expr(until);
                self.push(" END REPEAT");
                self.end_label(label);
            }
            Statement::Leave(label) => {
                self.push("LEAVE ");
                self.name(label);
            }
            Statement::Iterate(label) => {
                self.push("ITERATE ");
                self.name(label);
            }
            Statement::Return(e) => {
                self.push("RETURN ");
                self.visit_expr(e);
            }
            Statement::DeclareVariable { names, data_type, default } => {
                self.push("DECLARE ");
                self.names(names);
                self.buf.push(' ');
                self.data_type(data_type);
                if let Some(e) = default {
                    self.push(" DEFAULT ");
                    self.visit_expr(e);
                }
            }
            Statement::DeclareCondition { name, value } => {
                self.push("DECLARE ");
                self.name(name);
                self.push(" CONDITION FOR ");
                self.condition_value(value);
            }
            Statement::DeclareCursor { name, query } => {
                self.push("DECLARE ");
                self.name(name);
                self.push(" CURSOR FOR ");
                self.visit_query(query);
            }
            Statement::DeclareHandler { action, conditions, body } => {
                self.push("DECLARE ");
                self.push(action.keyword());
                self.push(" HANDLER FOR ");
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.condition_value(c);
                }
                self.buf.push(' ');
                self.visit_statement(body);
            }
            Statement::Open(cursor) => {
                self.push("OPEN ");
                self.name(cursor);
            }
            Statement::Fetch { cursor, into } => {
                self.push("FETCH ");
                self.name(cursor);
                self.push(" INTO ");
                self.names(into);
            }
            Statement::Close(cursor) => {
                self.push("CLOSE ");
                self.name(cursor);
            }
            Statement::Signal(signal) => self.signal("SIGNAL", signal),
            Statement::Resignal(signal) => self.signal("RESIGNAL", signal),
            Statement::GetDiagnostics(diag) => {
                self.push("GET ");
                match diag.area {
                    Some(DiagnosticsArea::Current) => self.push("CURRENT "),
                    Some(DiagnosticsArea::Stacked) => self.push("STACKED "),
                    None => {}
                }
                self.push("DIAGNOSTICS ");
                if let Some(n) = &diag.condition {
                    self.push("CONDITION ");
                    self.visit_expr(n);
                    self.buf.push(' ');
                }
                for (i, item) in diag.items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.visit_expr(&item.target);
                    self.push(" = ");
                    self.push(&item.name);
                }
            }
        }
    }

    fn visit_query(&mut self, query: &Query) {
        match query {
            Query::Select(select) => self.visit_select(select),
            Query::Union(union) => self.visit_union(union),
        }
    }

    fn visit_select(&mut self, select: &Select) {
        self.push("SELECT ");
        if select.distinct {
            self.push("DISTINCT ");
        }
        for option in &select.options {
            self.push(option.keyword());
            self.buf.push(' ');
        }
        for (i, item) in select.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit_select_item(item);
        }
        if !select.from.is_empty() {
            self.push(" FROM ");
            self.table_list(&select.from);
        }
        self.where_clause(&select.where_clause);
        self.order_list(" GROUP BY ", &select.group_by);
        if select.with_rollup {
            self.push(" WITH ROLLUP");
        }
        if let Some(e) = &select.having {
            self.push(" HAVING ");
            self.visit_expr(e);
        }
        self.order_list(" ORDER BY ", &select.order_by);
        self.limit(&select.limit);
        match select.lock {
            Some(LockMode::ForUpdate) => self.push(" FOR UPDATE"),
            Some(LockMode::ShareMode) => self.push(" LOCK IN SHARE MODE"),
            None => {}
        }
    }

    fn visit_union(&mut self, union: &Union) {
        for (i, select) in union.selects().enumerate() {
            if i > 0 {
                self.buf.push(' ');
                self.push(union.rest[i - 1].0.keyword());
                self.buf.push(' ');
            }
            if select.has_trailing_clauses() {
                self.buf.push('(');
                self.visit_select(select);
                self.buf.push(')');
            } else {
                self.visit_select(select);
            }
        }
        self.order_list(" ORDER BY ", &union.order_by);
        self.limit(&union.limit);
    }

    fn visit_select_item(&mut self, item: &SelectItem) {
        self.visit_expr(&item.expr);
        if let Some(alias) = &item.alias {
            self.push(" AS ");
            self.name(alias);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.visit_literal(lit),
            Expr::Identifier(ident) => self.visit_identifier(ident),
            Expr::ParamMarker(p) => self.visit_param_marker(p),
            Expr::Placeholder(p) => self.visit_placeholder(p),
            Expr::UserVariable(name) => self.user_variable(name),
            Expr::SysVariable { scope, name } => {
                self.push("@@");
                if let Some(scope) = scope {
                    self.push(scope.as_str());
                    self.buf.push('.');
                }
                self.name(name);
            }
            Expr::Unary { op, operand } => self.unary(*op, operand),
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Ternary { op, first, second, third } => self.ternary(*op, first, second, third),
            Expr::Polyadic { op, operands } => self.polyadic(*op, operands),
            Expr::Is { operand, not, test } => {
                self.operand(operand, operand.precedence() < expr.precedence());
                self.push(if *not { " IS NOT " } else { " IS " });
                self.push(test.keyword());
            }
            Expr::In { operand, not, set } => {
                self.operand(operand, operand.precedence() < PREDICATE);
                self.push(if *not { " NOT IN (" } else { " IN (" });
                match set {
                    InSet::List(list) => {
                        assert!(!list.is_empty(), "IN without values");
                        self.exprs(list);
                    }
                    InSet::Subquery(query) => self.visit_query(query),
                }
                self.buf.push(')');
            }
            Expr::Quantified { op, quantifier, left, subquery } => {
                self.operand(left, left.precedence() < op.precedence());
                self.buf.push(' ');
                self.push(op.symbol());
                self.buf.push(' ');
                self.push(quantifier.keyword());
                self.buf.push(' ');
                self.parenthesized_query(subquery);
            }
            Expr::Exists(query) => {
                self.push("EXISTS ");
                self.parenthesized_query(query);
            }
            Expr::Subquery(query) => self.parenthesized_query(query),
            Expr::Row(items) => {
                assert!(!items.is_empty(), "row constructor without values");
                if items.len() == 1 {
                    self.push("ROW");
                }
                self.buf.push('(');
                self.exprs(items);
                self.buf.push(')');
            }
            Expr::Case(case) => self.case(case),
            Expr::Interval { value, unit } => {
                self.push("INTERVAL ");
                self.operand(value, value.precedence() < PRIMARY);
                self.buf.push(' ');
                self.push(unit.keyword());
            }
            Expr::Collate { operand, collation } => {
                self.operand(operand, operand.precedence() < expr.precedence());
                self.push(" COLLATE ");
                self.name(collation);
            }
            Expr::Default => self.push("DEFAULT"),
            Expr::Function(call) => self.visit_function(call),
            Expr::Count { distinct, args } => {
                self.function_name("COUNT");
                if args.is_empty() {
                    self.buf.push('*');
                } else {
                    if *distinct {
                        self.push("DISTINCT ");
                    }
                    self.exprs(args);
                }
                self.buf.push(')');
            }
            Expr::Cast { operand, target } => {
                self.function_name("CAST");
                self.visit_expr(operand);
                self.push(" AS ");
                self.cast_type(target);
                self.buf.push(')');
            }
            Expr::Convert { operand, target } => {
                self.function_name("CONVERT");
                self.visit_expr(operand);
                match target {
                    ConvertTarget::Type(t) => {
                        self.push(", ");
                        self.cast_type(t);
                    }
                    ConvertTarget::Charset(cs) => {
                        self.push(" USING ");
                        self.name(cs);
                    }
                }
                self.buf.push(')');
            }
            Expr::Trim { mode, remove, string } => {
                self.function_name("TRIM");
                if let Some(mode) = mode {
                    self.push(mode.keyword());
                    self.buf.push(' ');
                }
                if let Some(r) = remove {
                    self.visit_expr(r);
                    self.buf.push(' ');
                }
                if mode.is_some() || remove.is_some() {
                    self.push("FROM ");
                }
                self.visit_expr(string);
                self.buf.push(')');
            }
            Expr::Extract { unit, operand } => {
                self.function_name("EXTRACT");
                self.push(unit.keyword());
                self.push(" FROM ");
                self.visit_expr(operand);
                self.buf.push(')');
            }
            Expr::GroupConcat(gc) => {
                self.function_name("GROUP_CONCAT");
                if gc.distinct {
                    self.push("DISTINCT ");
                }
                self.exprs(&gc.args);
                self.order_list(" ORDER BY ", &gc.order_by);
                if let Some(sep) = &gc.separator {
                    self.push(" SEPARATOR ");
                    self.string(sep);
                }
                self.buf.push(')');
            }
            Expr::TimestampAdd { unit, interval, timestamp } => {
                self.function_name("TIMESTAMPADD");
                self.push(unit.keyword());
                self.push(", ");
                self.visit_expr(interval);
                self.push(", ");
                self.visit_expr(timestamp);
                self.buf.push(')');
            }
            Expr::TimestampDiff { unit, start, end } => {
                self.function_name("TIMESTAMPDIFF");
                self.push(unit.keyword());
                self.push(", ");
                self.visit_expr(start);
                self.push(", ");
                self.visit_expr(end);
                self.buf.push(')');
            }
            Expr::Char { args, charset } => {
                self.function_name("CHAR");
                self.exprs(args);
                if let Some(cs) = charset {
                    self.push(" USING ");
                    self.name(cs);
                }
                self.buf.push(')');
            }
            Expr::Position { needle, haystack } => {
                self.function_name("POSITION");
                self.operand(needle, needle.precedence() <= PREDICATE);
                self.push(" IN ");
                self.visit_expr(haystack);
                self.buf.push(')');
            }
            Expr::Substring { string, from, length } => {
                self.function_name("SUBSTRING");
                self.visit_expr(string);
                self.push(", ");
                self.visit_expr(from);
                if let Some(len) = length {
                    self.push(", ");
                    self.visit_expr(len);
                }
                self.buf.push(')');
            }
            Expr::Niladic(name) => self.push(name),
        }
    }

    fn visit_literal(&mut self, literal: &Literal) {
        self.literal(literal);
    }

    fn visit_identifier(&mut self, ident: &Identifier) {
        if let Some(parent) = &ident.parent {
            self.visit_identifier(parent);
            self.buf.push('.');
        }
        if ident.is_wildcard() {
            self.buf.push('*');
        } else if ident.quoted {
            self.quoted_name(&ident.name);
        } else {
            self.name(&ident.name);
        }
    }

    fn visit_param_marker(&mut self, param: &ParamMarker) {
        self.buf.push('?');
        self.args_index.push((param.index as usize).saturating_sub(1));
    }

    fn visit_placeholder(&mut self, placeholder: &Placeholder) {
        match self.placeholders.get(&placeholder.name) {
            Some(text) => {
                let text = text.clone();
                self.push(&text);
            }
            None => {
                self.push("${");
                self.push(&placeholder.name);
                self.buf.push('}');
            }
        }
    }

    fn visit_function(&mut self, call: &FunctionCall) {
        self.function_name(&call.name);
        if call.distinct {
            self.push("DISTINCT ");
        }
        self.exprs(&call.args);
        self.buf.push(')');
    }

    fn visit_table_ref(&mut self, table: &TableRef) {
        match table {
            TableRef::Factor(factor) => self.visit_table_factor(factor),
            TableRef::Subquery { query, alias } => {
                self.parenthesized_query(query);
                self.push(" AS ");
                self.name(alias);
            }
            TableRef::Join(join) => self.visit_join(join),
        }
    }

    fn visit_table_factor(&mut self, factor: &TableFactor) {
        self.visit_identifier(&factor.name);
        if let Some(alias) = &factor.alias {
            self.push(" AS ");
            self.name(alias);
        }
        for hint in &factor.hints {
            self.push(match hint.kind {
                IndexHintKind::Use => " USE INDEX ",
                IndexHintKind::Ignore => " IGNORE INDEX ",
                IndexHintKind::Force => " FORCE INDEX ",
            });
            match hint.scope {
                Some(IndexHintScope::Join) => self.push("FOR JOIN "),
                Some(IndexHintScope::OrderBy) => self.push("FOR ORDER BY "),
                Some(IndexHintScope::GroupBy) => self.push("FOR GROUP BY "),
                None => {}
            }
            self.buf.push('(');
            self.names(&hint.indexes);
            self.buf.push(')');
        }
    }

    fn visit_join(&mut self, join: &Join) {
        let left_paren = join.left.precedence() < JOIN;
        let right_paren = join.right.precedence() <= JOIN;
        if left_paren {
            self.buf.push('(');
        }
        self.visit_table_ref(&join.left);
        if left_paren {
            self.buf.push(')');
        }
        self.buf.push(' ');
        self.push(join.kind.keyword());
        self.buf.push(' ');
        if right_paren {
            self.buf.push('(');
        }
        self.visit_table_ref(&join.right);
        if right_paren {
            self.buf.push(')');
        }
        match &join.condition {
            Some(JoinCondition::On(e)) => {
                self.push(" ON ");
                self.visit_expr(e);
            }
            Some(JoinCondition::Using(columns)) => {
                self.push(" USING (");
                self.names(columns);
                self.buf.push(')');
            }
            None => {}
        }
    }

    fn visit_order_by(&mut self, item: &OrderByClause) {
        self.visit_expr(&item.expr);
        if item.direction == SortOrder::Desc {
            self.push(" DESC");
        }
    }

    fn visit_limit(&mut self, limit: &Limit) {
        self.push("LIMIT ");
        if let Some(offset) = &limit.offset {
            self.visit_expr(offset);
            self.push(", ");
        }
        self.visit_expr(&limit.row_count);
    }

    fn visit_assignment(&mut self, assignment: &Assignment) {
        self.visit_identifier(&assignment.column);
        self.push(" = ");
        self.visit_expr(&assignment.value);
    }

    fn visit_insert(&mut self, insert: &InsertStmt) {
        self.insert("INSERT", insert);
    }

    fn visit_replace(&mut self, insert: &InsertStmt) {
        self.insert("REPLACE", insert);
    }

    fn visit_update(&mut self, update: &UpdateStmt) {
        self.push("UPDATE ");
        if update.low_priority {
            self.push("LOW_PRIORITY ");
        }
        if update.ignore {
            self.push("IGNORE ");
        }
        self.table_list(&update.tables);
        self.push(" SET ");
        self.assignments(&update.assignments);
        self.where_clause(&update.where_clause);
        self.order_list(" ORDER BY ", &update.order_by);
        self.limit(&update.limit);
    }

    fn visit_delete(&mut self, delete: &DeleteStmt) {
        self.push("DELETE ");
        if delete.low_priority {
            self.push("LOW_PRIORITY ");
        }
        if delete.quick {
            self.push("QUICK ");
        }
        if delete.ignore {
            self.push("IGNORE ");
        }
        if delete.targets.is_empty() {
            self.push("FROM ");
            self.table_list(&delete.from);
        } else if delete.using {
            self.push("FROM ");
            self.identifiers(&delete.targets);
            self.push(" USING ");
            self.table_list(&delete.from);
        } else {
            self.identifiers(&delete.targets);
            self.push(" FROM ");
            self.table_list(&delete.from);
        }
        self.where_clause(&delete.where_clause);
        self.order_list(" ORDER BY ", &delete.order_by);
        self.limit(&delete.limit);
    }

    fn visit_create_table(&mut self, create: &CreateTableStmt) {
        self.push(if create.temporary { "CREATE TEMPORARY TABLE " } else { "CREATE TABLE " });
        if create.if_not_exists {
            self.push("IF NOT EXISTS ");
        }
        self.visit_identifier(&create.name);
        self.push(" (");
        for (i, element) in create.elements.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match element {
                TableElement::Column(column) => self.visit_column_def(column),
                TableElement::Key(key) => self.visit_key_def(key),
                TableElement::ForeignKey(fk) => self.visit_foreign_key(fk),
            }
        }
        self.buf.push(')');
        for option in &create.options {
            self.buf.push(' ');
            self.table_option(option);
        }
    }

    fn visit_key_def(&mut self, key: &KeyDef) {
        self.key_def(key);
    }

    fn visit_foreign_key(&mut self, fk: &ForeignKeyDef) {
        self.foreign_key(fk);
    }

    fn visit_column_def(&mut self, column: &ColumnDef) {
        self.name(&column.name);
        self.buf.push(' ');
        self.data_type(&column.data_type);
        match column.nullable {
            Some(false) => self.push(" NOT NULL"),
            Some(true) => self.push(" NULL"),
            None => {}
        }
        if let Some(e) = &column.default {
            self.push(" DEFAULT ");
            self.visit_expr(e);
        }
        if let Some(e) = &column.on_update {
            self.push(" ON UPDATE ");
            self.visit_expr(e);
        }
        if column.auto_increment {
            self.push(" AUTO_INCREMENT");
        }
        if column.unique {
            self.push(" UNIQUE");
        }
        if column.primary_key {
            self.push(" PRIMARY KEY");
        }
        if let Some(comment) = &column.comment {
            self.push(" COMMENT ");
            self.string(comment);
        }
    }

    fn visit_alter_table(&mut self, alter: &AlterTableStmt) {
        self.push("ALTER TABLE ");
        self.visit_identifier(&alter.table);
        for (i, action) in alter.actions.iter().enumerate() {
            self.push(if i == 0 { " " } else { ", " });
            self.alter_action(action);
        }
    }
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// A name must be back-ticked unless it lexes back as the same identifier
fn needs_quotes(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        None => return true,
        Some(b) if b.is_ascii_digit() => return true,
        _ => {}
    }
    if !bytes.iter().all(|&b| is_name_byte(b)) {
        return true;
    }
    let upper = name.to_ascii_uppercase();
    keywords::lookup_str(&upper).is_some() || matches!(upper.as_str(), "NULL" | "TRUE" | "FALSE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp as B;

    fn render(expr: &Expr) -> String {
        let mut out = OutputVisitor::new(String::new(), &[]);
        out.visit_expr(expr);
        out.into_sql()
    }

    #[test]
    fn test_left_combine_chain() {
        let a_minus_b = Expr::binary(B::Minus, Expr::ident("a"), Expr::ident("b"));
        let left = Expr::binary(B::Minus, a_minus_b.clone(), Expr::ident("c"));
        assert_eq!(render(&left), "a - b - c");
        let right = Expr::binary(B::Minus, Expr::ident("c"), a_minus_b);
        assert_eq!(render(&right), "c - (a - b)");
    }

    #[test]
    fn test_precedence_decides_parentheses() {
        let product = Expr::binary(B::Multiply, Expr::int(2), Expr::int(3));
        assert_eq!(render(&Expr::binary(B::Plus, Expr::int(1), product)), "1 + 2 * 3");
        let sum = Expr::binary(B::Plus, Expr::int(1), Expr::int(2));
        assert_eq!(render(&Expr::binary(B::Multiply, sum, Expr::int(3))), "(1 + 2) * 3");
    }

    #[test]
    fn test_right_combining_assignment() {
        let inner = Expr::binary(B::Assign, Expr::UserVariable("b".into()), Expr::int(1));
        let chain = Expr::binary(B::Assign, Expr::UserVariable("a".into()), inner.clone());
        assert_eq!(render(&chain), "@a := @b := 1");
        let grouped = Expr::binary(B::Assign, inner, Expr::int(2));
        assert_eq!(render(&grouped), "(@b := 1) := 2");
    }

    #[test]
    fn test_unary_minus_spacing() {
        let e = Expr::unary(UnaryOp::Minus, Expr::unary(UnaryOp::Minus, Expr::int(1)));
        assert_eq!(render(&e), "- -1");
        let e = Expr::unary(UnaryOp::Minus, Expr::binary(B::Plus, Expr::ident("a"), Expr::int(1)));
        assert_eq!(render(&e), "-(a + 1)");
        let e = Expr::unary(UnaryOp::Not, Expr::binary(B::Equal, Expr::ident("a"), Expr::int(1)));
        assert_eq!(render(&e), "NOT a = 1");
    }

    #[test]
    fn test_polyadic_operands() {
        let or = Expr::polyadic(PolyadicOp::Or, vec![Expr::ident("a"), Expr::ident("b")]);
        let and = Expr::polyadic(PolyadicOp::And, vec![or, Expr::ident("c"), Expr::ident("d")]);
        assert_eq!(render(&and), "(a OR b) AND c AND d");
    }

    #[test]
    fn test_between_operands() {
        let e = Expr::between(
            Expr::ident("x"),
            Expr::binary(B::Plus, Expr::int(1), Expr::int(1)),
            Expr::binary(B::Equal, Expr::ident("y"), Expr::int(2)),
        );
        assert_eq!(render(&e), "x BETWEEN 1 + 1 AND (y = 2)");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(render(&Expr::string("it's\n\\")), "'it''s\\n\\\\'");
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(render(&Expr::ident("plain_name")), "plain_name");
        assert_eq!(render(&Expr::ident("select")), "`select`");
        assert_eq!(render(&Expr::ident("has space")), "`has space`");
        assert_eq!(render(&Expr::ident("1st")), "`1st`");
        assert_eq!(render(&Expr::ident("null")), "`null`");
        assert_eq!(render(&Expr::Identifier(Identifier::quoted("a`b"))), "`a``b`");
        assert_eq!(render(&Expr::qualified("t", "*")), "t.*");
    }

    #[test]
    fn test_placeholders() {
        let e = Expr::binary(B::Equal, Expr::placeholder("col"), Expr::placeholder("other"));
        let mut map = HashMap::new();
        map.insert("col".to_string(), "`user_id`".to_string());
        let mut out = OutputVisitor::new(String::new(), &[]).with_placeholders(map);
        out.visit_expr(&e);
        assert_eq!(out.sql(), "`user_id` = ${other}");
    }

    #[test]
    fn test_arguments_identity_and_reorder() {
        let args = [Value::Integer(10), Value::Integer(20)];
        let in_order = Expr::binary(B::Plus, Expr::param(1), Expr::param(2));
        let mut out = OutputVisitor::new(String::new(), &args);
        out.visit_expr(&in_order);
        assert_eq!(out.args_index(), &[0, 1]);
        assert_eq!(out.arguments(), args.to_vec());

        let swapped = Expr::binary(B::Plus, Expr::param(2), Expr::param(1));
        let mut out = OutputVisitor::new(String::new(), &args);
        out.visit_expr(&swapped);
        assert_eq!(out.sql(), "? + ?");
        assert_eq!(out.arguments(), vec![Value::Integer(20), Value::Integer(10)]);

        let mut out = OutputVisitor::new(String::new(), &[]);
        out.visit_expr(&swapped);
        assert!(out.arguments().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_missing_argument_panics() {
        let args = [Value::Integer(1)];
        let mut out = OutputVisitor::new(String::new(), &args);
        out.visit_expr(&Expr::binary(B::Plus, Expr::param(1), Expr::param(3)));
        out.arguments();
    }

    #[test]
    #[should_panic]
    fn test_empty_and_chain_panics() {
        render(&Expr::polyadic(PolyadicOp::And, vec![]));
    }

    #[test]
    #[should_panic]
    fn test_case_without_when_panics() {
        render(&Expr::Case(CaseExpr { operand: None, whens: vec![], else_result: None }));
    }
}
