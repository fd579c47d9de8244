use super::*;
use crate::ast::*;

fn select_of(sql: &str) -> Select {
    match Parser::parse(sql).unwrap() {
        Statement::Select(Query::Select(s)) => *s,
        other => panic!("Expected SELECT, got {:?}", other),
    }
}

fn expr_of(sql: &str) -> Expr {
    let mut parser = Parser::new(Lexer::new(sql.as_bytes())).unwrap();
    parser.parse_standalone_expression().unwrap()
}

#[test]
fn test_parse_select() {
    let s = select_of("SELECT * FROM users");
    assert_eq!(s.columns.len(), 1);
    assert_eq!(s.columns[0].expr, Expr::Identifier(Identifier::wildcard()));
    match &s.from[0] {
        TableRef::Factor(f) => {
            assert_eq!(f.name.name, "users");
            assert!(f.alias.is_none());
        }
        _ => panic!("Expected table factor"),
    }
}

#[test]
fn test_parse_select_clauses() {
    let s = select_of(
        "SELECT DISTINCT SQL_CALC_FOUND_ROWS a, COUNT(*) AS n FROM t WHERE a > 1 \
         GROUP BY a WITH ROLLUP HAVING n > 2 ORDER BY n DESC, a LIMIT 10 FOR UPDATE",
    );
    assert!(s.distinct);
    assert_eq!(s.options, vec![SelectOption::SqlCalcFoundRows]);
    assert_eq!(s.columns[1].alias.as_deref(), Some("n"));
    assert!(matches!(s.columns[1].expr, Expr::Count { distinct: false, .. }));
    assert!(s.where_clause.is_some());
    assert_eq!(s.group_by.len(), 1);
    assert!(s.with_rollup);
    assert!(s.having.is_some());
    assert_eq!(s.order_by[0].direction, SortOrder::Desc);
    assert_eq!(s.order_by[1].direction, SortOrder::Asc);
    assert_eq!(s.limit.unwrap().row_count, Expr::int(10));
    assert_eq!(s.lock, Some(LockMode::ForUpdate));
}

#[test]
fn test_parse_from_dual() {
    let s = select_of("SELECT 1 FROM DUAL");
    assert!(s.from.is_empty());
}

#[test]
fn test_parse_table_alias() {
    let s = select_of("SELECT u.name FROM users u");
    match &s.from[0] {
        TableRef::Factor(f) => assert_eq!(f.alias.as_deref(), Some("u")),
        _ => panic!("Expected table factor"),
    }
    assert_eq!(s.columns[0].expr, Expr::qualified("u", "name"));
}

#[test]
fn test_parse_table_alias_with_as() {
    let s = select_of("SELECT * FROM db.users AS u");
    match &s.from[0] {
        TableRef::Factor(f) => {
            assert_eq!(f.name.parts(), vec!["db", "users"]);
            assert_eq!(f.alias.as_deref(), Some("u"));
        }
        _ => panic!("Expected table factor"),
    }
}

#[test]
fn test_parse_inner_join() {
    let s = select_of(
        "SELECT users.name, orders.product FROM users INNER JOIN orders ON users.id = orders.user_id",
    );
    match &s.from[0] {
        TableRef::Join(j) => {
            assert_eq!(j.kind, JoinKind::Inner);
            assert!(matches!(j.condition, Some(JoinCondition::On(_))));
        }
        _ => panic!("Expected JOIN"),
    }
}

#[test]
fn test_parse_join_kinds() {
    let cases = [
        ("a JOIN b", JoinKind::Inner),
        ("a CROSS JOIN b", JoinKind::Cross),
        ("a STRAIGHT_JOIN b", JoinKind::Straight),
        ("a LEFT OUTER JOIN b ON x = y", JoinKind::Left),
        ("a RIGHT JOIN b USING (id)", JoinKind::Right),
        ("a NATURAL JOIN b", JoinKind::Natural),
        ("a NATURAL LEFT OUTER JOIN b", JoinKind::NaturalLeft),
    ];
    for (from, kind) in cases {
        let s = select_of(&format!("SELECT * FROM {}", from));
        match &s.from[0] {
            TableRef::Join(j) => assert_eq!(j.kind, kind, "{}", from),
            _ => panic!("Expected JOIN for {}", from),
        }
    }
}

#[test]
fn test_joins_group_to_the_left() {
    let s = select_of("SELECT * FROM a JOIN b ON a.x = b.x LEFT JOIN c ON b.y = c.y");
    match &s.from[0] {
        TableRef::Join(outer) => {
            assert_eq!(outer.kind, JoinKind::Left);
            assert!(matches!(outer.left, TableRef::Join(_)));
            assert!(matches!(outer.right, TableRef::Factor(_)));
        }
        _ => panic!("Expected JOIN"),
    }
}

#[test]
fn test_parse_derived_table_and_index_hint() {
    let s = select_of(
        "SELECT * FROM (SELECT a FROM t) AS d, u FORCE INDEX FOR ORDER BY (idx_a, idx_b)",
    );
    assert_eq!(s.from.len(), 2);
    match &s.from[0] {
        TableRef::Subquery { alias, .. } => assert_eq!(alias, "d"),
        _ => panic!("Expected derived table"),
    }
    match &s.from[1] {
        TableRef::Factor(f) => {
            assert_eq!(f.hints.len(), 1);
            assert_eq!(f.hints[0].kind, IndexHintKind::Force);
            assert_eq!(f.hints[0].scope, Some(IndexHintScope::OrderBy));
            assert_eq!(f.hints[0].indexes, vec!["idx_a", "idx_b"]);
        }
        _ => panic!("Expected table factor"),
    }
}

#[test]
fn test_derived_table_requires_alias() {
    assert!(Parser::parse("SELECT * FROM (SELECT a FROM t)").is_err());
}

#[test]
fn test_parse_limit_forms() {
    let s = select_of("SELECT a FROM t LIMIT 5, 10");
    let limit = s.limit.unwrap();
    assert_eq!(limit.offset, Some(Expr::int(5)));
    assert_eq!(limit.row_count, Expr::int(10));

    let s = select_of("SELECT a FROM t LIMIT 10 OFFSET 5");
    let limit = s.limit.unwrap();
    assert_eq!(limit.offset, Some(Expr::int(5)));
    assert_eq!(limit.row_count, Expr::int(10));

    let s = select_of("SELECT a FROM t LIMIT ? OFFSET ?");
    let limit = s.limit.unwrap();
    assert_eq!(limit.offset, Some(Expr::param(2)));
    assert_eq!(limit.row_count, Expr::param(1));
}

#[test]
fn test_limit_rejects_expressions() {
    assert!(Parser::parse("SELECT a FROM t LIMIT a").is_err());
}

#[test]
fn test_parse_lock_in_share_mode() {
    let s = select_of("SELECT a FROM t LOCK IN SHARE MODE");
    assert_eq!(s.lock, Some(LockMode::ShareMode));
}

//=============================================================================
// UNION
//=============================================================================

#[test]
fn test_parse_union() {
    let stmt = Parser::parse("SELECT a FROM t UNION ALL SELECT b FROM u UNION SELECT c FROM v").unwrap();
    match stmt {
        Statement::Select(Query::Union(u)) => {
            assert_eq!(u.rest.len(), 2);
            assert_eq!(u.rest[0].0, UnionKind::All);
            assert_eq!(u.rest[1].0, UnionKind::Default);
        }
        _ => panic!("Expected UNION"),
    }
}

#[test]
fn test_union_takes_trailing_order_and_limit() {
    let stmt = Parser::parse("SELECT a FROM t UNION SELECT b FROM u ORDER BY 1 LIMIT 3").unwrap();
    match stmt {
        Statement::Select(Query::Union(u)) => {
            assert_eq!(u.order_by.len(), 1);
            assert!(u.limit.is_some());
            assert!(u.rest[0].1.order_by.is_empty());
            assert!(u.rest[0].1.limit.is_none());
        }
        _ => panic!("Expected UNION"),
    }
}

#[test]
fn test_union_of_parenthesized_terms() {
    let stmt =
        Parser::parse("(SELECT a FROM t LIMIT 1) UNION (SELECT b FROM u LIMIT 2) ORDER BY a").unwrap();
    match stmt {
        Statement::Select(Query::Union(u)) => {
            assert!(u.first.limit.is_some());
            assert!(u.rest[0].1.limit.is_some());
            assert_eq!(u.order_by.len(), 1);
        }
        _ => panic!("Expected UNION"),
    }
}

#[test]
fn test_union_term_with_limit_needs_parentheses() {
    let result = Parser::parse("SELECT a FROM t LIMIT 1 UNION SELECT b FROM u");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("requires parentheses"));
}

//=============================================================================
// Expressions
//=============================================================================

#[test]
fn test_arithmetic_precedence() {
    let e = expr_of("a + b * c");
    assert_eq!(
        e,
        Expr::binary(
            BinaryOp::Plus,
            Expr::ident("a"),
            Expr::binary(BinaryOp::Multiply, Expr::ident("b"), Expr::ident("c")),
        )
    );
}

#[test]
fn test_subtraction_groups_to_the_left() {
    let e = expr_of("a - b - c");
    assert_eq!(
        e,
        Expr::binary(
            BinaryOp::Minus,
            Expr::binary(BinaryOp::Minus, Expr::ident("a"), Expr::ident("b")),
            Expr::ident("c"),
        )
    );
}

#[test]
fn test_and_or_are_polyadic() {
    let e = expr_of("a = 1 AND b = 2 AND c = 3 OR d");
    match e {
        Expr::Polyadic { op: PolyadicOp::Or, operands } => {
            assert_eq!(operands.len(), 2);
            match &operands[0] {
                Expr::Polyadic { op: PolyadicOp::And, operands } => assert_eq!(operands.len(), 3),
                other => panic!("Expected AND, got {:?}", other),
            }
        }
        other => panic!("Expected OR, got {:?}", other),
    }
}

#[test]
fn test_assignment_groups_to_the_right() {
    let e = expr_of("@a := @b := 1");
    match e {
        Expr::Binary { op: BinaryOp::Assign, right, .. } => {
            assert!(matches!(*right, Expr::Binary { op: BinaryOp::Assign, .. }));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let e = expr_of("NOT a = 1");
    match e {
        Expr::Unary { op: UnaryOp::Not, operand } => {
            assert!(matches!(*operand, Expr::Binary { op: BinaryOp::Equal, .. }));
        }
        other => panic!("Expected NOT, got {:?}", other),
    }
}

#[test]
fn test_predicates() {
    assert!(matches!(expr_of("a NOT LIKE 'x%'"), Expr::Binary { op: BinaryOp::NotLike, .. }));
    assert!(matches!(
        expr_of("a LIKE 'x!%' ESCAPE '!'"),
        Expr::Ternary { op: TernaryOp::LikeEscape, .. }
    ));
    assert!(matches!(expr_of("a RLIKE '^x'"), Expr::Binary { op: BinaryOp::Regexp, .. }));
    assert!(matches!(
        expr_of("a NOT BETWEEN 1 AND 2"),
        Expr::Ternary { op: TernaryOp::NotBetween, .. }
    ));
    assert_eq!(
        expr_of("a IN (1, 2)"),
        Expr::in_list(Expr::ident("a"), false, vec![Expr::int(1), Expr::int(2)])
    );
    assert!(matches!(
        expr_of("a NOT IN (SELECT b FROM t)"),
        Expr::In { not: true, set: InSet::Subquery(_), .. }
    ));
}

#[test]
fn test_between_bounds_stop_at_and() {
    let e = expr_of("x BETWEEN 1 AND 2 AND y");
    match e {
        Expr::Polyadic { op: PolyadicOp::And, operands } => {
            assert!(matches!(operands[0], Expr::Ternary { op: TernaryOp::Between, .. }));
            assert_eq!(operands[1], Expr::ident("y"));
        }
        other => panic!("Expected AND, got {:?}", other),
    }
}

#[test]
fn test_is_tests() {
    assert_eq!(expr_of("a IS NULL"), Expr::is(Expr::ident("a"), false, IsTest::Null));
    assert_eq!(expr_of("a IS NOT TRUE"), Expr::is(Expr::ident("a"), true, IsTest::True));
    assert_eq!(expr_of("a IS UNKNOWN"), Expr::is(Expr::ident("a"), false, IsTest::Unknown));
}

#[test]
fn test_quantified_comparison() {
    match expr_of("a > ALL (SELECT b FROM t)") {
        Expr::Quantified { op, quantifier, .. } => {
            assert_eq!(op, BinaryOp::Greater);
            assert_eq!(quantifier, Quantifier::All);
        }
        other => panic!("Expected quantified comparison, got {:?}", other),
    }
    assert!(matches!(
        expr_of("a = ANY (SELECT b FROM t)"),
        Expr::Quantified { quantifier: Quantifier::Any, .. }
    ));
}

#[test]
fn test_unary_operators() {
    assert_eq!(expr_of("-a"), Expr::unary(UnaryOp::Minus, Expr::ident("a")));
    assert_eq!(expr_of("+a"), Expr::ident("a"));
    assert_eq!(expr_of("~a"), Expr::unary(UnaryOp::BitNot, Expr::ident("a")));
    assert_eq!(expr_of("BINARY a"), Expr::unary(UnaryOp::Binary, Expr::ident("a")));
}

#[test]
fn test_collate_binds_tightly() {
    match expr_of("a COLLATE utf8_bin = b") {
        Expr::Binary { op: BinaryOp::Equal, left, .. } => {
            assert_eq!(*left, Expr::collate(Expr::ident("a"), "utf8_bin"));
        }
        other => panic!("Expected comparison, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_select_in_arithmetic() {
    match expr_of("((SELECT a FROM t) + 1)") {
        Expr::Binary { op: BinaryOp::Plus, left, right } => {
            assert!(matches!(*left, Expr::Subquery(_)));
            assert_eq!(*right, Expr::int(1));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_union_subquery() {
    match expr_of("((SELECT a FROM t LIMIT 1) UNION SELECT b FROM u)") {
        Expr::Subquery(q) => assert!(matches!(*q, Query::Union(_))),
        other => panic!("Expected subquery, got {:?}", other),
    }
}

#[test]
fn test_row_constructors() {
    assert_eq!(expr_of("(1, 2)"), Expr::Row(vec![Expr::int(1), Expr::int(2)]));
    assert_eq!(expr_of("ROW(1)"), Expr::Row(vec![Expr::int(1)]));
    assert_eq!(expr_of("(1)"), Expr::int(1));
}

#[test]
fn test_variables_and_markers() {
    assert_eq!(expr_of("@v"), Expr::UserVariable("v".to_string()));
    assert_eq!(
        expr_of("@@global.max_connections"),
        Expr::SysVariable { scope: Some(VariableScope::Global), name: "max_connections".to_string() }
    );
    assert_eq!(
        expr_of("@@autocommit"),
        Expr::SysVariable { scope: None, name: "autocommit".to_string() }
    );
    assert_eq!(expr_of("${tenant}"), Expr::placeholder("tenant"));
}

#[test]
fn test_function_names_are_uppercased() {
    assert_eq!(expr_of("concat(a, 'x')"), Expr::function("CONCAT", vec![Expr::ident("a"), Expr::string("x")]));
    assert_eq!(expr_of("IF(a, 1, 2)"), Expr::function("IF", vec![Expr::ident("a"), Expr::int(1), Expr::int(2)]));
}

#[test]
fn test_keyword_functions_need_paren() {
    assert_eq!(
        expr_of("CHAR(65, 66 USING utf8mb4)"),
        Expr::Char { args: vec![Expr::int(65), Expr::int(66)], charset: Some("utf8mb4".to_string()) }
    );
    assert_eq!(expr_of("LEFT('abc', 1)"), Expr::function("LEFT", vec![Expr::string("abc"), Expr::int(1)]));
    assert_eq!(expr_of("VALUES(a)"), Expr::function("VALUES", vec![Expr::ident("a")]));
    assert_eq!(
        expr_of("REPLACE(a, 'x', 'y')"),
        Expr::function("REPLACE", vec![Expr::ident("a"), Expr::string("x"), Expr::string("y")])
    );

    // without the paren these stay keywords
    let mut parser = Parser::new(Lexer::new(b"IF + 1")).unwrap();
    assert!(parser.parse_standalone_expression().is_err());
    let s = select_of("SELECT a FROM t LEFT JOIN u ON t.id = u.id");
    assert_eq!(s.columns[0].expr, Expr::ident("a"));
}

#[test]
fn test_special_functions() {
    assert!(matches!(expr_of("COUNT(DISTINCT a, b)"), Expr::Count { distinct: true, .. }));
    match expr_of("CAST(a AS DECIMAL(10, 2))") {
        Expr::Cast { target, .. } => {
            assert_eq!(target.name, "DECIMAL");
            assert_eq!(target.length, Some(10));
            assert_eq!(target.scale, Some(2));
        }
        other => panic!("Expected CAST, got {:?}", other),
    }
    match expr_of("CAST(a AS SIGNED INTEGER)") {
        Expr::Cast { target, .. } => assert_eq!(target.name, "SIGNED"),
        other => panic!("Expected CAST, got {:?}", other),
    }
    assert!(matches!(
        expr_of("CONVERT(a USING utf8)"),
        Expr::Convert { target: ConvertTarget::Charset(_), .. }
    ));
    assert!(matches!(
        expr_of("TRIM(LEADING 'x' FROM a)"),
        Expr::Trim { mode: Some(TrimMode::Leading), remove: Some(_), .. }
    ));
    assert!(matches!(expr_of("EXTRACT(YEAR FROM d)"), Expr::Extract { unit: IntervalUnit::Year, .. }));
    assert!(matches!(expr_of("SUBSTRING(s FROM 2 FOR 3)"), Expr::Substring { length: Some(_), .. }));
    assert!(matches!(expr_of("POSITION('a' IN s)"), Expr::Position { .. }));
    match expr_of("GROUP_CONCAT(DISTINCT a ORDER BY a DESC SEPARATOR ';')") {
        Expr::GroupConcat(g) => {
            assert!(g.distinct);
            assert_eq!(g.order_by.len(), 1);
            assert_eq!(g.separator.as_deref(), Some(";"));
        }
        other => panic!("Expected GROUP_CONCAT, got {:?}", other),
    }
    assert!(matches!(
        expr_of("TIMESTAMPDIFF(DAY, a, b)"),
        Expr::TimestampDiff { unit: IntervalUnit::Day, .. }
    ));
}

#[test]
fn test_interval_and_case() {
    match expr_of("d + INTERVAL 1 DAY") {
        Expr::Binary { right, .. } => {
            assert!(matches!(*right, Expr::Interval { unit: IntervalUnit::Day, .. }));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
    match expr_of("CASE a WHEN 1 THEN 'one' ELSE 'many' END") {
        Expr::Case(c) => {
            assert!(c.operand.is_some());
            assert_eq!(c.whens.len(), 1);
            assert!(c.else_result.is_some());
        }
        other => panic!("Expected CASE, got {:?}", other),
    }
}

#[test]
fn test_literals() {
    assert_eq!(expr_of("NULL"), Expr::null());
    assert_eq!(expr_of("TRUE"), Expr::boolean(true));
    assert_eq!(expr_of("1.50"), Expr::decimal("1.50"));
    assert_eq!(expr_of("'a' 'b'"), Expr::string("ab"));
    match expr_of("_utf8'x'") {
        Expr::Literal(Literal::String(s)) => assert_eq!(s.introducer.as_deref(), Some("utf8")),
        other => panic!("Expected string, got {:?}", other),
    }
    assert!(matches!(expr_of("N'x'"), Expr::Literal(Literal::String(StringLiteral { national: true, .. }))));
    assert!(matches!(expr_of("x'4D'"), Expr::Literal(Literal::Hex { quoted: true, .. })));
    assert!(matches!(expr_of("0x4D"), Expr::Literal(Literal::Hex { quoted: false, .. })));
}

#[test]
fn test_reserved_word_after_dot() {
    assert_eq!(expr_of("t.select"), Expr::qualified("t", "select"));
}

//=============================================================================
// DML
//=============================================================================

#[test]
fn test_parse_insert() {
    let stmt = Parser::parse("INSERT INTO users (id, name) VALUES (1, 'Alice'), (2, 'Bob')").unwrap();
    match stmt {
        Statement::Insert(i) => {
            assert_eq!(i.table.name, "users");
            assert_eq!(i.columns.len(), 2);
            match i.source {
                InsertSource::Values(rows) => assert_eq!(rows.len(), 2),
                _ => panic!("Expected VALUES"),
            }
        }
        _ => panic!("Expected INSERT"),
    }
}

#[test]
fn test_parse_insert_variants() {
    match Parser::parse("INSERT LOW_PRIORITY IGNORE t SET a = 1 ON DUPLICATE KEY UPDATE a = a + 1").unwrap() {
        Statement::Insert(i) => {
            assert_eq!(i.priority, Some(InsertPriority::LowPriority));
            assert!(i.ignore);
            assert!(matches!(i.source, InsertSource::Set(_)));
            assert_eq!(i.on_duplicate.len(), 1);
        }
        _ => panic!("Expected INSERT"),
    }
    match Parser::parse("INSERT INTO t (a) SELECT b FROM u").unwrap() {
        Statement::Insert(i) => assert!(matches!(i.source, InsertSource::Query(_))),
        _ => panic!("Expected INSERT"),
    }
    match Parser::parse("INSERT INTO t VALUES ()").unwrap() {
        Statement::Insert(i) => match i.source {
            InsertSource::Values(rows) => assert!(rows[0].is_empty()),
            _ => panic!("Expected VALUES"),
        },
        _ => panic!("Expected INSERT"),
    }
}

#[test]
fn test_parse_replace() {
    match Parser::parse("REPLACE INTO t VALUES (1, DEFAULT)").unwrap() {
        Statement::Replace(r) => match r.source {
            InsertSource::Values(rows) => assert_eq!(rows[0][1], Expr::Default),
            _ => panic!("Expected VALUES"),
        },
        _ => panic!("Expected REPLACE"),
    }
}

#[test]
fn test_parse_update() {
    let stmt = Parser::parse("UPDATE users SET name = 'Carol', age = age + 1 WHERE id = 1 LIMIT 1").unwrap();
    match stmt {
        Statement::Update(u) => {
            assert_eq!(u.assignments.len(), 2);
            assert_eq!(u.assignments[0].column.name, "name");
            assert!(u.where_clause.is_some());
            assert!(u.limit.is_some());
        }
        _ => panic!("Expected UPDATE"),
    }
}

#[test]
fn test_parse_delete() {
    match Parser::parse("DELETE FROM users WHERE id = 1").unwrap() {
        Statement::Delete(d) => {
            assert!(d.targets.is_empty());
            assert_eq!(d.from.len(), 1);
            assert!(d.where_clause.is_some());
        }
        _ => panic!("Expected DELETE"),
    }
    match Parser::parse("DELETE t1, t2 FROM t1 JOIN t2 ON t1.id = t2.id").unwrap() {
        Statement::Delete(d) => {
            assert_eq!(d.targets.len(), 2);
            assert!(!d.using);
        }
        _ => panic!("Expected DELETE"),
    }
    match Parser::parse("DELETE QUICK FROM t1 USING t1 JOIN t2 ON t1.id = t2.id").unwrap() {
        Statement::Delete(d) => {
            assert!(d.quick);
            assert!(d.using);
            assert_eq!(d.targets[0].name, "t1");
        }
        _ => panic!("Expected DELETE"),
    }
}

#[test]
fn test_parse_call() {
    match Parser::parse("CALL db.proc(1, @out)").unwrap() {
        Statement::Call { name, args } => {
            assert_eq!(name.parts(), vec!["db", "proc"]);
            assert_eq!(args.len(), 2);
        }
        _ => panic!("Expected CALL"),
    }
    assert!(matches!(Parser::parse("CALL p").unwrap(), Statement::Call { .. }));
}

//=============================================================================
// SET / SHOW / transactions
//=============================================================================

#[test]
fn test_parse_set() {
    match Parser::parse("SET @a = 1, GLOBAL max_connections = 10, x := 2").unwrap() {
        Statement::Set(assignments) => {
            assert_eq!(assignments.len(), 3);
            assert_eq!(assignments[0].target, Expr::UserVariable("a".to_string()));
            assert_eq!(
                assignments[1].target,
                Expr::SysVariable { scope: Some(VariableScope::Global), name: "max_connections".to_string() }
            );
            assert_eq!(assignments[2].target, Expr::ident("x"));
        }
        _ => panic!("Expected SET"),
    }
}

#[test]
fn test_parse_set_names() {
    match Parser::parse("SET NAMES utf8mb4 COLLATE utf8mb4_bin").unwrap() {
        Statement::SetNames { charset, collation } => {
            assert_eq!(charset, "utf8mb4");
            assert_eq!(collation.as_deref(), Some("utf8mb4_bin"));
        }
        _ => panic!("Expected SET NAMES"),
    }
    // `names` is an ordinary variable when assigned
    assert!(matches!(Parser::parse("SET names = 1").unwrap(), Statement::Set(_)));
}

#[test]
fn test_parse_show_and_describe() {
    match Parser::parse("SHOW FULL TABLES FROM db LIKE 'u%'").unwrap() {
        Statement::ShowTables { full, database, like } => {
            assert!(full);
            assert_eq!(database.as_deref(), Some("db"));
            assert_eq!(like.as_deref(), Some("u%"));
        }
        _ => panic!("Expected SHOW TABLES"),
    }
    assert!(matches!(Parser::parse("SHOW DATABASES").unwrap(), Statement::ShowDatabases { like: None }));
    assert!(matches!(Parser::parse("DESC users").unwrap(), Statement::Describe(_)));
    assert!(matches!(Parser::parse("USE db").unwrap(), Statement::Use(_)));
}

#[test]
fn test_parse_transactions() {
    assert_eq!(Parser::parse("START TRANSACTION").unwrap(), Statement::StartTransaction);
    assert_eq!(Parser::parse("BEGIN").unwrap(), Statement::StartTransaction);
    assert_eq!(Parser::parse("BEGIN WORK;").unwrap(), Statement::StartTransaction);
    assert_eq!(Parser::parse("COMMIT").unwrap(), Statement::Commit);
    assert_eq!(Parser::parse("ROLLBACK WORK").unwrap(), Statement::Rollback);
}

//=============================================================================
// DDL
//=============================================================================

#[test]
fn test_parse_create_table() {
    let stmt = Parser::parse(
        "CREATE TABLE IF NOT EXISTS users (\
           id INT UNSIGNED NOT NULL AUTO_INCREMENT, \
           name VARCHAR(100) CHARACTER SET utf8 DEFAULT '' COMMENT 'display name', \
           state ENUM('on', 'off') NULL, \
           updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP, \
           PRIMARY KEY (id), \
           UNIQUE KEY uk_name (name(10)), \
           CONSTRAINT fk_org FOREIGN KEY (org_id) REFERENCES orgs (id) ON DELETE SET NULL\
         ) ENGINE=InnoDB DEFAULT CHARSET=utf8",
    )
    .unwrap();
    match stmt {
        Statement::CreateTable(c) => {
            assert!(c.if_not_exists);
            assert_eq!(c.name.name, "users");
            assert_eq!(c.elements.len(), 7);
            match &c.elements[0] {
                TableElement::Column(col) => {
                    assert_eq!(col.data_type.name, "INT");
                    assert!(col.data_type.unsigned);
                    assert_eq!(col.nullable, Some(false));
                    assert!(col.auto_increment);
                }
                _ => panic!("Expected column"),
            }
            match &c.elements[1] {
                TableElement::Column(col) => {
                    assert_eq!(col.data_type.args, vec![100]);
                    assert_eq!(col.data_type.charset.as_deref(), Some("utf8"));
                    assert_eq!(col.default, Some(Expr::string("")));
                    assert_eq!(col.comment.as_deref(), Some("display name"));
                }
                _ => panic!("Expected column"),
            }
            match &c.elements[2] {
                TableElement::Column(col) => assert_eq!(col.data_type.values, vec!["on", "off"]),
                _ => panic!("Expected column"),
            }
            match &c.elements[3] {
                TableElement::Column(col) => assert!(col.on_update.is_some()),
                _ => panic!("Expected column"),
            }
            match &c.elements[5] {
                TableElement::Key(k) => {
                    assert_eq!(k.kind, KeyKind::Unique);
                    assert_eq!(k.name.as_deref(), Some("uk_name"));
                    assert_eq!(k.columns[0].length, Some(10));
                }
                _ => panic!("Expected key"),
            }
            match &c.elements[6] {
                TableElement::ForeignKey(fk) => {
                    assert_eq!(fk.constraint.as_deref(), Some("fk_org"));
                    assert_eq!(fk.on_delete.as_deref(), Some("SET NULL"));
                }
                _ => panic!("Expected foreign key"),
            }
            assert_eq!(c.options.len(), 2);
            assert_eq!(c.options[0].name, "ENGINE");
            assert_eq!(c.options[1].name, "DEFAULT CHARSET");
        }
        _ => panic!("Expected CREATE TABLE"),
    }
}

#[test]
fn test_parse_create_index() {
    match Parser::parse("CREATE UNIQUE INDEX idx ON t (a, b DESC)").unwrap() {
        Statement::CreateIndex(c) => {
            assert!(c.unique);
            assert_eq!(c.columns.len(), 2);
            assert_eq!(c.columns[1].direction, Some(SortOrder::Desc));
        }
        _ => panic!("Expected CREATE INDEX"),
    }
}

#[test]
fn test_parse_alter_table() {
    let stmt = Parser::parse(
        "ALTER TABLE t ADD COLUMN c INT AFTER b, DROP COLUMN d, MODIFY e BIGINT FIRST, \
         CHANGE f g TEXT, ADD INDEX idx (c), DROP PRIMARY KEY, RENAME TO u, ENGINE=MyISAM",
    )
    .unwrap();
    match stmt {
        Statement::AlterTable(a) => {
            assert_eq!(a.actions.len(), 8);
            assert!(matches!(
                &a.actions[0],
                AlterAction::AddColumn { position: Some(ColumnPosition::After(_)), .. }
            ));
            assert!(matches!(&a.actions[1], AlterAction::DropColumn(name) if name == "d"));
            assert!(matches!(
                &a.actions[2],
                AlterAction::ModifyColumn { position: Some(ColumnPosition::First), .. }
            ));
            assert!(matches!(&a.actions[3], AlterAction::ChangeColumn { old_name, .. } if old_name == "f"));
            assert!(matches!(&a.actions[4], AlterAction::AddKey(_)));
            assert!(matches!(&a.actions[5], AlterAction::DropPrimaryKey));
            assert!(matches!(&a.actions[6], AlterAction::RenameTo(_)));
            assert!(matches!(&a.actions[7], AlterAction::Option(o) if o.name == "ENGINE"));
        }
        _ => panic!("Expected ALTER TABLE"),
    }
}

#[test]
fn test_parse_drop_truncate_rename() {
    match Parser::parse("DROP TEMPORARY TABLE IF EXISTS a, b CASCADE").unwrap() {
        Statement::DropTable { temporary, if_exists, tables, behavior } => {
            assert!(temporary);
            assert!(if_exists);
            assert_eq!(tables.len(), 2);
            assert_eq!(behavior, Some(DropBehavior::Cascade));
        }
        _ => panic!("Expected DROP TABLE"),
    }
    assert!(matches!(Parser::parse("DROP INDEX idx ON t").unwrap(), Statement::DropIndex { .. }));
    assert!(matches!(Parser::parse("TRUNCATE TABLE t").unwrap(), Statement::Truncate(_)));
    assert!(matches!(Parser::parse("TRUNCATE t").unwrap(), Statement::Truncate(_)));
    match Parser::parse("RENAME TABLE a TO b, c TO d").unwrap() {
        Statement::RenameTable(pairs) => assert_eq!(pairs.len(), 2),
        _ => panic!("Expected RENAME TABLE"),
    }
}

//=============================================================================
// Compound statements
//=============================================================================

#[test]
fn test_parse_block() {
    let stmt = Parser::parse(
        "BEGIN DECLARE x INT DEFAULT 0; SET x = x + 1; SELECT x; END",
    )
    .unwrap();
    match stmt {
        Statement::Block { label, body } => {
            assert!(label.is_none());
            assert_eq!(body.len(), 3);
            assert!(matches!(body[0], Statement::DeclareVariable { .. }));
        }
        _ => panic!("Expected BEGIN .. END"),
    }
    assert!(matches!(Parser::parse("BEGIN END").unwrap(), Statement::Block { .. }));
}

#[test]
fn test_parse_labeled_loops() {
    let stmt = Parser::parse(
        "outer_loop: LOOP IF done THEN LEAVE outer_loop; END IF; ITERATE outer_loop; END LOOP outer_loop",
    )
    .unwrap();
    match stmt {
        Statement::Loop { label, body } => {
            assert_eq!(label.as_deref(), Some("outer_loop"));
            assert_eq!(body.len(), 2);
            assert!(matches!(body[1], Statement::Iterate(_)));
        }
        _ => panic!("Expected LOOP"),
    }
    assert!(matches!(
        Parser::parse("WHILE i < 10 DO SET i = i + 1; END WHILE").unwrap(),
        Statement::While { .. }
    ));
    assert!(matches!(
        Parser::parse("r: REPEAT SET i = i - 1; UNTIL i = 0 END REPEAT r").unwrap(),
        Statement::Repeat { .. }
    ));
}

#[test]
fn test_mismatched_end_label() {
    let result = Parser::parse("a: BEGIN END b");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not match"));
}

#[test]
fn test_parse_if_and_case_statements() {
    match Parser::parse("IF a THEN SET b = 1; ELSEIF c THEN SET b = 2; ELSE SET b = 3; END IF").unwrap() {
        Statement::If { branches, else_body } => {
            assert_eq!(branches.len(), 2);
            assert_eq!(else_body.map(|b| b.len()), Some(1));
        }
        _ => panic!("Expected IF"),
    }
    match Parser::parse("CASE WHEN a THEN SET b = 1; WHEN c THEN SET b = 2; END CASE").unwrap() {
        Statement::Case { operand, branches, else_body } => {
            assert!(operand.is_none());
            assert_eq!(branches.len(), 2);
            assert!(else_body.is_none());
        }
        _ => panic!("Expected CASE"),
    }
}

#[test]
fn test_parse_declarations() {
    match Parser::parse("DECLARE CONTINUE HANDLER FOR SQLSTATE '02000', NOT FOUND SET done = 1").unwrap() {
        Statement::DeclareHandler { action, conditions, body } => {
            assert_eq!(action, HandlerAction::Continue);
            assert_eq!(conditions, vec![ConditionValue::SqlState("02000".to_string()), ConditionValue::NotFound]);
            assert!(matches!(*body, Statement::Set(_)));
        }
        _ => panic!("Expected DECLARE HANDLER"),
    }
    match Parser::parse("DECLARE dup CONDITION FOR 1062").unwrap() {
        Statement::DeclareCondition { name, value } => {
            assert_eq!(name, "dup");
            assert_eq!(value, ConditionValue::ErrorCode(1062));
        }
        _ => panic!("Expected DECLARE CONDITION"),
    }
    assert!(matches!(
        Parser::parse("DECLARE cur CURSOR FOR SELECT a FROM t").unwrap(),
        Statement::DeclareCursor { .. }
    ));
    match Parser::parse("DECLARE a, b VARCHAR(10)").unwrap() {
        Statement::DeclareVariable { names, data_type, default } => {
            assert_eq!(names, vec!["a", "b"]);
            assert_eq!(data_type.name, "VARCHAR");
            assert!(default.is_none());
        }
        _ => panic!("Expected DECLARE"),
    }
}

#[test]
fn test_parse_cursor_statements() {
    assert_eq!(Parser::parse("OPEN cur").unwrap(), Statement::Open("cur".to_string()));
    assert_eq!(Parser::parse("CLOSE cur").unwrap(), Statement::Close("cur".to_string()));
    match Parser::parse("FETCH NEXT FROM cur INTO a, b").unwrap() {
        Statement::Fetch { cursor, into } => {
            assert_eq!(cursor, "cur");
            assert_eq!(into, vec!["a", "b"]);
        }
        _ => panic!("Expected FETCH"),
    }
}

#[test]
fn test_parse_signal_and_diagnostics() {
    match Parser::parse("SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'boom', MYSQL_ERRNO = 1001").unwrap() {
        Statement::Signal(s) => {
            assert_eq!(s.condition, Some(ConditionValue::SqlState("45000".to_string())));
            assert_eq!(s.items.len(), 2);
            assert_eq!(s.items[0].name, "MESSAGE_TEXT");
        }
        _ => panic!("Expected SIGNAL"),
    }
    assert!(matches!(Parser::parse("RESIGNAL").unwrap(), Statement::Resignal(_)));
    assert!(Parser::parse("SIGNAL").is_err());
    match Parser::parse("GET CURRENT DIAGNOSTICS CONDITION 1 @msg = MESSAGE_TEXT, @no = MYSQL_ERRNO").unwrap() {
        Statement::GetDiagnostics(d) => {
            assert_eq!(d.area, Some(DiagnosticsArea::Current));
            assert_eq!(d.condition, Some(Expr::int(1)));
            assert_eq!(d.items.len(), 2);
            assert_eq!(d.items[1].name, "MYSQL_ERRNO");
        }
        _ => panic!("Expected GET DIAGNOSTICS"),
    }
}

//=============================================================================
// Statement lists and prepared statements
//=============================================================================

#[test]
fn test_parse_statements() {
    let mut parser = Parser::new(Lexer::new(b"SELECT 1; ; SELECT 2;")).unwrap();
    let statements = parser.parse_statements().unwrap();
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_missing_semicolon_multistatement() {
    let mut parser = Parser::new(Lexer::new(b"SELECT 1 SELECT 2")).unwrap();
    assert!(parser.parse_statements().is_err());
}

#[test]
fn test_parse_prepared_counts_markers() {
    let (_, count) = Parser::parse_prepared("SELECT * FROM t WHERE a = ? AND b IN (?, ?)").unwrap();
    assert_eq!(count, 3);
}

//=============================================================================
// Errors
//=============================================================================

#[test]
fn test_empty_input() {
    let result = Parser::parse("");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("end of input") || err.contains("Empty"));
}

#[test]
fn test_incomplete_select() {
    let result = Parser::parse("SELECT");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("Expected expression"));
}

#[test]
fn test_incomplete_select_from() {
    let result = Parser::parse("SELECT * FROM");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("identifier"));
}

#[test]
fn test_incomplete_insert_values() {
    let result = Parser::parse("INSERT INTO users VALUES");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("end of input"));
}

#[test]
fn test_unclosed_parenthesis() {
    assert!(Parser::parse("SELECT (1 + 2").is_err());
}

#[test]
fn test_trailing_garbage() {
    assert!(Parser::parse("SELECT 1 FROM t WHERE a = 1 )").is_err());
}

#[test]
fn test_error_contains_context_info() {
    let result = Parser::parse("SELECT * FROM users WHERE");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.offset(), Some(25));
    let err = err.to_string();
    assert!(err.contains("while parsing"));
    assert!(err.contains("WHERE clause"));
}

#[test]
fn test_error_in_nested_context() {
    let result = Parser::parse("CREATE TABLE t (a INT, b VARCHAR(x))");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("column definition"));
}
