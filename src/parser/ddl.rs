use crate::ast::*;
use crate::error::Result;
use crate::lexer::TokenKind;

use super::Parser;

impl Parser {
    /// Parse CREATE TABLE or CREATE INDEX
    pub(super) fn parse_create(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Create)?;
        let temporary = self.eat_word("TEMPORARY")?;
        if self.eat(TokenKind::Table)? {
            self.push_context("CREATE TABLE statement");
            let result = self.parse_create_table(temporary);
            self.pop_context();
            return result;
        }
        if temporary {
            return Err(self.unexpected("TABLE"));
        }
        let unique = self.eat(TokenKind::Unique)?;
        if self.eat(TokenKind::Index)? {
            self.push_context("CREATE INDEX statement");
            let result = self.parse_create_index(unique);
            self.pop_context();
            return result;
        }
        Err(self.unexpected("TABLE or INDEX"))
    }

    fn parse_create_table(&mut self, temporary: bool) -> Result<Statement> {
        let if_not_exists = if self.eat(TokenKind::If)? {
            self.expect(TokenKind::Not)?;
            self.expect(TokenKind::Exists)?;
            true
        } else {
            false
        };
        let name = self.parse_identifier_chain(false)?;

        self.expect(TokenKind::LeftParen)?;
        let mut elements = Vec::new();
        loop {
            let element = match self.parse_key_element()? {
                Some(element) => element,
                None => TableElement::Column(self.parse_column_def()?),
            };
            elements.push(element);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;

        let mut options = Vec::new();
        loop {
            if self.eat(TokenKind::Comma)? {
                continue;
            }
            match self.parse_table_option()? {
                Some(option) => options.push(option),
                None => break,
            }
        }

        Ok(Statement::CreateTable(CreateTableStmt {
            temporary,
            if_not_exists,
            name,
            elements,
            options,
        }))
    }

    fn parse_create_index(&mut self, unique: bool) -> Result<Statement> {
        let name = self.identifier()?;
        self.expect(TokenKind::On)?;
        let table = self.parse_identifier_chain(false)?;
        let columns = self.parse_index_columns()?;
        Ok(Statement::CreateIndex(CreateIndexStmt { unique, name, table, columns }))
    }

    //-------------------------------------------------------------------------
    // Columns and types
    //-------------------------------------------------------------------------

    /// Parse a column definition
    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        self.push_context("column definition");
        let result = self.parse_column_def_impl();
        self.pop_context();
        result
    }

    fn parse_column_def_impl(&mut self) -> Result<ColumnDef> {
        let name = self.identifier()?;
        let data_type = self.parse_data_type()?;
        let mut column = ColumnDef::new(name, data_type);

        loop {
            match self.tok.kind {
                TokenKind::Not => {
                    self.advance()?;
                    self.expect(TokenKind::LiteralNull)?;
                    column.nullable = Some(false);
                }
                TokenKind::LiteralNull => {
                    self.advance()?;
                    column.nullable = Some(true);
                }
                TokenKind::Default => {
                    self.advance()?;
                    column.default = Some(self.parse_unary()?);
                }
                TokenKind::On => {
                    self.advance()?;
                    self.expect(TokenKind::Update)?;
                    column.on_update = Some(self.parse_unary()?);
                }
                TokenKind::Unique => {
                    self.advance()?;
                    self.eat(TokenKind::Key)?;
                    column.unique = true;
                }
                TokenKind::Primary | TokenKind::Key => {
                    if self.eat(TokenKind::Primary)? {
                        self.expect(TokenKind::Key)?;
                    } else {
                        self.advance()?;
                    }
                    column.primary_key = true;
                }
                TokenKind::Collate => {
                    self.advance()?;
                    column.data_type.collation = Some(self.name_or_string()?);
                }
                TokenKind::Identifier if self.at_word("AUTO_INCREMENT") => {
                    self.advance()?;
                    column.auto_increment = true;
                }
                TokenKind::Identifier if self.at_word("COMMENT") => {
                    self.advance()?;
                    column.comment = Some(self.string_literal()?);
                }
                _ => break,
            }
        }
        Ok(column)
    }

    /// Type name with arguments, sign, charset and collation
    pub(super) fn parse_data_type(&mut self) -> Result<DataType> {
        if !self.at_identifier() && !self.tok.kind.is_keyword() {
            return Err(self.unexpected("data type"));
        }
        let mut data_type = DataType::new(self.upper());
        self.advance()?;
        if data_type.name == "DOUBLE" {
            self.eat(TokenKind::Precision)?;
        }

        if self.eat(TokenKind::LeftParen)? {
            if data_type.name == "ENUM" || data_type.name == "SET" {
                loop {
                    data_type.values.push(self.string_literal()?);
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
            } else {
                loop {
                    data_type.args.push(self.integer()?);
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen)?;
        }

        loop {
            if self.eat(TokenKind::Unsigned)? {
                data_type.unsigned = true;
            } else if self.eat(TokenKind::Zerofill)? {
                data_type.zerofill = true;
            } else if !self.eat_word("SIGNED")? {
                break;
            }
        }

        data_type.charset = self.parse_charset_clause()?;
        if self.eat(TokenKind::Collate)? {
            data_type.collation = Some(self.name_or_string()?);
        }
        Ok(data_type)
    }

    //-------------------------------------------------------------------------
    // Keys
    //-------------------------------------------------------------------------

    /// Index or foreign key definition; `None` when the element is a column
    fn parse_key_element(&mut self) -> Result<Option<TableElement>> {
        let constraint = if self.eat(TokenKind::Constraint)? {
            if self.at_identifier() {
                Some(self.identifier()?)
            } else {
                None
            }
        } else {
            None
        };

        let kind = match self.tok.kind {
            TokenKind::Primary => {
                self.advance()?;
                self.expect(TokenKind::Key)?;
                KeyKind::Primary
            }
            TokenKind::Unique => {
                self.advance()?;
                if !self.eat(TokenKind::Key)? {
                    self.eat(TokenKind::Index)?;
                }
                KeyKind::Unique
            }
            TokenKind::Key | TokenKind::Index if constraint.is_none() => {
                self.advance()?;
                KeyKind::Index
            }
            TokenKind::Fulltext if constraint.is_none() => {
                self.advance()?;
                if !self.eat(TokenKind::Key)? {
                    self.eat(TokenKind::Index)?;
                }
                KeyKind::Fulltext
            }
            TokenKind::Foreign => {
                return self.parse_foreign_key(constraint).map(|fk| Some(TableElement::ForeignKey(fk)));
            }
            _ if constraint.is_some() => {
                return Err(self.unexpected("PRIMARY KEY, UNIQUE or FOREIGN KEY"));
            }
            _ => return Ok(None),
        };

        let name = if self.at_identifier() { Some(self.identifier()?) } else { None };
        let columns = self.parse_index_columns()?;
        Ok(Some(TableElement::Key(KeyDef { kind, constraint, name, columns })))
    }

    /// `(col[(len)] [ASC|DESC], ..)`
    fn parse_index_columns(&mut self) -> Result<Vec<IndexColumn>> {
        self.expect(TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            let name = self.identifier()?;
            let length = if self.eat(TokenKind::LeftParen)? {
                let length = self.integer()?;
                self.expect(TokenKind::RightParen)?;
                Some(length)
            } else {
                None
            };
            let direction = if self.eat(TokenKind::Asc)? {
                Some(SortOrder::Asc)
            } else if self.eat(TokenKind::Desc)? {
                Some(SortOrder::Desc)
            } else {
                None
            };
            columns.push(IndexColumn { name, length, direction });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(columns)
    }

    fn parse_foreign_key(&mut self, constraint: Option<String>) -> Result<ForeignKeyDef> {
        self.expect(TokenKind::Foreign)?;
        self.expect(TokenKind::Key)?;
        let name = if self.at_identifier() { Some(self.identifier()?) } else { None };
        let columns = self.parenthesized_identifiers()?;
        self.expect(TokenKind::References)?;
        let ref_table = self.parse_identifier_chain(false)?;
        let ref_columns = self.parenthesized_identifiers()?;

        let mut fk = ForeignKeyDef {
            constraint,
            name,
            columns,
            ref_table,
            ref_columns,
            on_delete: None,
            on_update: None,
        };
        while self.eat(TokenKind::On)? {
            if self.eat(TokenKind::Delete)? {
                fk.on_delete = Some(self.parse_reference_action()?);
            } else {
                self.expect(TokenKind::Update)?;
                fk.on_update = Some(self.parse_reference_action()?);
            }
        }
        Ok(fk)
    }

    fn parse_reference_action(&mut self) -> Result<String> {
        let action = match self.tok.kind {
            TokenKind::Restrict => "RESTRICT",
            TokenKind::Cascade => "CASCADE",
            TokenKind::Set => {
                self.advance()?;
                self.expect(TokenKind::LiteralNull)?;
                return Ok("SET NULL".to_string());
            }
            TokenKind::Identifier if self.at_word("NO") => {
                self.advance()?;
                self.expect_word("ACTION")?;
                return Ok("NO ACTION".to_string());
            }
            _ => return Err(self.unexpected("RESTRICT, CASCADE, SET NULL or NO ACTION")),
        };
        self.advance()?;
        Ok(action.to_string())
    }

    //-------------------------------------------------------------------------
    // Table options
    //-------------------------------------------------------------------------

    /// `[DEFAULT] name [=] value`; `None` when no option starts here
    fn parse_table_option(&mut self) -> Result<Option<TableOption>> {
        let default = self.eat(TokenKind::Default)?;
        let name = if self.at(TokenKind::Character) && self.peek2()?.kind == TokenKind::Set {
            self.advance()?;
            self.advance()?;
            "CHARACTER SET".to_string()
        } else if self.at(TokenKind::Collate) || self.at(TokenKind::Identifier) {
            let name = self.upper();
            self.advance()?;
            name
        } else if default {
            return Err(self.unexpected("table option"));
        } else {
            return Ok(None);
        };
        let name = if default { format!("DEFAULT {}", name) } else { name };

        self.eat(TokenKind::Equal)?;
        let value = match self.tok.kind {
            TokenKind::LiteralString | TokenKind::LiteralInteger | TokenKind::LiteralDecimal => {
                self.parse_primary()?
            }
            TokenKind::Default => {
                self.advance()?;
                Expr::Default
            }
            _ => Expr::Identifier(self.parse_identifier_chain(false)?),
        };
        Ok(Some(TableOption { name, value }))
    }

    //-------------------------------------------------------------------------
    // ALTER / DROP / RENAME
    //-------------------------------------------------------------------------

    /// Parse ALTER TABLE statement
    pub(super) fn parse_alter(&mut self) -> Result<Statement> {
        self.push_context("ALTER TABLE statement");
        let result = self.parse_alter_impl();
        self.pop_context();
        result
    }

    fn parse_alter_impl(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Alter)?;
        self.expect(TokenKind::Table)?;
        let table = self.parse_identifier_chain(false)?;
        let mut actions = Vec::new();
        loop {
            actions.push(self.parse_alter_action()?);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Statement::AlterTable(AlterTableStmt { table, actions }))
    }

    fn parse_alter_action(&mut self) -> Result<AlterAction> {
        match self.tok.kind {
            TokenKind::Add => {
                self.advance()?;
                if !self.eat(TokenKind::Column)? {
                    match self.parse_key_element()? {
                        Some(TableElement::Key(key)) => return Ok(AlterAction::AddKey(key)),
                        Some(TableElement::ForeignKey(fk)) => {
                            return Ok(AlterAction::AddForeignKey(fk))
                        }
                        _ => {}
                    }
                }
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterAction::AddColumn { column, position })
            }
            TokenKind::Drop => {
                self.advance()?;
                match self.tok.kind {
                    TokenKind::Index | TokenKind::Key => {
                        self.advance()?;
                        Ok(AlterAction::DropIndex(self.identifier()?))
                    }
                    TokenKind::Primary => {
                        self.advance()?;
                        self.expect(TokenKind::Key)?;
                        Ok(AlterAction::DropPrimaryKey)
                    }
                    TokenKind::Foreign => {
                        self.advance()?;
                        self.expect(TokenKind::Key)?;
                        Ok(AlterAction::DropForeignKey(self.identifier()?))
                    }
                    _ => {
                        self.eat(TokenKind::Column)?;
                        Ok(AlterAction::DropColumn(self.identifier()?))
                    }
                }
            }
            TokenKind::Change => {
                self.advance()?;
                self.eat(TokenKind::Column)?;
                let old_name = self.identifier()?;
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterAction::ChangeColumn { old_name, column, position })
            }
            TokenKind::Rename => {
                self.advance()?;
                if !self.eat(TokenKind::To)? {
                    self.eat(TokenKind::As)?;
                }
                Ok(AlterAction::RenameTo(self.parse_identifier_chain(false)?))
            }
            TokenKind::Identifier if self.at_word("MODIFY") => {
                self.advance()?;
                self.eat(TokenKind::Column)?;
                let column = self.parse_column_def()?;
                let position = self.parse_column_position()?;
                Ok(AlterAction::ModifyColumn { column, position })
            }
            _ => match self.parse_table_option()? {
                Some(option) => Ok(AlterAction::Option(option)),
                None => Err(self.unexpected("ALTER TABLE action")),
            },
        }
    }

    /// `FIRST` / `AFTER col`
    fn parse_column_position(&mut self) -> Result<Option<ColumnPosition>> {
        if self.eat_word("FIRST")? {
            return Ok(Some(ColumnPosition::First));
        }
        if self.eat_word("AFTER")? {
            return Ok(Some(ColumnPosition::After(self.identifier()?)));
        }
        Ok(None)
    }

    /// Parse DROP TABLE or DROP INDEX
    pub(super) fn parse_drop(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Drop)?;
        if self.eat(TokenKind::Index)? {
            let name = self.identifier()?;
            self.expect(TokenKind::On)?;
            let table = self.parse_identifier_chain(false)?;
            return Ok(Statement::DropIndex { name, table });
        }

        let temporary = self.eat_word("TEMPORARY")?;
        self.expect(TokenKind::Table)?;
        let if_exists = if self.eat(TokenKind::If)? {
            self.expect(TokenKind::Exists)?;
            true
        } else {
            false
        };
        let mut tables = vec![self.parse_identifier_chain(false)?];
        while self.eat(TokenKind::Comma)? {
            tables.push(self.parse_identifier_chain(false)?);
        }
        let behavior = if self.eat(TokenKind::Restrict)? {
            Some(DropBehavior::Restrict)
        } else if self.eat(TokenKind::Cascade)? {
            Some(DropBehavior::Cascade)
        } else {
            None
        };
        Ok(Statement::DropTable { temporary, if_exists, tables, behavior })
    }

    /// `RENAME TABLE a TO b, ..`
    pub(super) fn parse_rename(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Rename)?;
        self.expect(TokenKind::Table)?;
        let mut pairs = Vec::new();
        loop {
            let from = self.parse_identifier_chain(false)?;
            self.expect(TokenKind::To)?;
            let to = self.parse_identifier_chain(false)?;
            pairs.push((from, to));
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Statement::RenameTable(pairs))
    }
}
