//! Reserved word recognition
//!
//! Identifier classification is the hottest path of the lexer, so the lookup
//! dispatches on the first byte and then matches the whole byte slice within
//! that bucket. The compiler turns each bucket into a length/byte decision
//! tree. The behavior is that of a perfect hash map over [`KEYWORDS`]: every
//! reserved word maps to exactly one kind and everything else, including
//! `NULL`, `TRUE` and `FALSE` (literal kinds), is not found.

use std::sync::OnceLock;

use super::token::TokenKind;
use super::token::TokenKind as K;

/// Look up an uppercase byte run
pub fn lookup(upper: &[u8]) -> Option<TokenKind> {
    let first = *upper.first()?;
    match first {
        b'A' => match upper {
            b"AS" => Some(K::As),
            b"ADD" => Some(K::Add),
            b"ALL" => Some(K::All),
            b"AND" => Some(K::And),
            b"ASC" => Some(K::Asc),
            b"ALTER" => Some(K::Alter),
            b"ANALYZE" => Some(K::Analyze),
            b"ACCESSIBLE" => Some(K::Accessible),
            b"ASENSITIVE" => Some(K::Asensitive),
            _ => None,
        },
        b'B' => match upper {
            b"BY" => Some(K::By),
            b"BLOB" => Some(K::Blob),
            b"BOTH" => Some(K::Both),
            b"BEFORE" => Some(K::Before),
            b"BIGINT" => Some(K::Bigint),
            b"BINARY" => Some(K::Binary),
            b"BETWEEN" => Some(K::Between),
            _ => None,
        },
        b'C' => match upper {
            b"CALL" => Some(K::Call),
            b"CASE" => Some(K::Case),
            b"CHAR" => Some(K::Char),
            b"CHECK" => Some(K::Check),
            b"CROSS" => Some(K::Cross),
            b"CHANGE" => Some(K::Change),
            b"COLUMN" => Some(K::Column),
            b"CREATE" => Some(K::Create),
            b"CURSOR" => Some(K::Cursor),
            b"CASCADE" => Some(K::Cascade),
            b"COLLATE" => Some(K::Collate),
            b"CONVERT" => Some(K::Convert),
            b"CONTINUE" => Some(K::Continue),
            b"CHARACTER" => Some(K::Character),
            b"CONDITION" => Some(K::Condition),
            b"CONSTRAINT" => Some(K::Constraint),
            b"CURRENT_DATE" => Some(K::CurrentDate),
            b"CURRENT_TIME" => Some(K::CurrentTime),
            b"CURRENT_USER" => Some(K::CurrentUser),
            b"CURRENT_TIMESTAMP" => Some(K::CurrentTimestamp),
            _ => None,
        },
        b'D' => match upper {
            b"DEC" => Some(K::Dec),
            b"DIV" => Some(K::Div),
            b"DESC" => Some(K::Desc),
            b"DROP" => Some(K::Drop),
            b"DUAL" => Some(K::Dual),
            b"DELETE" => Some(K::Delete),
            b"DOUBLE" => Some(K::Double),
            b"DECIMAL" => Some(K::Decimal),
            b"DECLARE" => Some(K::Declare),
            b"DEFAULT" => Some(K::Default),
            b"DELAYED" => Some(K::Delayed),
            b"DATABASE" => Some(K::Database),
            b"DAY_HOUR" => Some(K::DayHour),
            b"DESCRIBE" => Some(K::Describe),
            b"DISTINCT" => Some(K::Distinct),
            b"DATABASES" => Some(K::Databases),
            b"DAY_MINUTE" => Some(K::DayMinute),
            b"DAY_SECOND" => Some(K::DaySecond),
            b"DISTINCTROW" => Some(K::Distinctrow),
            b"DETERMINISTIC" => Some(K::Deterministic),
            b"DAY_MICROSECOND" => Some(K::DayMicrosecond),
            _ => None,
        },
        b'E' => match upper {
            b"EACH" => Some(K::Each),
            b"ELSE" => Some(K::Else),
            b"EXIT" => Some(K::Exit),
            b"ELSEIF" => Some(K::Elseif),
            b"EXISTS" => Some(K::Exists),
            b"ESCAPED" => Some(K::Escaped),
            b"EXPLAIN" => Some(K::Explain),
            b"ENCLOSED" => Some(K::Enclosed),
            _ => None,
        },
        b'F' => match upper {
            b"FOR" => Some(K::For),
            b"FROM" => Some(K::From),
            b"FETCH" => Some(K::Fetch),
            b"FLOAT" => Some(K::Float),
            b"FORCE" => Some(K::Force),
            b"FLOAT4" => Some(K::Float4),
            b"FLOAT8" => Some(K::Float8),
            b"FOREIGN" => Some(K::Foreign),
            b"FULLTEXT" => Some(K::Fulltext),
            _ => None,
        },
        b'G' => match upper {
            b"GRANT" => Some(K::Grant),
            b"GROUP" => Some(K::Group),
            b"GENERAL" => Some(K::General),
            _ => None,
        },
        b'H' => match upper {
            b"HAVING" => Some(K::Having),
            b"HOUR_MINUTE" => Some(K::HourMinute),
            b"HOUR_SECOND" => Some(K::HourSecond),
            b"HIGH_PRIORITY" => Some(K::HighPriority),
            b"HOUR_MICROSECOND" => Some(K::HourMicrosecond),
            _ => None,
        },
        b'I' => match upper {
            b"IF" => Some(K::If),
            b"IN" => Some(K::In),
            b"IS" => Some(K::Is),
            b"INT" => Some(K::Int),
            b"INT1" => Some(K::Int1),
            b"INT2" => Some(K::Int2),
            b"INT3" => Some(K::Int3),
            b"INT4" => Some(K::Int4),
            b"INT8" => Some(K::Int8),
            b"INTO" => Some(K::Into),
            b"INDEX" => Some(K::Index),
            b"INNER" => Some(K::Inner),
            b"INOUT" => Some(K::Inout),
            b"IGNORE" => Some(K::Ignore),
            b"INFILE" => Some(K::Infile),
            b"INSERT" => Some(K::Insert),
            b"INTEGER" => Some(K::Integer),
            b"ITERATE" => Some(K::Iterate),
            b"INTERVAL" => Some(K::Interval),
            b"INSENSITIVE" => Some(K::Insensitive),
            b"IGNORE_SERVER_IDS" => Some(K::IgnoreServerIds),
            _ => None,
        },
        b'J' => match upper {
            b"JOIN" => Some(K::Join),
            _ => None,
        },
        b'K' => match upper {
            b"KEY" => Some(K::Key),
            b"KEYS" => Some(K::Keys),
            b"KILL" => Some(K::Kill),
            _ => None,
        },
        b'L' => match upper {
            b"LEFT" => Some(K::Left),
            b"LIKE" => Some(K::Like),
            b"LOAD" => Some(K::Load),
            b"LOCK" => Some(K::Lock),
            b"LONG" => Some(K::Long),
            b"LOOP" => Some(K::Loop),
            b"LEAVE" => Some(K::Leave),
            b"LIMIT" => Some(K::Limit),
            b"LINES" => Some(K::Lines),
            b"LINEAR" => Some(K::Linear),
            b"LEADING" => Some(K::Leading),
            b"LONGBLOB" => Some(K::Longblob),
            b"LONGTEXT" => Some(K::Longtext),
            b"LOCALTIME" => Some(K::Localtime),
            b"LOW_PRIORITY" => Some(K::LowPriority),
            b"LOCALTIMESTAMP" => Some(K::Localtimestamp),
            _ => None,
        },
        b'M' => match upper {
            b"MOD" => Some(K::Mod),
            b"MATCH" => Some(K::Match),
            b"MAXVALUE" => Some(K::Maxvalue),
            b"MODIFIES" => Some(K::Modifies),
            b"MEDIUMINT" => Some(K::Mediumint),
            b"MIDDLEINT" => Some(K::Middleint),
            b"MEDIUMBLOB" => Some(K::Mediumblob),
            b"MEDIUMTEXT" => Some(K::Mediumtext),
            b"MINUTE_SECOND" => Some(K::MinuteSecond),
            b"MINUTE_MICROSECOND" => Some(K::MinuteMicrosecond),
            b"MASTER_HEARTBEAT_PERIOD" => Some(K::MasterHeartbeatPeriod),
            b"MASTER_SSL_VERIFY_SERVER_CERT" => Some(K::MasterSslVerifyServerCert),
            _ => None,
        },
        b'N' => match upper {
            b"NOT" => Some(K::Not),
            b"NATURAL" => Some(K::Natural),
            b"NUMERIC" => Some(K::Numeric),
            b"NO_WRITE_TO_BINLOG" => Some(K::NoWriteToBinlog),
            _ => None,
        },
        b'O' => match upper {
            b"ON" => Some(K::On),
            b"OR" => Some(K::Or),
            b"OUT" => Some(K::Out),
            b"ORDER" => Some(K::Order),
            b"OUTER" => Some(K::Outer),
            b"OPTION" => Some(K::Option),
            b"OUTFILE" => Some(K::Outfile),
            b"OPTIMIZE" => Some(K::Optimize),
            b"OPTIONALLY" => Some(K::Optionally),
            _ => None,
        },
        b'P' => match upper {
            b"PURGE" => Some(K::Purge),
            b"PRIMARY" => Some(K::Primary),
            b"PRECISION" => Some(K::Precision),
            b"PROCEDURE" => Some(K::Procedure),
            _ => None,
        },
        b'R' => match upper {
            b"READ" => Some(K::Read),
            b"REAL" => Some(K::Real),
            b"RANGE" => Some(K::Range),
            b"READS" => Some(K::Reads),
            b"RIGHT" => Some(K::Right),
            b"RLIKE" => Some(K::Rlike),
            b"REGEXP" => Some(K::Regexp),
            b"RENAME" => Some(K::Rename),
            b"REPEAT" => Some(K::Repeat),
            b"RETURN" => Some(K::Return),
            b"REVOKE" => Some(K::Revoke),
            b"RELEASE" => Some(K::Release),
            b"REPLACE" => Some(K::Replace),
            b"REQUIRE" => Some(K::Require),
            b"RESIGNAL" => Some(K::Resignal),
            b"RESTRICT" => Some(K::Restrict),
            b"READ_WRITE" => Some(K::ReadWrite),
            b"REFERENCES" => Some(K::References),
            _ => None,
        },
        b'S' => match upper {
            b"SET" => Some(K::Set),
            b"SQL" => Some(K::Sql),
            b"SSL" => Some(K::Ssl),
            b"SHOW" => Some(K::Show),
            b"SLOW" => Some(K::Slow),
            b"SCHEMA" => Some(K::Schema),
            b"SELECT" => Some(K::Select),
            b"SIGNAL" => Some(K::Signal),
            b"SCHEMAS" => Some(K::Schemas),
            b"SPATIAL" => Some(K::Spatial),
            b"SMALLINT" => Some(K::Smallint),
            b"SPECIFIC" => Some(K::Specific),
            b"SQLSTATE" => Some(K::Sqlstate),
            b"STARTING" => Some(K::Starting),
            b"SENSITIVE" => Some(K::Sensitive),
            b"SEPARATOR" => Some(K::Separator),
            b"SQLWARNING" => Some(K::Sqlwarning),
            b"SQLEXCEPTION" => Some(K::Sqlexception),
            b"STRAIGHT_JOIN" => Some(K::StraightJoin),
            b"SQL_BIG_RESULT" => Some(K::SqlBigResult),
            b"SQL_SMALL_RESULT" => Some(K::SqlSmallResult),
            b"SECOND_MICROSECOND" => Some(K::SecondMicrosecond),
            b"SQL_CALC_FOUND_ROWS" => Some(K::SqlCalcFoundRows),
            _ => None,
        },
        b'T' => match upper {
            b"TO" => Some(K::To),
            b"THEN" => Some(K::Then),
            b"TABLE" => Some(K::Table),
            b"TINYINT" => Some(K::Tinyint),
            b"TRIGGER" => Some(K::Trigger),
            b"TINYBLOB" => Some(K::Tinyblob),
            b"TINYTEXT" => Some(K::Tinytext),
            b"TRAILING" => Some(K::Trailing),
            b"TERMINATED" => Some(K::Terminated),
            _ => None,
        },
        b'U' => match upper {
            b"USE" => Some(K::Use),
            b"UNDO" => Some(K::Undo),
            b"UNION" => Some(K::Union),
            b"USAGE" => Some(K::Usage),
            b"USING" => Some(K::Using),
            b"UNIQUE" => Some(K::Unique),
            b"UNLOCK" => Some(K::Unlock),
            b"UPDATE" => Some(K::Update),
            b"UNSIGNED" => Some(K::Unsigned),
            b"UTC_DATE" => Some(K::UtcDate),
            b"UTC_TIME" => Some(K::UtcTime),
            b"UTC_TIMESTAMP" => Some(K::UtcTimestamp),
            _ => None,
        },
        b'V' => match upper {
            b"VALUES" => Some(K::Values),
            b"VARCHAR" => Some(K::Varchar),
            b"VARYING" => Some(K::Varying),
            b"VARBINARY" => Some(K::Varbinary),
            b"VARCHARACTER" => Some(K::Varcharacter),
            _ => None,
        },
        b'W' => match upper {
            b"WHEN" => Some(K::When),
            b"WITH" => Some(K::With),
            b"WHERE" => Some(K::Where),
            b"WHILE" => Some(K::While),
            b"WRITE" => Some(K::Write),
            _ => None,
        },
        b'X' => match upper {
            b"XOR" => Some(K::Xor),
            _ => None,
        },
        b'Y' => match upper {
            b"YEAR_MONTH" => Some(K::YearMonth),
            _ => None,
        },
        b'Z' => match upper {
            b"ZEROFILL" => Some(K::Zerofill),
            _ => None,
        },
        _ => None,
    }
}

/// Look up an uppercase string
pub fn lookup_str(upper: &str) -> Option<TokenKind> {
    lookup(upper.as_bytes())
}

/// The complete reserved word set
pub static KEYWORDS: &[(&str, TokenKind)] = &[
    ("ACCESSIBLE", TokenKind::Accessible),
    ("ADD", TokenKind::Add),
    ("ALL", TokenKind::All),
    ("ALTER", TokenKind::Alter),
    ("ANALYZE", TokenKind::Analyze),
    ("AND", TokenKind::And),
    ("AS", TokenKind::As),
    ("ASC", TokenKind::Asc),
    ("ASENSITIVE", TokenKind::Asensitive),
    ("BEFORE", TokenKind::Before),
    ("BETWEEN", TokenKind::Between),
    ("BIGINT", TokenKind::Bigint),
    ("BINARY", TokenKind::Binary),
    ("BLOB", TokenKind::Blob),
    ("BOTH", TokenKind::Both),
    ("BY", TokenKind::By),
    ("CALL", TokenKind::Call),
    ("CASCADE", TokenKind::Cascade),
    ("CASE", TokenKind::Case),
    ("CHANGE", TokenKind::Change),
    ("CHAR", TokenKind::Char),
    ("CHARACTER", TokenKind::Character),
    ("CHECK", TokenKind::Check),
    ("COLLATE", TokenKind::Collate),
    ("COLUMN", TokenKind::Column),
    ("CONDITION", TokenKind::Condition),
    ("CONSTRAINT", TokenKind::Constraint),
    ("CONTINUE", TokenKind::Continue),
    ("CONVERT", TokenKind::Convert),
    ("CREATE", TokenKind::Create),
    ("CROSS", TokenKind::Cross),
    ("CURRENT_DATE", TokenKind::CurrentDate),
    ("CURRENT_TIME", TokenKind::CurrentTime),
    ("CURRENT_TIMESTAMP", TokenKind::CurrentTimestamp),
    ("CURRENT_USER", TokenKind::CurrentUser),
    ("CURSOR", TokenKind::Cursor),
    ("DATABASE", TokenKind::Database),
    ("DATABASES", TokenKind::Databases),
    ("DAY_HOUR", TokenKind::DayHour),
    ("DAY_MICROSECOND", TokenKind::DayMicrosecond),
    ("DAY_MINUTE", TokenKind::DayMinute),
    ("DAY_SECOND", TokenKind::DaySecond),
    ("DEC", TokenKind::Dec),
    ("DECIMAL", TokenKind::Decimal),
    ("DECLARE", TokenKind::Declare),
    ("DEFAULT", TokenKind::Default),
    ("DELAYED", TokenKind::Delayed),
    ("DELETE", TokenKind::Delete),
    ("DESC", TokenKind::Desc),
    ("DESCRIBE", TokenKind::Describe),
    ("DETERMINISTIC", TokenKind::Deterministic),
    ("DISTINCT", TokenKind::Distinct),
    ("DISTINCTROW", TokenKind::Distinctrow),
    ("DIV", TokenKind::Div),
    ("DOUBLE", TokenKind::Double),
    ("DROP", TokenKind::Drop),
    ("DUAL", TokenKind::Dual),
    ("EACH", TokenKind::Each),
    ("ELSE", TokenKind::Else),
    ("ELSEIF", TokenKind::Elseif),
    ("ENCLOSED", TokenKind::Enclosed),
    ("ESCAPED", TokenKind::Escaped),
    ("EXISTS", TokenKind::Exists),
    ("EXIT", TokenKind::Exit),
    ("EXPLAIN", TokenKind::Explain),
    ("FETCH", TokenKind::Fetch),
    ("FLOAT", TokenKind::Float),
    ("FLOAT4", TokenKind::Float4),
    ("FLOAT8", TokenKind::Float8),
    ("FOR", TokenKind::For),
    ("FORCE", TokenKind::Force),
    ("FOREIGN", TokenKind::Foreign),
    ("FROM", TokenKind::From),
    ("FULLTEXT", TokenKind::Fulltext),
    ("GENERAL", TokenKind::General),
    ("GRANT", TokenKind::Grant),
    ("GROUP", TokenKind::Group),
    ("HAVING", TokenKind::Having),
    ("HIGH_PRIORITY", TokenKind::HighPriority),
    ("HOUR_MICROSECOND", TokenKind::HourMicrosecond),
    ("HOUR_MINUTE", TokenKind::HourMinute),
    ("HOUR_SECOND", TokenKind::HourSecond),
    ("IF", TokenKind::If),
    ("IGNORE", TokenKind::Ignore),
    ("IGNORE_SERVER_IDS", TokenKind::IgnoreServerIds),
    ("IN", TokenKind::In),
    ("INDEX", TokenKind::Index),
    ("INFILE", TokenKind::Infile),
    ("INNER", TokenKind::Inner),
    ("INOUT", TokenKind::Inout),
    ("INSENSITIVE", TokenKind::Insensitive),
    ("INSERT", TokenKind::Insert),
    ("INT", TokenKind::Int),
    ("INT1", TokenKind::Int1),
    ("INT2", TokenKind::Int2),
    ("INT3", TokenKind::Int3),
    ("INT4", TokenKind::Int4),
    ("INT8", TokenKind::Int8),
    ("INTEGER", TokenKind::Integer),
    ("INTERVAL", TokenKind::Interval),
    ("INTO", TokenKind::Into),
    ("IS", TokenKind::Is),
    ("ITERATE", TokenKind::Iterate),
    ("JOIN", TokenKind::Join),
    ("KEY", TokenKind::Key),
    ("KEYS", TokenKind::Keys),
    ("KILL", TokenKind::Kill),
    ("LEADING", TokenKind::Leading),
    ("LEAVE", TokenKind::Leave),
    ("LEFT", TokenKind::Left),
    ("LIKE", TokenKind::Like),
    ("LIMIT", TokenKind::Limit),
    ("LINEAR", TokenKind::Linear),
    ("LINES", TokenKind::Lines),
    ("LOAD", TokenKind::Load),
    ("LOCALTIME", TokenKind::Localtime),
    ("LOCALTIMESTAMP", TokenKind::Localtimestamp),
    ("LOCK", TokenKind::Lock),
    ("LONG", TokenKind::Long),
    ("LONGBLOB", TokenKind::Longblob),
    ("LONGTEXT", TokenKind::Longtext),
    ("LOOP", TokenKind::Loop),
    ("LOW_PRIORITY", TokenKind::LowPriority),
    ("MASTER_HEARTBEAT_PERIOD", TokenKind::MasterHeartbeatPeriod),
    ("MASTER_SSL_VERIFY_SERVER_CERT", TokenKind::MasterSslVerifyServerCert),
    ("MATCH", TokenKind::Match),
    ("MAXVALUE", TokenKind::Maxvalue),
    ("MEDIUMBLOB", TokenKind::Mediumblob),
    ("MEDIUMINT", TokenKind::Mediumint),
    ("MEDIUMTEXT", TokenKind::Mediumtext),
    ("MIDDLEINT", TokenKind::Middleint),
    ("MINUTE_MICROSECOND", TokenKind::MinuteMicrosecond),
    ("MINUTE_SECOND", TokenKind::MinuteSecond),
    ("MOD", TokenKind::Mod),
    ("MODIFIES", TokenKind::Modifies),
    ("NATURAL", TokenKind::Natural),
    ("NOT", TokenKind::Not),
    ("NO_WRITE_TO_BINLOG", TokenKind::NoWriteToBinlog),
    ("NUMERIC", TokenKind::Numeric),
    ("ON", TokenKind::On),
    ("OPTIMIZE", TokenKind::Optimize),
    ("OPTION", TokenKind::Option),
    ("OPTIONALLY", TokenKind::Optionally),
    ("OR", TokenKind::Or),
    ("ORDER", TokenKind::Order),
    ("OUT", TokenKind::Out),
    ("OUTER", TokenKind::Outer),
    ("OUTFILE", TokenKind::Outfile),
    ("PRECISION", TokenKind::Precision),
    ("PRIMARY", TokenKind::Primary),
    ("PROCEDURE", TokenKind::Procedure),
    ("PURGE", TokenKind::Purge),
    ("RANGE", TokenKind::Range),
    ("READ", TokenKind::Read),
    ("READS", TokenKind::Reads),
    ("READ_WRITE", TokenKind::ReadWrite),
    ("REAL", TokenKind::Real),
    ("REFERENCES", TokenKind::References),
    ("REGEXP", TokenKind::Regexp),
    ("RELEASE", TokenKind::Release),
    ("RENAME", TokenKind::Rename),
    ("REPEAT", TokenKind::Repeat),
    ("REPLACE", TokenKind::Replace),
    ("REQUIRE", TokenKind::Require),
    ("RESIGNAL", TokenKind::Resignal),
    ("RESTRICT", TokenKind::Restrict),
    ("RETURN", TokenKind::Return),
    ("REVOKE", TokenKind::Revoke),
    ("RIGHT", TokenKind::Right),
    ("RLIKE", TokenKind::Rlike),
    ("SCHEMA", TokenKind::Schema),
    ("SCHEMAS", TokenKind::Schemas),
    ("SECOND_MICROSECOND", TokenKind::SecondMicrosecond),
    ("SELECT", TokenKind::Select),
    ("SENSITIVE", TokenKind::Sensitive),
    ("SEPARATOR", TokenKind::Separator),
    ("SET", TokenKind::Set),
    ("SHOW", TokenKind::Show),
    ("SIGNAL", TokenKind::Signal),
    ("SLOW", TokenKind::Slow),
    ("SMALLINT", TokenKind::Smallint),
    ("SPATIAL", TokenKind::Spatial),
    ("SPECIFIC", TokenKind::Specific),
    ("SQL", TokenKind::Sql),
    ("SQLEXCEPTION", TokenKind::Sqlexception),
    ("SQLSTATE", TokenKind::Sqlstate),
    ("SQLWARNING", TokenKind::Sqlwarning),
    ("SQL_BIG_RESULT", TokenKind::SqlBigResult),
    ("SQL_CALC_FOUND_ROWS", TokenKind::SqlCalcFoundRows),
    ("SQL_SMALL_RESULT", TokenKind::SqlSmallResult),
    ("SSL", TokenKind::Ssl),
    ("STARTING", TokenKind::Starting),
    ("STRAIGHT_JOIN", TokenKind::StraightJoin),
    ("TABLE", TokenKind::Table),
    ("TERMINATED", TokenKind::Terminated),
    ("THEN", TokenKind::Then),
    ("TINYBLOB", TokenKind::Tinyblob),
    ("TINYINT", TokenKind::Tinyint),
    ("TINYTEXT", TokenKind::Tinytext),
    ("TO", TokenKind::To),
    ("TRAILING", TokenKind::Trailing),
    ("TRIGGER", TokenKind::Trigger),
    ("UNDO", TokenKind::Undo),
    ("UNION", TokenKind::Union),
    ("UNIQUE", TokenKind::Unique),
    ("UNLOCK", TokenKind::Unlock),
    ("UNSIGNED", TokenKind::Unsigned),
    ("UPDATE", TokenKind::Update),
    ("USAGE", TokenKind::Usage),
    ("USE", TokenKind::Use),
    ("USING", TokenKind::Using),
    ("UTC_DATE", TokenKind::UtcDate),
    ("UTC_TIME", TokenKind::UtcTime),
    ("UTC_TIMESTAMP", TokenKind::UtcTimestamp),
    ("VALUES", TokenKind::Values),
    ("VARBINARY", TokenKind::Varbinary),
    ("VARCHAR", TokenKind::Varchar),
    ("VARCHARACTER", TokenKind::Varcharacter),
    ("VARYING", TokenKind::Varying),
    ("WHEN", TokenKind::When),
    ("WHERE", TokenKind::Where),
    ("WHILE", TokenKind::While),
    ("WITH", TokenKind::With),
    ("WRITE", TokenKind::Write),
    ("XOR", TokenKind::Xor),
    ("YEAR_MONTH", TokenKind::YearMonth),
    ("ZEROFILL", TokenKind::Zerofill),
];

/// Process-wide read-only keyword table
#[derive(Debug)]
pub struct KeywordTable {
    len: usize,
}

static TABLE: OnceLock<KeywordTable> = OnceLock::new();

impl KeywordTable {
    /// The shared table, built on first use
    pub fn get() -> &'static KeywordTable {
        TABLE.get_or_init(|| KeywordTable { len: KEYWORDS.len() })
    }

    pub fn get_bytes(&self, upper: &[u8]) -> Option<TokenKind> {
        lookup(upper)
    }

    pub fn get_str(&self, upper: &str) -> Option<TokenKind> {
        lookup_str(upper)
    }

    /// Number of reserved words
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, TokenKind)> {
        KEYWORDS.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_keywords() {
        assert_eq!(lookup(b"SELECT"), Some(TokenKind::Select));
        assert_eq!(lookup(b"FROM"), Some(TokenKind::From));
        assert_eq!(lookup(b"STRAIGHT_JOIN"), Some(TokenKind::StraightJoin));
        assert_eq!(lookup_str("MASTER_SSL_VERIFY_SERVER_CERT"), Some(TokenKind::MasterSslVerifyServerCert));
    }

    #[test]
    fn test_literal_words_are_not_keywords() {
        assert_eq!(lookup(b"NULL"), None);
        assert_eq!(lookup(b"TRUE"), None);
        assert_eq!(lookup(b"FALSE"), None);
    }

    #[test]
    fn test_prefixes_and_extensions_are_not_keywords() {
        assert_eq!(lookup(b"SELEC"), None);
        assert_eq!(lookup(b"SELECTS"), None);
        assert_eq!(lookup(b"IN"), Some(TokenKind::In));
        assert_eq!(lookup(b"INT9"), None);
        assert_eq!(lookup(b""), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup(b"select"), None);
    }

    #[test]
    fn test_keyword_text_inverts_lookup() {
        for (word, kind) in KEYWORDS {
            assert_eq!(kind.keyword_text(), Some(*word));
        }
        assert_eq!(KeywordTable::get().len(), KEYWORDS.len());
    }
}
