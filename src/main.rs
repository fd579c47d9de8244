//! minisql-parser command line front end
//!
//! Usage:
//!   minisql-parser [--tokens] [--config FILE] [--args JSON] [SQL]...
//!
//! Every SQL argument (or stdin when there is none) is parsed as a script of
//! `;`-separated statements and each statement is printed in normalized
//! form. `--tokens` dumps the lexer output instead, one JSON object per
//! token. `--args` binds a JSON array to the `?` markers and prints the
//! arguments in the order of the regenerated text.

use std::io::{self, Read};

use log::{debug, info};
use serde_json::{json, Value as JsonValue};

use minisql_parser::config::ParserConfig;
use minisql_parser::lexer::TokenKind;
use minisql_parser::{Charset, Lexer, OutputVisitor, Parser, SqlError, Value, Visitor};

const USAGE: &str = "Usage: minisql-parser [--tokens] [--config FILE] [--args JSON] [SQL]...";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = ParserConfig::default();
    let mut tokens = false;
    let mut bound: Vec<Value> = Vec::new();
    let mut inputs: Vec<String> = Vec::new();

    // Simple argument parsing
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tokens" | "-t" => tokens = true,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config = ParserConfig::load(&args[i + 1])?;
                    i += 1;
                }
            }
            "--args" | "-a" => {
                if i + 1 < args.len() {
                    let values: Vec<JsonValue> = serde_json::from_str(&args[i + 1])?;
                    bound = values.into_iter().map(Value::from).collect();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  -t, --tokens       Print lexer tokens as JSON instead of SQL");
                println!("  -c, --config FILE  JSON parser configuration");
                println!("  -a, --args JSON    JSON array bound to the ? markers");
                println!("  -h, --help         Print this help message");
                return Ok(());
            }
            _ => inputs.push(args[i].clone()),
        }
        i += 1;
    }

    config.install();

    if inputs.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        inputs.push(text);
    }

    for input in &inputs {
        let bytes = config.charset.encode(input)?;
        if tokens {
            print_tokens(&bytes, config.charset)?;
        } else {
            print_statements(&bytes, config.charset, &bound)?;
        }
    }

    Ok(())
}

/// One JSON object per token, `Eof` included
fn print_tokens(input: &[u8], charset: Charset) -> Result<(), SqlError> {
    let mut lexer = Lexer::with_charset(input, charset);
    loop {
        let token = lexer.next_token()?;
        let end = (token.offset + token.len).min(input.len());
        let text = input.get(token.offset..end).unwrap_or_default();
        let mut object = json!({
            "kind": format!("{:?}", token.kind),
            "offset": token.offset,
            "len": token.len,
            "text": charset.decode(text),
        });
        if let Some(index) = token.param_index() {
            object["param"] = json!(index);
        }
        println!("{}", object);
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    Ok(())
}

/// Normalized SQL for every statement, followed by the re-ordered arguments
fn print_statements(input: &[u8], charset: Charset, bound: &[Value]) -> Result<(), SqlError> {
    let mut parser = Parser::new(Lexer::with_charset(input, charset))?;
    let statements = parser.parse_statements()?;
    info!("Parsed {} statement(s), {} parameter marker(s)", statements.len(), parser.param_count());

    for stmt in &statements {
        let mut out = OutputVisitor::new(String::new(), bound);
        out.visit_statement(stmt);
        if !bound.is_empty() {
            if let Some(&slot) = out.args_index().iter().find(|&&slot| slot >= bound.len()) {
                return Err(SqlError::Config(format!(
                    "No argument bound to parameter marker {} ({} given)",
                    slot + 1,
                    bound.len()
                )));
            }
            debug!("Argument order: {:?}", out.args_index());
            let reordered: Vec<JsonValue> = out.arguments().iter().map(Value::to_json).collect();
            println!("{};", out.sql());
            println!("{}", JsonValue::Array(reordered));
        } else {
            println!("{};", out.sql());
        }
    }
    Ok(())
}
