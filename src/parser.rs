use crate::ast::{
    ArithOp, Color, Condition, Expr, Operand, Program, RelOp, Statement, StatementKind,
    WriteItem,
};
use crate::error::{Error, Result, ScriptError};
use crate::lexer::{self, Line, Token};
use crate::value::{Value, ValueType};

/// Parse a full cmdscript source string into a classified program.
pub fn parse(source: &str) -> std::result::Result<Program, ScriptError> {
    let statements = lexer::tokenize(source)?
        .into_iter()
        .map(classify)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Program { statements })
}

/// Classify one tokenized line into exactly one statement kind.
pub fn classify(line: Line) -> std::result::Result<Statement, ScriptError> {
    let kind = match classify_tokens(&line.tokens) {
        Ok(kind) => kind,
        Err(e) => return Err(ScriptError::new(line.number, line.text, e)),
    };
    Ok(Statement {
        line: line.number,
        depth: line.depth,
        text: line.text,
        tokens: line.tokens,
        kind,
    })
}

// ---------------------------------------------------------------------------
// Line patterns
// ---------------------------------------------------------------------------

fn classify_tokens(tokens: &[Token]) -> Result<StatementKind> {
    let (first, rest) = match tokens.split_first() {
        Some((Token::Bare(first), rest)) => (first.as_str(), rest),
        Some((Token::Quoted(s), _)) => {
            return Err(Error::syntax(format!(
                "a line cannot start with a string literal: \"{}\"",
                s
            )));
        }
        None => return Err(Error::syntax("empty line")),
    };

    match first {
        "%if" => return Ok(StatementKind::If(parse_condition(rest)?)),
        "%elif" => return Ok(StatementKind::Elif(parse_condition(rest)?)),
        "%else" => {
            return match rest.split_first() {
                None => Ok(StatementKind::Else),
                Some((t, cond)) if t.is_bare("if") => {
                    Ok(StatementKind::Elif(parse_condition(cond)?))
                }
                Some(_) => Err(Error::syntax("'%else' takes no arguments; use '%else if'")),
            };
        }
        "%while" => return Ok(StatementKind::While(parse_condition(rest)?)),
        "%f" => return parse_function_header(rest),
        "write" => return parse_write(rest),
        "input" => return parse_prompt(rest),
        "wait" => {
            return parse_sole_operand(rest)
                .map(StatementKind::Wait)
                .ok_or_else(|| {
                    Error::syntax("invalid wait command format: expected 'wait <seconds>'")
                });
        }
        "clear" if rest.is_empty() => return Ok(StatementKind::Clear(None)),
        "clear" => {
            return parse_sole_operand(rest)
                .map(|delay| StatementKind::Clear(Some(delay)))
                .ok_or_else(|| Error::syntax("invalid clear command: expected 'clear [<seconds>]'"));
        }
        "send" => {
            return match rest {
                [t] if t.is_keyword("%NL%") => Ok(StatementKind::Newline),
                _ => Err(Error::syntax("unknown send target: expected 'send %NL%'")),
            };
        }
        "msg" => return parse_notify(rest),
        "ii" if rest.is_empty() => return Ok(StatementKind::End),
        _ => {}
    }

    if let Some((name, suffix)) = first.split_once('%') {
        return parse_declaration(name, suffix, rest);
    }

    if rest.is_empty() && is_identifier(first) {
        return Ok(StatementKind::Call {
            name: first.to_string(),
        });
    }

    Err(Error::syntax(format!("unrecognized command '{}'", first)))
}

/// `name%alias = x`, `name%type = t`, `name%value = expr`
fn parse_declaration(name: &str, suffix: &str, rest: &[Token]) -> Result<StatementKind> {
    if !is_identifier(name) {
        return Err(Error::syntax(format!("invalid variable name '{}'", name)));
    }
    let rhs = match rest.split_first() {
        Some((eq, rhs)) if eq.is_bare("=") && !rhs.is_empty() => rhs,
        _ => {
            return Err(Error::syntax(format!(
                "expected '{}%{} = <value>'",
                name, suffix
            )))
        }
    };
    let name = name.to_string();

    match suffix {
        "alias" => match rhs {
            [Token::Bare(alias)] if is_identifier(alias) => Ok(StatementKind::AliasDecl {
                name,
                alias: alias.clone(),
            }),
            _ => Err(Error::syntax("an alias must be a single identifier")),
        },
        "type" => match rhs {
            [Token::Bare(t)] => ValueType::from_name(t)
                .map(|ty| StatementKind::TypeDecl { name, ty })
                .ok_or_else(|| Error::syntax(format!("unknown type '{}'", t))),
            _ => Err(Error::syntax("a type must be one of int, dec, text")),
        },
        "value" => Ok(StatementKind::ValueAssign {
            name,
            expr: parse_expr(rhs)?,
        }),
        other => Err(Error::syntax(format!("unknown declaration '%{}'", other))),
    }
}

fn parse_function_header(rest: &[Token]) -> Result<StatementKind> {
    let name = match rest {
        [Token::Bare(word)] => word.strip_suffix(':'),
        [Token::Bare(word), colon] if colon.is_bare(":") => Some(word.as_str()),
        _ => None,
    };
    match name {
        Some(name) if is_identifier(name) => Ok(StatementKind::Function {
            name: name.to_string(),
        }),
        _ => Err(Error::syntax("expected function header '%f <Name>:'")),
    }
}

fn parse_write(rest: &[Token]) -> Result<StatementKind> {
    if rest.is_empty() {
        return Err(Error::syntax("write needs at least one argument"));
    }
    let mut items = Vec::new();
    let mut cursor = rest;
    while !cursor.is_empty() {
        if let Some(color) = cursor[0].as_bare().and_then(Color::from_code) {
            items.push(WriteItem::Color(color));
            cursor = &cursor[1..];
            continue;
        }
        let (operand, used) = parse_operand_prefix(cursor)?;
        items.push(WriteItem::Operand(operand));
        cursor = &cursor[used..];
    }
    Ok(StatementKind::Write(items))
}

fn parse_prompt(rest: &[Token]) -> Result<StatementKind> {
    let (message, used) = parse_operand_prefix(rest)?;
    let ty = match &rest[used..] {
        [] => ValueType::Text,
        [Token::Bare(t)] => ValueType::from_name(t.trim_start_matches('%'))
            .ok_or_else(|| Error::syntax(format!("unknown input type '{}'", t)))?,
        _ => return Err(Error::syntax("expected 'input <message> [int|dec|text]'")),
    };
    Ok(StatementKind::Prompt { message, ty })
}

fn parse_notify(rest: &[Token]) -> Result<StatementKind> {
    let invalid = || Error::syntax("invalid msg syntax: expected 'msg %title <text> %subtitle <text>'");
    let (kw, rest) = rest.split_first().ok_or_else(invalid)?;
    if !kw.is_keyword("%title") {
        return Err(invalid());
    }
    let (title, used) = parse_operand_prefix(rest).map_err(|_| invalid())?;
    let rest = &rest[used..];
    let (kw, rest) = rest.split_first().ok_or_else(invalid)?;
    if !kw.is_keyword("%subtitle") {
        return Err(invalid());
    }
    let (subtitle, used) = parse_operand_prefix(rest).map_err(|_| invalid())?;
    if used != rest.len() {
        return Err(invalid());
    }
    Ok(StatementKind::Notify { title, subtitle })
}

// ---------------------------------------------------------------------------
// Operands, expressions and conditions
// ---------------------------------------------------------------------------

/// Read one operand from the front of `tokens`.
/// Returns the operand and how many tokens it used.
pub fn parse_operand_prefix(tokens: &[Token]) -> Result<(Operand, usize)> {
    match tokens {
        [Token::Quoted(s), ..] => Ok((Operand::Literal(Value::Text(s.clone())), 1)),
        [Token::Bare(kw), Token::Bare(name), ..] if kw == "%var" => {
            if is_identifier(name) {
                Ok((Operand::Variable(name.clone()), 2))
            } else {
                Err(Error::syntax(format!("invalid variable name '{}'", name)))
            }
        }
        [Token::Bare(kw), ..] if kw == "%var" => {
            Err(Error::syntax("'%var' must be followed by a variable name"))
        }
        [Token::Bare(word), ..] => parse_word_operand(word).map(|op| (op, 1)),
        [] => Err(Error::syntax("missing operand")),
    }
}

fn parse_word_operand(word: &str) -> Result<Operand> {
    if let Some(number) = Value::parse_number(word) {
        return Ok(Operand::Literal(number));
    }
    if word == "%1" {
        return Ok(Operand::LastInput);
    }
    if is_identifier(word) {
        return Ok(Operand::Variable(word.to_string()));
    }
    Err(Error::syntax(format!(
        "'{}' is not a value; text must be quoted",
        word
    )))
}

/// The operand when `tokens` hold exactly one and nothing else.
fn parse_sole_operand(tokens: &[Token]) -> Option<Operand> {
    match parse_operand_prefix(tokens) {
        Ok((operand, used)) if used == tokens.len() => Some(operand),
        _ => None,
    }
}

/// `operand` or `operand op operand`.
pub fn parse_expr(tokens: &[Token]) -> Result<Expr> {
    let (lhs, used) = parse_operand_prefix(tokens)?;
    let rest = &tokens[used..];
    if rest.is_empty() {
        return Ok(Expr::Operand(lhs));
    }
    let op = rest[0]
        .as_bare()
        .and_then(ArithOp::from_symbol)
        .ok_or_else(|| Error::syntax("expected an arithmetic operator (+ - * /)"))?;
    let (rhs, used) = parse_operand_prefix(&rest[1..])?;
    if used != rest.len() - 1 {
        return Err(Error::syntax(
            "only one arithmetic operation is allowed per assignment",
        ));
    }
    Ok(Expr::Binary { lhs, op, rhs })
}

/// `operand relop operand`.
pub fn parse_condition(tokens: &[Token]) -> Result<Condition> {
    if tokens.is_empty() {
        return Err(Error::syntax("missing condition"));
    }
    let (lhs, used) = parse_operand_prefix(tokens)?;
    let rest = &tokens[used..];
    let op = rest
        .first()
        .and_then(Token::as_bare)
        .and_then(RelOp::from_symbol)
        .ok_or_else(|| Error::syntax("expected a comparison operator (= X= > < >= <= ~ ~=)"))?;
    let (rhs, used) = parse_operand_prefix(&rest[1..])?;
    if used != rest.len() - 1 {
        return Err(Error::syntax("unexpected tokens after condition"));
    }
    Ok(Condition { lhs, op, rhs })
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(src: &str) -> StatementKind {
        parse(src).unwrap().statements.remove(0).kind
    }

    fn var(name: &str) -> Operand {
        Operand::Variable(name.to_string())
    }

    #[test]
    fn declarations() {
        assert_eq!(
            kind("counter%alias = nums"),
            StatementKind::AliasDecl {
                name: "counter".into(),
                alias: "nums".into()
            }
        );
        assert_eq!(
            kind("counter%type = int"),
            StatementKind::TypeDecl {
                name: "counter".into(),
                ty: ValueType::Integer
            }
        );
        assert_eq!(
            kind("counter%value = counter + 1"),
            StatementKind::ValueAssign {
                name: "counter".into(),
                expr: Expr::Binary {
                    lhs: var("counter"),
                    op: ArithOp::Add,
                    rhs: Operand::Literal(Value::Integer(1)),
                }
            }
        );
    }

    #[test]
    fn var_keyword_and_bare_names_are_the_same_reference() {
        assert_eq!(
            kind("x%value = %var y"),
            StatementKind::ValueAssign {
                name: "x".into(),
                expr: Expr::Operand(var("y"))
            }
        );
        assert_eq!(kind("x%value = y"), kind("x%value = %var y"));
    }

    #[test]
    fn else_if_is_an_elif() {
        let expected = StatementKind::Elif(Condition {
            lhs: var("a"),
            op: RelOp::Contains,
            rhs: var("b"),
        });
        assert_eq!(kind("%else if a ~ b"), expected);
        assert_eq!(kind("%elif a ~ b"), expected);
        assert_eq!(kind("%else"), StatementKind::Else);
    }

    #[test]
    fn function_header_and_call() {
        assert_eq!(
            kind("%f Greet:"),
            StatementKind::Function {
                name: "Greet".into()
            }
        );
        assert_eq!(
            kind("Greet"),
            StatementKind::Call {
                name: "Greet".into()
            }
        );
        assert!(parse("%f Greet").is_err());
    }

    #[test]
    fn write_items_mix_colors_and_operands() {
        assert_eq!(
            kind(r#"write %RedText "hi " %1 %reset %var name"#),
            StatementKind::Write(vec![
                WriteItem::Color(Some(Color::Red)),
                WriteItem::Operand(Operand::Literal(Value::Text("hi ".into()))),
                WriteItem::Operand(Operand::LastInput),
                WriteItem::Color(None),
                WriteItem::Operand(var("name")),
            ])
        );
    }

    #[test]
    fn system_commands() {
        assert_eq!(kind("send %NL%"), StatementKind::Newline);
        assert_eq!(
            kind("wait 1.5"),
            StatementKind::Wait(Operand::Literal(Value::Decimal(1.5)))
        );
        assert_eq!(kind("wait %var pause"), StatementKind::Wait(var("pause")));
        assert_eq!(kind("clear"), StatementKind::Clear(None));
        assert_eq!(
            kind("clear %var pause"),
            StatementKind::Clear(Some(var("pause")))
        );
        assert_eq!(
            kind(r#"msg %Title "Done" %SUBTITLE "All good""#),
            StatementKind::Notify {
                title: Operand::Literal(Value::Text("Done".into())),
                subtitle: Operand::Literal(Value::Text("All good".into())),
            }
        );
        assert_eq!(kind("ii"), StatementKind::End);
        assert_eq!(
            kind(r#"input "Age?" int"#),
            StatementKind::Prompt {
                message: Operand::Literal(Value::Text("Age?".into())),
                ty: ValueType::Integer
            }
        );
    }

    #[test]
    fn malformed_lines_are_syntax_errors() {
        for src in [
            "wait",
            "wait 1 2",
            "wait %var",
            "clear %var d 2",
            "write hello world!",
            "\"floating\"",
            "x%value = 1 + 2 + 3",
            "x%value =",
            "x%colour = 1",
            "x%type = float",
            "%if a",
            "%if a == b",
            "send %CR%",
            "msg %title \"a\"",
            "do something",
        ] {
            let err = parse(src).unwrap_err();
            assert!(matches!(err.error, Error::Syntax(_)), "{src:?} gave {err:?}");
        }
    }

    #[test]
    fn syntax_errors_carry_the_line_and_its_text() {
        let err = parse("write \"ok\"\n\n  bogus line").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.text, "bogus line");
        assert!(err.to_string().contains("(Ln 3: `bogus line`)"), "{err}");
    }
}
