//! Type expression parser.
//!
//! Accepts the usual subscript syntax: `int`, `Optional[List['Node']]`,
//! `Dict[str, Item]`, `int | None`. Names of declared types resolve to their
//! handles; quoted names are forward references and may be declared later in
//! the same registry.

use super::LoadError;
use crate::ir::{Type, TypeRegistry};

/// Parse a type expression, resolving declared names against `registry`.
pub fn parse_type_expr(registry: &TypeRegistry, expr: &str) -> Result<Type, LoadError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        registry,
        expr,
        tokens,
        pos: 0,
    };
    let ty = parser.parse_union()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!("unexpected {}", token.describe())));
    }
    Ok(ty)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Quoted(&'a str),
    LBracket,
    RBracket,
    Comma,
    Pipe,
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("`{name}`"),
            Token::Quoted(inner) => format!("'{inner}'"),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Comma => "`,`".into(),
            Token::Pipe => "`|`".into(),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token<'_>>, LoadError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '[' => tokens.push(Token::LBracket),
            ']' => tokens.push(Token::RBracket),
            ',' => tokens.push(Token::Comma),
            '|' => tokens.push(Token::Pipe),
            '\'' | '"' => {
                let end = expr[start + 1..]
                    .find(c)
                    .map(|offset| start + 1 + offset)
                    .ok_or_else(|| LoadError::TypeExpr {
                        expr: expr.to_string(),
                        reason: "unterminated quoted name".into(),
                    })?;
                tokens.push(Token::Quoted(&expr[start + 1..end]));
                while chars.next_if(|&(i, _)| i <= end).is_some() {}
            }
            c if is_ident_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some((i, next)) = chars.next_if(|&(_, n)| is_ident_char(n)) {
                    end = i + next.len_utf8();
                }
                tokens.push(Token::Ident(&expr[start..end]));
            }
            other => {
                return Err(LoadError::TypeExpr {
                    expr: expr.to_string(),
                    reason: format!("unexpected character `{other}`"),
                });
            }
        }
    }
    Ok(tokens)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

struct Parser<'a> {
    registry: &'a TypeRegistry,
    expr: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: String) -> LoadError {
        LoadError::TypeExpr {
            expr: self.expr.to_string(),
            reason,
        }
    }

    fn parse_union(&mut self) -> Result<Type, LoadError> {
        let mut members = vec![self.parse_primary()?];
        while self.eat(Token::Pipe) {
            members.push(self.parse_primary()?);
        }
        Ok(Type::union(members))
    }

    fn parse_primary(&mut self) -> Result<Type, LoadError> {
        match self.next() {
            Some(Token::Quoted(inner)) => parse_type_expr(self.registry, inner),
            Some(Token::Ident(name)) => {
                let args = if self.eat(Token::LBracket) {
                    let args = self.parse_args()?;
                    if !self.eat(Token::RBracket) {
                        return Err(self.error(format!("missing `]` after `{name}[`")));
                    }
                    Some(args)
                } else {
                    None
                };
                self.resolve(name, args)
            }
            Some(token) => Err(self.error(format!("expected a type, found {}", token.describe()))),
            None => Err(self.error("expected a type".into())),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Type>, LoadError> {
        let mut args = Vec::new();
        if self.peek() == Some(Token::RBracket) {
            return Ok(args);
        }
        args.push(self.parse_union()?);
        while self.eat(Token::Comma) {
            args.push(self.parse_union()?);
        }
        Ok(args)
    }

    fn resolve(&self, name: &str, args: Option<Vec<Type>>) -> Result<Type, LoadError> {
        let bare = name.strip_prefix("typing.").unwrap_or(name);
        let ty = match (bare, args) {
            ("int", None) => Type::int(),
            ("float", None) => Type::float(),
            ("str", None) => Type::str(),
            ("bool", None) => Type::bool(),
            ("bytes", None) => Type::bytes(),
            ("Any", None) => Type::any(),
            ("None" | "NoneType", None) => Type::None,

            // Bare `list` and `dict` are the built-in classes themselves, with
            // no element types to go on.
            ("list" | "dict", None) => Type::builtin(bare),
            ("List" | "Sequence", None) => Type::list(Type::any()),
            ("List" | "list" | "Sequence", Some(mut args)) => match args.len() {
                1 => Type::list(args.remove(0)),
                n => return Err(self.arity(bare, 1, n)),
            },

            ("Dict" | "Mapping", None) => Type::Dict(None),
            ("Dict" | "dict" | "Mapping", Some(args)) => match <[Type; 2]>::try_from(args) {
                Ok([key, value]) => Type::dict(key, value),
                Err(args) if args.is_empty() => Type::Dict(None),
                Err(args) => return Err(self.arity(bare, 2, args.len())),
            },

            ("Optional", Some(mut args)) => match args.len() {
                1 => Type::optional(args.remove(0)),
                n => return Err(self.arity(bare, 1, n)),
            },
            ("Union", Some(args)) if !args.is_empty() => Type::union(args),
            ("Optional" | "Union", _) => {
                return Err(self.error(format!("`{bare}` requires type parameters")));
            }

            (_, args) => return self.resolve_name(name, args),
        };
        Ok(ty)
    }

    /// Declared types by name, or a built-in when nothing is declared.
    fn resolve_name(&self, name: &str, args: Option<Vec<Type>>) -> Result<Type, LoadError> {
        match (self.registry.lookup(name), args) {
            (Some(id), None) => Ok(Type::Named(id)),
            (Some(_), Some(_)) => Err(self.error(format!("`{name}` does not take type parameters"))),
            // Other generics (`Tuple[int, str]`, `set[int]`) have no wire form.
            (None, Some(_)) => Ok(Type::builtin(name.strip_prefix("typing.").unwrap_or(name))),
            (None, None) if looks_builtin(name) => Ok(Type::builtin(name)),
            (None, None) => Err(self.error(format!("unknown type `{name}`"))),
        }
    }

    fn arity(&self, name: &str, expected: usize, found: usize) -> LoadError {
        self.error(format!(
            "`{name}` takes {expected} type parameter(s), found {found}"
        ))
    }
}

/// Lowercase and dotted names denote built-ins without a declaration.
fn looks_builtin(name: &str) -> bool {
    name.contains('.') || name.starts_with(|c: char| c.is_lowercase())
}
