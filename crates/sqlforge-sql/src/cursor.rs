//! Cursor position queries for editor integrations
//!
//! [`scope_at`] answers "what is at this position": the token under the
//! cursor plus the CTE names visible there. The scan works on the token
//! stream, where the spans live, rather than on the AST -- it tolerates SQL
//! that is still being typed and does not require a successful parse beyond
//! tokenization.
//!
//! Visibility follows WITH semantics: a non-recursive CTE is visible from
//! the end of its body to the end of the enclosing statement (or enclosing
//! subquery for a nested WITH); under `WITH RECURSIVE` the name is visible
//! from its declaration, including inside its own body.

use crate::error::Result;
use crate::tokens::{token_at_offset, tokenize, Token, TokenType};

/// What surrounds a cursor offset.
#[derive(Debug, Clone)]
pub struct CursorScope {
    /// The token covering the offset, if the offset is on one.
    pub token: Option<Token>,
    /// CTE names visible at the offset, in declaration order.
    pub visible_ctes: Vec<String>,
}

struct CteEntry {
    name: String,
    /// Character offset from which the name is visible.
    visible_from: usize,
    /// Character offset at which visibility ends.
    visible_until: usize,
    /// Paren depth of the WITH keyword that declared it.
    depth: usize,
}

/// Tokenize `sql` and report the token and visible CTE names at the given
/// character offset.
pub fn scope_at(sql: &str, offset: usize) -> Result<CursorScope> {
    let tokens = tokenize(sql)?;
    let end = sql.chars().count();

    let mut entries: Vec<CteEntry> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.token_type {
            TokenType::LParen => depth += 1,
            TokenType::RParen => {
                depth = depth.saturating_sub(1);
                // A nested WITH's names die with the subquery that holds it.
                for idx in std::mem::take(&mut open) {
                    if entries[idx].depth > depth {
                        entries[idx].visible_until = token.span.start;
                    } else {
                        open.push(idx);
                    }
                }
            }
            TokenType::Semicolon if depth == 0 => {
                for idx in open.drain(..) {
                    entries[idx].visible_until = token.span.start;
                }
            }
            TokenType::With => {
                for idx in scan_with_names(&tokens, i, depth, &mut entries) {
                    open.push(idx);
                }
            }
            _ => {}
        }
    }
    for idx in open {
        entries[idx].visible_until = end;
    }

    let visible_ctes = entries
        .iter()
        .filter(|entry| entry.visible_from <= offset && offset < entry.visible_until)
        .map(|entry| entry.name.clone())
        .collect();

    Ok(CursorScope {
        token: token_at_offset(&tokens, offset).cloned(),
        visible_ctes,
    })
}

/// Walk the CTE list of the WITH clause at `with_idx` and record one entry
/// per `name [(cols)] AS [[NOT] MATERIALIZED] (body)` head. Bodies are not
/// consumed by the caller's scan, so nested WITH clauses are picked up by
/// the main loop on its own pass over the same tokens.
fn scan_with_names(
    tokens: &[Token],
    with_idx: usize,
    depth: usize,
    entries: &mut Vec<CteEntry>,
) -> Vec<usize> {
    let mut recorded = Vec::new();
    let mut j = with_idx + 1;
    let recursive = matches!(kind(tokens, j), Some(TokenType::Recursive));
    if recursive {
        j += 1;
    }

    loop {
        let name = match kind(tokens, j) {
            Some(TokenType::Identifier) | Some(TokenType::QuotedIdentifier) => &tokens[j],
            _ => break,
        };
        let name_end = name.span.end;
        let name_text = name.text.clone();
        j += 1;

        if matches!(kind(tokens, j), Some(TokenType::LParen)) {
            j = match skip_balanced(tokens, j) {
                Some(after) => after,
                None => break,
            };
        }
        if !matches!(kind(tokens, j), Some(TokenType::As)) {
            break;
        }
        j += 1;
        if matches!(kind(tokens, j), Some(TokenType::Not))
            && matches!(kind(tokens, j + 1), Some(TokenType::Materialized))
        {
            j += 2;
        } else if matches!(kind(tokens, j), Some(TokenType::Materialized)) {
            j += 1;
        }
        if !matches!(kind(tokens, j), Some(TokenType::LParen)) {
            break;
        }
        let body_end = match skip_balanced(tokens, j) {
            Some(after) => after,
            None => break,
        };

        let visible_from = if recursive {
            name_end
        } else {
            tokens[body_end - 1].span.end
        };
        recorded.push(entries.len());
        entries.push(CteEntry {
            name: name_text,
            visible_from,
            visible_until: usize::MAX,
            depth,
        });

        j = body_end;
        if matches!(kind(tokens, j), Some(TokenType::Comma)) {
            j += 1;
        } else {
            break;
        }
    }
    recorded
}

fn kind(tokens: &[Token], idx: usize) -> Option<TokenType> {
    tokens.get(idx).map(|t| t.token_type)
}

/// Index just past the `)` matching the `(` at `open_idx`, or `None` when
/// the input ends first.
fn skip_balanced(tokens: &[Token], open_idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open_idx) {
        match token.token_type {
            TokenType::LParen => depth += 1,
            TokenType::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            TokenType::Eof => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQL: &str = "WITH a AS (SELECT 1), b AS (SELECT * FROM a) SELECT * FROM b";

    fn ctes_at(sql: &str, offset: usize) -> Vec<String> {
        scope_at(sql, offset).expect("scope query failed").visible_ctes
    }

    #[test]
    fn final_select_sees_all_ctes() {
        let offset = SQL.find("SELECT * FROM b").unwrap();
        assert_eq!(ctes_at(SQL, offset), vec!["a", "b"]);
    }

    #[test]
    fn later_cte_body_sees_earlier_siblings() {
        let offset = SQL.find("FROM a").unwrap();
        assert_eq!(ctes_at(SQL, offset), vec!["a"]);
    }

    #[test]
    fn first_cte_body_sees_nothing() {
        let offset = SQL.find("SELECT 1").unwrap();
        assert_eq!(ctes_at(SQL, offset), Vec::<String>::new());
    }

    #[test]
    fn recursive_cte_sees_itself() {
        let sql = "WITH RECURSIVE t AS (SELECT n + 1 FROM t) SELECT * FROM t";
        let offset = sql.find("FROM t)").unwrap();
        assert_eq!(ctes_at(sql, offset), vec!["t"]);
    }

    #[test]
    fn visibility_ends_at_statement_boundary() {
        let sql = "WITH a AS (SELECT 1) SELECT * FROM a; SELECT * FROM b";
        let offset = sql.find("FROM b").unwrap();
        assert_eq!(ctes_at(sql, offset), Vec::<String>::new());
    }

    #[test]
    fn nested_with_is_scoped_to_its_subquery() {
        let sql = "SELECT * FROM (WITH x AS (SELECT 1) SELECT * FROM x) s WHERE s.v > 0";
        let inner = sql.find("FROM x").unwrap();
        assert_eq!(ctes_at(sql, inner), vec!["x"]);
        let outer = sql.find("WHERE").unwrap();
        assert_eq!(ctes_at(sql, outer), Vec::<String>::new());
    }

    #[test]
    fn reports_the_token_under_the_cursor() {
        let offset = SQL.find('b').unwrap();
        let scope = scope_at(SQL, offset).unwrap();
        assert_eq!(scope.token.unwrap().text, "b");
    }
}
