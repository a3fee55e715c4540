//! Value-expression parsing
//!
//! Precedence climbing over a PostgreSQL-derived operator table. Unary
//! prefix operators bind tighter than binary infix operators; all binary
//! operators are left-associative except `^`. Operator tokens the parser
//! does not model are retained verbatim as [`BinaryOperator::Raw`] at the
//! "any other operator" precedence level, so dialect extensions degrade
//! gracefully instead of failing the parse.

use crate::error::Result;
use crate::expressions::{
    BetweenExpression, BinaryOperator, CaseBranch, CaseExpression, CastExpression,
    ColumnReference, ExistsExpression, ExtractExpression, FrameBound, FrameUnit, FunctionCall,
    Identifier, InExpression, InList, LikeExpression, LikeOperator, LiteralValue, OverClause,
    Parameter, QualifiedName, RawString, StarExpr, TypeName, TypedLiteral, UnaryExpression,
    UnaryOperator, ValueExpr, WindowFrame, WindowSpec,
};
use crate::tokens::TokenType;

use super::Parser;

// Precedence levels, low to high. See DESIGN.md for the derivation.
const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_NOT: u8 = 3;
const PREC_IS: u8 = 4;
const PREC_CMP: u8 = 5;
const PREC_BETWEEN: u8 = 6;
const PREC_OTHER: u8 = 7;
const PREC_ADD: u8 = 8;
const PREC_MUL: u8 = 9;
const PREC_EXP: u8 = 10;
const PREC_UNARY: u8 = 11;
const PREC_CAST: u8 = 12;

impl Parser {
    /// Parse a full value expression.
    pub fn parse_expression(&mut self) -> Result<ValueExpr> {
        self.parse_expr_prec(0)
    }

    pub(crate) fn parse_expr_prec(&mut self, min_prec: u8) -> Result<ValueExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let tt = self.peek_type();

            // Postfix cast binds tightest.
            if tt == TokenType::DColon {
                if PREC_CAST < min_prec {
                    break;
                }
                self.advance();
                let target_type = self.parse_type_name()?;
                left = ValueExpr::Cast(Box::new(CastExpression {
                    operand: left,
                    target_type,
                    postfix: true,
                }));
                continue;
            }

            // IS family (includes the ISNULL / NOTNULL postfix keywords).
            if matches!(tt, TokenType::Is | TokenType::IsNull | TokenType::NotNull) {
                if PREC_IS < min_prec {
                    break;
                }
                left = self.parse_is(left)?;
                continue;
            }

            // [NOT] BETWEEN / IN / LIKE / ILIKE / SIMILAR TO
            let negated_lookahead = tt == TokenType::Not
                && matches!(
                    self.peek_ahead_type(1),
                    TokenType::Between
                        | TokenType::In
                        | TokenType::Like
                        | TokenType::ILike
                        | TokenType::Similar
                );
            if negated_lookahead
                || matches!(
                    tt,
                    TokenType::Between
                        | TokenType::In
                        | TokenType::Like
                        | TokenType::ILike
                        | TokenType::Similar
                )
            {
                if PREC_BETWEEN < min_prec {
                    break;
                }
                let negated = negated_lookahead;
                if negated {
                    self.advance(); // NOT
                }
                left = self.parse_negatable(left, negated)?;
                continue;
            }

            let Some((operator, prec, right_assoc)) = self.peek_binary_operator() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_expr_prec(next_min)?;
            left = ValueExpr::binary(left, operator, right);
        }

        Ok(left)
    }

    /// The binary operator starting at the cursor, with its precedence and
    /// associativity. Returns `None` when the cursor is not on an infix
    /// operator.
    fn peek_binary_operator(&self) -> Option<(BinaryOperator, u8, bool)> {
        let op = match self.peek_type() {
            TokenType::Or => (BinaryOperator::Or, PREC_OR, false),
            TokenType::And => (BinaryOperator::And, PREC_AND, false),
            TokenType::Eq => (BinaryOperator::Eq, PREC_CMP, false),
            TokenType::Neq => (BinaryOperator::Neq, PREC_CMP, false),
            TokenType::Lt => (BinaryOperator::Lt, PREC_CMP, false),
            TokenType::Lte => (BinaryOperator::Lte, PREC_CMP, false),
            TokenType::Gt => (BinaryOperator::Gt, PREC_CMP, false),
            TokenType::Gte => (BinaryOperator::Gte, PREC_CMP, false),
            TokenType::Plus => (BinaryOperator::Add, PREC_ADD, false),
            TokenType::Minus => (BinaryOperator::Sub, PREC_ADD, false),
            TokenType::Star => (BinaryOperator::Mul, PREC_MUL, false),
            TokenType::Slash => (BinaryOperator::Div, PREC_MUL, false),
            TokenType::Percent => (BinaryOperator::Mod, PREC_MUL, false),
            TokenType::Caret => (BinaryOperator::Exp, PREC_EXP, true),
            TokenType::Concat => (BinaryOperator::Concat, PREC_OTHER, false),
            // Unmodeled operators keep their text and sit at the
            // "any other operator" level.
            TokenType::Arrow
            | TokenType::DArrow
            | TokenType::HashArrow
            | TokenType::DHashArrow
            | TokenType::AtGt
            | TokenType::LtAt
            | TokenType::Tilde
            | TokenType::TildeStar
            | TokenType::NotTilde
            | TokenType::NotTildeStar
            | TokenType::Amp
            | TokenType::Pipe
            | TokenType::LtLt
            | TokenType::GtGt
            | TokenType::CustomOperator => (
                BinaryOperator::Raw(self.peek().text.clone()),
                PREC_OTHER,
                false,
            ),
            _ => return None,
        };
        Some(op)
    }

    fn parse_is(&mut self, left: ValueExpr) -> Result<ValueExpr> {
        match self.peek_type() {
            TokenType::IsNull => {
                self.advance();
                return Ok(ValueExpr::binary(
                    left,
                    BinaryOperator::Is,
                    ValueExpr::null(),
                ));
            }
            TokenType::NotNull => {
                self.advance();
                return Ok(ValueExpr::binary(
                    left,
                    BinaryOperator::IsNot,
                    ValueExpr::null(),
                ));
            }
            _ => {}
        }

        self.advance(); // IS
        let negated = self.match_token(TokenType::Not);
        match self.peek_type() {
            TokenType::Null => {
                self.advance();
                let op = if negated {
                    BinaryOperator::IsNot
                } else {
                    BinaryOperator::Is
                };
                Ok(ValueExpr::binary(left, op, ValueExpr::null()))
            }
            TokenType::True | TokenType::False => {
                let value = self.advance().token_type == TokenType::True;
                let op = if negated {
                    BinaryOperator::IsNot
                } else {
                    BinaryOperator::Is
                };
                Ok(ValueExpr::binary(
                    left,
                    op,
                    ValueExpr::Literal(LiteralValue::Boolean(value)),
                ))
            }
            TokenType::Distinct => {
                self.advance();
                self.expect(TokenType::From, "FROM after IS [NOT] DISTINCT")?;
                let op = if negated {
                    BinaryOperator::IsNotDistinctFrom
                } else {
                    BinaryOperator::IsDistinctFrom
                };
                let right = self.parse_expr_prec(PREC_IS + 1)?;
                Ok(ValueExpr::binary(left, op, right))
            }
            _ => Err(self.error_here(format!(
                "expected NULL, TRUE, FALSE, or DISTINCT FROM after IS, found '{}'",
                self.peek().text
            ))),
        }
    }

    fn parse_negatable(&mut self, left: ValueExpr, negated: bool) -> Result<ValueExpr> {
        match self.peek_type() {
            TokenType::Between => {
                self.advance();
                let low = self.parse_expr_prec(PREC_BETWEEN + 1)?;
                self.expect(TokenType::And, "AND in BETWEEN")?;
                let high = self.parse_expr_prec(PREC_BETWEEN + 1)?;
                Ok(ValueExpr::Between(Box::new(BetweenExpression {
                    operand: left,
                    negated,
                    low,
                    high,
                })))
            }
            TokenType::In => {
                self.advance();
                self.expect(TokenType::LParen, "'(' after IN")?;
                let list = if matches!(
                    self.peek_type(),
                    TokenType::Select | TokenType::With | TokenType::Values
                ) {
                    let query = self.parse_select_query()?;
                    InList::Subquery(Box::new(query))
                } else {
                    let mut values = vec![self.parse_expression()?];
                    while self.match_token(TokenType::Comma) {
                        values.push(self.parse_expression()?);
                    }
                    InList::Values(values)
                };
                self.expect(TokenType::RParen, "')' closing IN list")?;
                Ok(ValueExpr::In(Box::new(InExpression {
                    operand: left,
                    negated,
                    list,
                })))
            }
            TokenType::Like | TokenType::ILike | TokenType::Similar => {
                let operator = match self.advance().token_type {
                    TokenType::Like => LikeOperator::Like,
                    TokenType::ILike => LikeOperator::ILike,
                    _ => {
                        if !self.match_soft_keyword("TO") {
                            return Err(self.error_here("expected TO after SIMILAR"));
                        }
                        LikeOperator::SimilarTo
                    }
                };
                let pattern = self.parse_expr_prec(PREC_BETWEEN + 1)?;
                let escape = if self.match_token(TokenType::Escape) {
                    Some(self.parse_expr_prec(PREC_BETWEEN + 1)?)
                } else {
                    None
                };
                Ok(ValueExpr::Like(Box::new(LikeExpression {
                    operand: left,
                    negated,
                    operator,
                    pattern,
                    escape,
                })))
            }
            _ => Err(self.error_here("expected BETWEEN, IN, LIKE, ILIKE, or SIMILAR")),
        }
    }

    fn parse_unary(&mut self) -> Result<ValueExpr> {
        let operator = match self.peek_type() {
            TokenType::Not => Some((UnaryOperator::Not, PREC_NOT)),
            TokenType::Minus => Some((UnaryOperator::Minus, PREC_UNARY)),
            TokenType::Plus => Some((UnaryOperator::Plus, PREC_UNARY)),
            TokenType::Tilde => Some((UnaryOperator::BitwiseNot, PREC_UNARY)),
            _ => None,
        };
        if let Some((operator, prec)) = operator {
            self.advance();
            let operand = self.parse_expr_prec(prec)?;
            return Ok(ValueExpr::Unary(Box::new(UnaryExpression {
                operator,
                operand,
            })));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ValueExpr> {
        match self.peek_type() {
            TokenType::Number => Ok(ValueExpr::Literal(LiteralValue::Number(self.advance().text))),
            TokenType::String => Ok(ValueExpr::Literal(LiteralValue::String(self.advance().text))),
            TokenType::True => {
                self.advance();
                Ok(ValueExpr::Literal(LiteralValue::Boolean(true)))
            }
            TokenType::False => {
                self.advance();
                Ok(ValueExpr::Literal(LiteralValue::Boolean(false)))
            }
            TokenType::Null => {
                self.advance();
                Ok(ValueExpr::null())
            }
            // Exotic literal forms are retained verbatim.
            TokenType::EscapeString
            | TokenType::BitString
            | TokenType::HexString
            | TokenType::DollarString => Ok(ValueExpr::Raw(RawString::new(self.advance().text))),
            TokenType::Date | TokenType::Time | TokenType::Timestamp | TokenType::Interval => {
                if self.peek_ahead_type(1) == TokenType::String {
                    let type_name = self.advance().text;
                    let value = self.advance().text;
                    Ok(ValueExpr::TypedLiteral(TypedLiteral { type_name, value }))
                } else {
                    // Bare use of an unreserved type word is a column
                    // reference (`SELECT date FROM t`).
                    self.parse_name_expression()
                }
            }
            TokenType::Case => self.parse_case(),
            TokenType::Cast => self.parse_cast_call(),
            TokenType::Extract => self.parse_extract(),
            TokenType::Exists => {
                self.advance();
                self.expect(TokenType::LParen, "'(' after EXISTS")?;
                let query = self.parse_select_query()?;
                self.expect(TokenType::RParen, "')' closing EXISTS")?;
                Ok(ValueExpr::Exists(Box::new(ExistsExpression {
                    negated: false,
                    query,
                })))
            }
            TokenType::Array => {
                self.advance();
                self.expect(TokenType::LBracket, "'[' after ARRAY")?;
                let mut elements = Vec::new();
                if !self.check(TokenType::RBracket) {
                    elements.push(self.parse_expression()?);
                    while self.match_token(TokenType::Comma) {
                        elements.push(self.parse_expression()?);
                    }
                }
                self.expect(TokenType::RBracket, "']' closing ARRAY")?;
                Ok(ValueExpr::Array(elements))
            }
            TokenType::Star => {
                self.advance();
                Ok(ValueExpr::Star(StarExpr { qualifier: None }))
            }
            TokenType::LParen => self.parse_paren(),
            TokenType::Placeholder => {
                self.advance();
                Ok(ValueExpr::Parameter(Parameter {
                    name: None,
                    ordinal: None,
                }))
            }
            TokenType::DollarParameter => {
                let token = self.advance();
                let ordinal = token.text.parse::<u32>().map_err(|_| {
                    self.error_here(format!("invalid parameter ordinal '${}'", token.text))
                })?;
                Ok(ValueExpr::Parameter(Parameter {
                    name: None,
                    ordinal: Some(ordinal),
                }))
            }
            TokenType::NamedParameter => {
                let token = self.advance();
                Ok(ValueExpr::Parameter(Parameter {
                    name: Some(token.text),
                    ordinal: None,
                }))
            }
            TokenType::Identifier | TokenType::QuotedIdentifier => self.parse_name_expression(),
            // LEFT/RIGHT are reserved join words but also built-in functions.
            TokenType::Left | TokenType::Right if self.peek_ahead_type(1) == TokenType::LParen => {
                self.parse_name_expression()
            }
            tt if tt.is_operator() => Err(self.error_here(format!(
                "operator '{}' in operand position",
                self.peek().text
            ))),
            TokenType::Eof => Err(self.error_here("unexpected end of input, expected expression")),
            _ => Err(self.error_here(format!(
                "expected expression, found '{}'",
                self.peek().text
            ))),
        }
    }

    /// Parse an identifier-led expression: a qualified column reference, a
    /// qualified wildcard, or a function call.
    fn parse_name_expression(&mut self) -> Result<ValueExpr> {
        let first = self.advance();
        let mut parts = vec![match first.token_type {
            TokenType::QuotedIdentifier => Identifier::quoted(first.text),
            _ => Identifier::new(first.text),
        }];

        loop {
            if !self.check(TokenType::Dot) {
                break;
            }
            match self.peek_ahead_type(1) {
                TokenType::Identifier => {
                    self.advance();
                    parts.push(Identifier::new(self.advance().text));
                }
                TokenType::QuotedIdentifier => {
                    self.advance();
                    parts.push(Identifier::quoted(self.advance().text));
                }
                TokenType::Star => {
                    self.advance(); // .
                    self.advance(); // *
                    return Ok(ValueExpr::Star(StarExpr {
                        qualifier: Some(QualifiedName::new(parts)),
                    }));
                }
                _ => {
                    return Err(self.error_here(format!(
                        "expected identifier or '*' after '.', found '{}'",
                        self.peek_ahead(1).text
                    )))
                }
            }
        }

        let name = QualifiedName::new(parts);
        if self.check(TokenType::LParen) {
            let call = self.parse_function_call(name)?;
            Ok(ValueExpr::Function(Box::new(call)))
        } else {
            Ok(ValueExpr::Column(ColumnReference { name }))
        }
    }

    /// Parse a function call. The cursor is on `(`.
    pub(crate) fn parse_function_call(&mut self, name: QualifiedName) -> Result<FunctionCall> {
        self.expect(TokenType::LParen, "'('")?;
        let mut call = FunctionCall::new(name, Vec::new());

        if self.check(TokenType::Star) && self.peek_ahead_type(1) == TokenType::RParen {
            self.advance();
            call.wildcard = true;
        } else if !self.check(TokenType::RParen) {
            call.distinct = self.match_token(TokenType::Distinct);
            call.args.push(self.parse_expression()?);
            while self.match_token(TokenType::Comma) {
                call.args.push(self.parse_expression()?);
            }
            if self.check(TokenType::Order) {
                call.order_by = Some(self.parse_order_by_clause()?);
            }
        }
        self.expect(TokenType::RParen, "')' closing function call")?;

        // Window function detection: a following OVER turns the call into a
        // window function.
        if self.match_token(TokenType::Over) {
            call.over = Some(self.parse_over_clause()?);
        }
        Ok(call)
    }

    fn parse_over_clause(&mut self) -> Result<OverClause> {
        if self.match_token(TokenType::LParen) {
            let spec = self.parse_window_spec()?;
            self.expect(TokenType::RParen, "')' closing window specification")?;
            Ok(OverClause::Spec(spec))
        } else {
            let name = self.parse_identifier("window name after OVER")?;
            Ok(OverClause::WindowName(name))
        }
    }

    /// Parse the inside of a window specification (after `(`).
    pub(crate) fn parse_window_spec(&mut self) -> Result<WindowSpec> {
        let mut spec = WindowSpec {
            base_window: None,
            partition_by: Vec::new(),
            order_by: None,
            frame: None,
        };

        if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            spec.base_window = Some(self.parse_identifier("window name")?);
        }
        if self.match_token(TokenType::Partition) {
            self.expect(TokenType::By, "BY after PARTITION")?;
            spec.partition_by.push(self.parse_expression()?);
            while self.match_token(TokenType::Comma) {
                spec.partition_by.push(self.parse_expression()?);
            }
        }
        if self.check(TokenType::Order) {
            spec.order_by = Some(self.parse_order_by_clause()?);
        }
        if matches!(
            self.peek_type(),
            TokenType::Rows | TokenType::Range | TokenType::Groups
        ) {
            spec.frame = Some(self.parse_window_frame()?);
        }
        Ok(spec)
    }

    fn parse_window_frame(&mut self) -> Result<WindowFrame> {
        let unit = match self.advance().token_type {
            TokenType::Rows => FrameUnit::Rows,
            TokenType::Range => FrameUnit::Range,
            _ => FrameUnit::Groups,
        };
        if self.match_token(TokenType::Between) {
            let start = self.parse_frame_bound()?;
            self.expect(TokenType::And, "AND in frame specification")?;
            let end = self.parse_frame_bound()?;
            Ok(WindowFrame {
                unit,
                start,
                end: Some(end),
            })
        } else {
            let start = self.parse_frame_bound()?;
            Ok(WindowFrame {
                unit,
                start,
                end: None,
            })
        }
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound> {
        if self.match_token(TokenType::Unbounded) {
            if self.match_token(TokenType::Preceding) {
                Ok(FrameBound::UnboundedPreceding)
            } else {
                self.expect(TokenType::Following, "PRECEDING or FOLLOWING")?;
                Ok(FrameBound::UnboundedFollowing)
            }
        } else if self.match_token(TokenType::Current) {
            self.expect(TokenType::Row, "ROW after CURRENT")?;
            Ok(FrameBound::CurrentRow)
        } else {
            let offset = self.parse_expression()?;
            if self.match_token(TokenType::Preceding) {
                Ok(FrameBound::Preceding(offset))
            } else {
                self.expect(TokenType::Following, "PRECEDING or FOLLOWING")?;
                Ok(FrameBound::Following(offset))
            }
        }
    }

    fn parse_case(&mut self) -> Result<ValueExpr> {
        self.expect(TokenType::Case, "CASE")?;
        let operand = if self.check(TokenType::When) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut branches = Vec::new();
        while self.match_token(TokenType::When) {
            let condition = self.parse_expression()?;
            self.expect(TokenType::Then, "THEN after WHEN")?;
            let result = self.parse_expression()?;
            branches.push(CaseBranch { condition, result });
        }
        if branches.is_empty() {
            return Err(self.error_here("CASE requires at least one WHEN branch"));
        }

        let else_result = if self.match_token(TokenType::Else) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenType::End, "END closing CASE")?;
        Ok(ValueExpr::Case(Box::new(CaseExpression {
            operand,
            branches,
            else_result,
        })))
    }

    fn parse_cast_call(&mut self) -> Result<ValueExpr> {
        self.expect(TokenType::Cast, "CAST")?;
        self.expect(TokenType::LParen, "'(' after CAST")?;
        let operand = self.parse_expression()?;
        self.expect(TokenType::As, "AS in CAST")?;
        let target_type = self.parse_type_name()?;
        self.expect(TokenType::RParen, "')' closing CAST")?;
        Ok(ValueExpr::Cast(Box::new(CastExpression {
            operand,
            target_type,
            postfix: false,
        })))
    }

    fn parse_extract(&mut self) -> Result<ValueExpr> {
        self.expect(TokenType::Extract, "EXTRACT")?;
        self.expect(TokenType::LParen, "'(' after EXTRACT")?;
        let field = self.advance().text;
        self.expect(TokenType::From, "FROM in EXTRACT")?;
        let source = self.parse_expression()?;
        self.expect(TokenType::RParen, "')' closing EXTRACT")?;
        Ok(ValueExpr::Extract(Box::new(ExtractExpression {
            field,
            source,
        })))
    }

    /// Disambiguate a parenthesized construct: a scalar subquery (leading
    /// SELECT/WITH/VALUES), a row-value list (comma at depth one), or a
    /// grouped expression.
    fn parse_paren(&mut self) -> Result<ValueExpr> {
        self.expect(TokenType::LParen, "'('")?;
        if matches!(
            self.peek_type(),
            TokenType::Select | TokenType::With | TokenType::Values
        ) {
            let query = self.parse_select_query()?;
            self.expect(TokenType::RParen, "')' closing subquery")?;
            return Ok(ValueExpr::Subquery(Box::new(query)));
        }

        let first = self.parse_expression()?;
        if self.check(TokenType::Comma) {
            let mut items = vec![first];
            while self.match_token(TokenType::Comma) {
                items.push(self.parse_expression()?);
            }
            self.expect(TokenType::RParen, "')' closing row value list")?;
            return Ok(ValueExpr::Tuple(items));
        }
        self.expect(TokenType::RParen, "')' closing expression")?;
        Ok(ValueExpr::Paren(Box::new(first)))
    }

    /// Parse a type name: base word(s), optional `(...)` modifiers, and an
    /// optional array suffix. Multi-word names (`double precision`,
    /// `character varying`, `timestamp with time zone`) are joined with
    /// single spaces.
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName> {
        let base = match self.peek_type() {
            TokenType::Identifier
            | TokenType::Date
            | TokenType::Time
            | TokenType::Timestamp
            | TokenType::Interval => self.advance(),
            TokenType::QuotedIdentifier => self.advance(),
            _ => {
                return Err(self.error_here(format!(
                    "expected type name, found '{}'",
                    self.peek().text
                )))
            }
        };
        let base_type = base.token_type;
        let mut name = base.text;

        if name.eq_ignore_ascii_case("double") && self.check(TokenType::Identifier) {
            if self.peek().text.eq_ignore_ascii_case("precision") {
                name.push(' ');
                name.push_str(&self.advance().text);
            }
        } else if (name.eq_ignore_ascii_case("character") || name.eq_ignore_ascii_case("bit"))
            && self.check(TokenType::Identifier)
            && self.peek().text.eq_ignore_ascii_case("varying")
        {
            name.push(' ');
            name.push_str(&self.advance().text);
        }

        let mut type_name = TypeName::new(name);

        if self.match_token(TokenType::LParen) {
            type_name.modifiers.push(self.parse_expression()?);
            while self.match_token(TokenType::Comma) {
                type_name.modifiers.push(self.parse_expression()?);
            }
            self.expect(TokenType::RParen, "')' closing type modifiers")?;
        }

        // TIME/TIMESTAMP [(p)] WITH|WITHOUT TIME ZONE
        if matches!(base_type, TokenType::Time | TokenType::Timestamp) {
            if self.check(TokenType::With) && self.peek_ahead_type(1) == TokenType::Time {
                self.advance(); // WITH
                self.advance(); // TIME
                if !self.match_soft_keyword("ZONE") {
                    return Err(self.error_here("expected ZONE after WITH TIME"));
                }
                type_name.name.push_str(" with time zone");
            } else if self.check(TokenType::Identifier)
                && self.peek().text.eq_ignore_ascii_case("without")
                && self.peek_ahead_type(1) == TokenType::Time
            {
                self.advance(); // WITHOUT
                self.advance(); // TIME
                if !self.match_soft_keyword("ZONE") {
                    return Err(self.error_here("expected ZONE after WITHOUT TIME"));
                }
                type_name.name.push_str(" without time zone");
            }
        }

        while self.check(TokenType::LBracket) && self.peek_ahead_type(1) == TokenType::RBracket {
            self.advance();
            self.advance();
            type_name.array = true;
        }
        Ok(type_name)
    }
}
