/*!
Recursive‑descent parser for the Lox front end.

Complexity
----------
* **n** = number of tokens (including the sole EOF).

| Phase / function              | Cost | Rationale                                        |
|-------------------------------|-----:|--------------------------------------------------|
| `Parser::parse` main loop     | Θ(n) | Each token is consumed once via `advance()`.     |
| Error recovery `synchronize()`| O(k) | Discards tokens ≤ next statement boundary.       |

Call‑stack depth grows with syntactic nesting (≪ n in practice).

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| Error paths                  | `debug`| Context before recording the error.       |

Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "class" IDENT ( "<" IDENT )? "{" function* "}" ;
funDecl        → "fun" function ;
function       → IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | forStmt | ifStmt | printStmt | returnStmt
               | whileStmt | breakStmt | continueStmt | block ;
block          → "{" declaration* "}" ;
expression     → comma ;
comma          → assignment ( "," assignment )* ;
assignment     → logic_or ( "=" assignment )? ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → ternary ( "and" ternary )* ;
ternary        → equality ( "?" expression ":" expression )? ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → addition ( ( ">" | ">=" | "<" | "<=" ) addition )* ;
addition       → multiplication ( ( "-" | "+" ) multiplication )* ;
multiplication → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | power ;
power          → call ( "**" unary )* ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → assignment ( "," assignment )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil" | "this"
               | IDENT | "(" expression ")" | "super" "." IDENT ;
```

Errors come in two flavours.  *Fatal* ones (missing terminator, unexpected
token, nesting past `MAX_NESTING`) are returned as `Err` and unwind with `?` to [`Parser::declaration`],
which records them and synchronizes to the next statement boundary.
*Non‑fatal* ones (invalid assignment target, too many arguments, `break`
outside a loop) are recorded on the spot and parsing carries on as if the
input were valid.
*/

use crate::error::{LoxError, Result};
use crate::expr::{Call, Expr, Get, Set, Ternary, Variable};
use crate::stmt::{
    Block, Break, Class, Continue, Expression, Function, If, Print, Return, Stmt, Var, While,
};
use crate::token::{LiteralValue, Token, TokenType};

use log::{debug, info};

/// Maximum number of call arguments and function parameters.
pub const MAX_ARGUMENTS: usize = 8;

/// Deepest the parser will recurse through expressions, unary operators and
/// statements before giving up with a parse error instead of exhausting the
/// stack.  One level of parentheses costs two.
pub const MAX_NESTING: usize = 256;

/// Stands in for the EOF token when the slice is empty or unterminated.
static EOF_TOKEN: Token<'static> = Token {
    token_type: TokenType::EOF,
    lexeme: "",
    line: 0,
};

/// What a full parse produces: every statement that parsed cleanly, and
/// every error encountered on the way.
#[derive(Debug, Default)]
pub struct ParseOutput<'a> {
    pub statements: Vec<Stmt<'a>>,
    pub errors: Vec<LoxError>,
}

impl<'a> ParseOutput<'a> {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
    errors: Vec<LoxError>,

    /// Number of loop bodies enclosing the cursor within the current function.
    loop_depth: usize,

    /// Current recursion depth, bounded by `MAX_NESTING`.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.  The slice is expected to end with `EOF`.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            loop_depth: 0,
            depth: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  Never aborts early: broken declarations are
    /// skipped and their errors collected.
    pub fn parse(mut self) -> ParseOutput<'a> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        info!(
            "Parse finished: {} statement(s), {} error(s)",
            statements.len(),
            self.errors.len()
        );

        ParseOutput {
            statements,
            errors: self.errors,
        }
    }

    /// Parse a single expression that must span the whole token stream.
    /// Non‑fatal errors are returned too, as the first error.
    pub fn parse_expression(mut self) -> Result<Expr<'a>> {
        info!("Parsing single expression");

        let expr: Expr<'a> = self.expression()?;

        if !self.is_at_end() {
            return Err(LoxError::parse(self.peek(), "Expected end of expression."));
        }

        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(expr),
        }
    }

    // ──────────────────────── declaration rules ───────────────────

    /// The single recovery point: a failed declaration is recorded, the
    /// cursor is moved to the next statement boundary, and `None` is returned.
    fn declaration(&mut self) -> Option<Stmt<'a>> {
        debug!("Entering declaration");

        let result: Result<Stmt<'a>> = if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.matches(TokenType::FUN) {
            self.function("function").map(Stmt::Function)
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                debug!("Declaration failed, synchronizing: {}", err);

                self.errors.push(err);
                self.synchronize();

                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: Token<'a> = self
            .consume(TokenType::IDENTIFIER, "Expected class name.")?
            .clone();

        let superclass: Option<Variable<'a>> = if self.matches(TokenType::LESS) {
            let super_name = self.consume(TokenType::IDENTIFIER, "Expected superclass name.")?;

            Some(Variable {
                name: super_name.clone(),
                resolution: Default::default(),
            })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before class body.")?;

        let mut methods: Vec<Function<'a>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after class body.")?;

        debug!(
            "Parsed class '{}' with {} method(s)",
            name.lexeme,
            methods.len()
        );

        Ok(Stmt::Class(Class {
            name,
            superclass,
            methods,
        }))
    }

    /// Shared by `fun` declarations and class methods; `kind` only feeds
    /// the error messages.
    fn function(&mut self, kind: &str) -> Result<Function<'a>> {
        let name: Token<'a> = self
            .consume(TokenType::IDENTIFIER, &format!("Expected {} name.", kind))?
            .clone();

        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expected '(' after {} name.", kind),
        )?;

        let mut params: Vec<Token<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    let err = LoxError::parse(
                        self.peek(),
                        format!("Can't have more than {} parameters.", MAX_ARGUMENTS),
                    );
                    self.report(err);
                }

                params.push(
                    self.consume(TokenType::IDENTIFIER, "Expected parameter name.")?
                        .clone(),
                );

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters.")?;
        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expected '{{' before {} body.", kind),
        )?;

        // `break` inside a function nested in a loop does not target that loop.
        let enclosing_loops: usize = std::mem::replace(&mut self.loop_depth, 0);
        let body: Result<Vec<Stmt<'a>>> = self.block();
        self.loop_depth = enclosing_loops;

        Ok(Function {
            name,
            params,
            body: body?,
        })
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: Token<'a> = self
            .consume(TokenType::IDENTIFIER, "Expected variable name.")?
            .clone();

        let initializer: Option<Expr<'a>> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration.",
        )?;

        Ok(Stmt::Var(Var { name, initializer }))
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt<'a>> {
        self.nested(Self::statement_kind)
    }

    fn statement_kind(&mut self) -> Result<Stmt<'a>> {
        debug!("Entering statement at '{}'", self.peek().lexeme);

        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::BREAK) {
            let keyword: Token<'a> = self.loop_control("break")?;
            Ok(Stmt::Break(Break { keyword }))
        } else if self.matches(TokenType::CONTINUE) {
            let keyword: Token<'a> = self.loop_control("continue")?;
            Ok(Stmt::Continue(Continue { keyword }))
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(Block {
                statements: self.block()?,
            }))
        } else {
            self.expression_statement()
        }
    }

    /// `for` has no node of its own: it becomes a `while` inside a block.
    fn for_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'for'.")?;

        let initializer: Option<Stmt<'a>> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr<'a>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition.")?;

        let increment: Option<Expr<'a>> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses.")?;

        let body: Stmt<'a> = self.loop_body()?;

        let looped: Stmt<'a> = Stmt::While(While {
            condition: condition.unwrap_or_else(|| Expr::literal(LiteralValue::True)),
            body: Box::new(body),
            increment,
        });

        Ok(match initializer {
            Some(init) => Stmt::Block(Block {
                statements: vec![init, looped],
            }),
            None => looped,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'.")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after if condition.")?;

        let then_branch: Box<Stmt<'a>> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt<'a>>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(If {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let expression: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value.")?;

        Ok(Stmt::Print(Print { expression }))
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: Token<'a> = self.previous().clone();
        let value: Option<Expr<'a>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value.")?;

        Ok(Stmt::Return(Return { keyword, value }))
    }

    fn while_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'.")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition.")?;

        let body: Stmt<'a> = self.loop_body()?;

        Ok(Stmt::While(While {
            condition,
            body: Box::new(body),
            increment: None,
        }))
    }

    /// Parse a statement with the loop depth raised, restoring it even when
    /// the body fails.
    fn loop_body(&mut self) -> Result<Stmt<'a>> {
        self.loop_depth += 1;
        let body: Result<Stmt<'a>> = self.statement();
        self.loop_depth -= 1;

        body
    }

    /// `break ;` or `continue ;`, with the keyword already consumed.
    fn loop_control(&mut self, word: &str) -> Result<Token<'a>> {
        let keyword: Token<'a> = self.previous().clone();

        if self.loop_depth == 0 {
            let err = LoxError::parse(
                &keyword,
                format!("Must be inside a loop to use '{}'.", word),
            );
            self.report(err);
        }

        self.consume(
            TokenType::SEMICOLON,
            &format!("Expected ';' after '{}'.", word),
        )?;

        Ok(keyword)
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let expression: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after expression.")?;

        Ok(Stmt::Expression(Expression { expression }))
    }

    fn block(&mut self) -> Result<Vec<Stmt<'a>>> {
        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block.")?;

        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.nested(Self::comma)
    }

    fn comma(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.assignment()?;

        while self.matches(TokenType::COMMA) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.assignment()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr: Expr<'a> = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token<'a> = self.previous().clone();
            let value: Expr<'a> = self.assignment()?;

            return Ok(match expr {
                Expr::Variable(variable) => Expr::assign(variable.name, value),

                Expr::Get(Get { object, name }) => Expr::Set(Set {
                    object,
                    name,
                    value: Box::new(value),
                }),

                other => {
                    self.report(LoxError::parse(&equals, "Invalid assignment target."));

                    other
                }
            });
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.logical_and()?;

            expr = Expr::logical(expr, operator, right);
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.ternary()?;

        while self.matches(TokenType::AND) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.ternary()?;

            expr = Expr::logical(expr, operator, right);
        }

        Ok(expr)
    }

    /// Right‑associative: the else branch recurses through `expression`.
    fn ternary(&mut self) -> Result<Expr<'a>> {
        let condition: Expr<'a> = self.equality()?;

        if self.matches(TokenType::QUESTION) {
            let question: Token<'a> = self.previous().clone();
            let then_branch: Expr<'a> = self.expression()?;
            let colon: Token<'a> = self
                .consume(TokenType::COLON, "Expected ':' in ternary operator.")?
                .clone();
            let else_branch: Expr<'a> = self.expression()?;

            return Ok(Expr::Ternary(Ternary {
                condition: Box::new(condition),
                question,
                then_branch: Box::new(then_branch),
                colon,
                else_branch: Box::new(else_branch),
            }));
        }

        Ok(condition)
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.comparison()?;

        while self.match_any(&[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL]) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.comparison()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.addition()?;

        while self.match_any(&[
            TokenType::GREATER,
            TokenType::GREATER_EQUAL,
            TokenType::LESS,
            TokenType::LESS_EQUAL,
        ]) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.addition()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn addition(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.multiplication()?;

        while self.match_any(&[TokenType::MINUS, TokenType::PLUS]) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.multiplication()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn multiplication(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.unary()?;

        while self.match_any(&[TokenType::STAR, TokenType::SLASH]) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.unary()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        self.nested(Self::prefix)
    }

    fn prefix(&mut self) -> Result<Expr<'a>> {
        if self.match_any(&[TokenType::BANG, TokenType::MINUS]) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.unary()?;

            return Ok(Expr::unary(operator, right));
        }

        self.power()
    }

    /// `**` binds tighter than unary minus on its left but takes a full
    /// unary on its right, which makes it right‑associative.
    fn power(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.call()?;

        while self.matches(TokenType::STAR_STAR) {
            let operator: Token<'a> = self.previous().clone();
            let right: Expr<'a> = self.unary()?;

            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn call(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: Token<'a> = self
                    .consume(TokenType::IDENTIFIER, "Expected property name after '.'.")?
                    .clone();

                expr = Expr::Get(Get {
                    object: Box::new(expr),
                    name,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Arguments are `assignment`s, so a `,` here separates arguments rather
    /// than forming a comma expression.
    fn finish_call(&mut self, callee: Expr<'a>) -> Result<Expr<'a>> {
        let mut arguments: Vec<Expr<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    let err = LoxError::parse(
                        self.peek(),
                        format!("Can't have more than {} arguments.", MAX_ARGUMENTS),
                    );
                    self.report(err);
                }

                arguments.push(self.assignment()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token<'a> = self
            .consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments.")?
            .clone();

        Ok(Expr::Call(Call {
            callee: Box::new(callee),
            paren,
            arguments,
        }))
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        if self.match_any(&[
            TokenType::FALSE,
            TokenType::TRUE,
            TokenType::NIL,
            TokenType::NUMBER(0.0),
            TokenType::STRING(String::new()),
        ]) {
            if let Some(value) = self.previous().literal() {
                return Ok(Expr::literal(value));
            }
        }

        if self.matches(TokenType::SUPER) {
            let keyword: Token<'a> = self.previous().clone();
            self.consume(TokenType::DOT, "Expected '.' after 'super'.")?;
            let method: Token<'a> = self
                .consume(TokenType::IDENTIFIER, "Expected superclass method name.")?
                .clone();

            return Ok(Expr::super_access(keyword, method));
        }

        if self.matches(TokenType::THIS) {
            return Ok(Expr::this(self.previous().clone()));
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::variable(self.previous().clone()));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr<'a> = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression.")?;

            return Ok(Expr::grouping(expr));
        }

        debug!("No primary expression at '{}'", self.peek().lexeme);

        Err(LoxError::parse(self.peek(), "Expected expression."))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Run `rule` one level deeper, or fail once `MAX_NESTING` is reached.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            debug!("Nesting limit reached at '{}'", self.peek().lexeme);

            return Err(LoxError::parse(self.peek(), "Too much nesting."));
        }

        self.depth += 1;
        let result: Result<T> = rule(self);
        self.depth -= 1;

        result
    }

    /// Record an error without unwinding.
    fn report(&mut self, err: LoxError) {
        debug!("Non-fatal parse error: {}", err);

        self.errors.push(err);
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline]
    fn match_any(&mut self, ttypes: &[TokenType]) -> bool {
        if ttypes.iter().any(|t| self.check_ref(t)) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        debug!("consume failed at '{}': {}", self.peek().lexeme, message);

        Err(LoxError::parse(self.peek(), message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        self.check_ref(&ttype)
    }

    #[inline(always)]
    fn check_ref(&self, ttype: &TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type.same_kind(ttype)
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        self.tokens.get(self.current).unwrap_or(&EOF_TOKEN)
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&EOF_TOKEN)
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
