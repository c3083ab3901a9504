//! Infix precedence engine.
//!
//! A stack machine shared between term and pattern parsing through the
//! [`InfixContext`] capability interface. Precedence derives from the
//! operator's first character; associativity from its last (`:` makes an
//! operator right-associative). Mixing left- and right-associative
//! operators at one precedence tier is a hard error.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Ident, Pat, PatKind, Term, TermKind, Type};

use crate::error::ParseError;
use crate::Parser;

/// Precedence tiers, lowest to highest. Assignment operators sit below
/// everything; letter-initial operators below `|`.
pub(crate) fn precedence(op: &str) -> u8 {
    if is_assignment_op(op) {
        return 0;
    }
    match op.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => 1,
        Some('|') => 2,
        Some('^') => 3,
        Some('&') => 4,
        Some('=') | Some('!') => 5,
        Some('<') | Some('>') => 6,
        Some(':') => 7,
        Some('+') | Some('-') => 8,
        Some('*') | Some('/') | Some('%') => 9,
        _ => 10,
    }
}

/// Right-associative iff the textual form ends with `:`.
pub(crate) fn is_right_assoc(op: &str) -> bool {
    op.ends_with(':')
}

/// Operator-style assignment: ends in `=`, does not start with `=`, and
/// is not a comparison (`<=`, `>=`, `!=`).
pub(crate) fn is_assignment_op(op: &str) -> bool {
    op.len() > 1
        && op.ends_with('=')
        && !op.starts_with('=')
        && !matches!(op, "<=" | ">=" | "!=")
}

/// An infix left-hand side waiting for its right-hand side.
pub(crate) struct UnfinishedInfix<L> {
    /// Token index where the left-hand side starts.
    pub lhs_start: u32,
    pub lhs: L,
    /// Token index of the last token of the left-hand side.
    pub lhs_end: u32,
    pub op: Ident,
    pub targs: Vec<Type>,
}

/// Capability interface connecting the engine to a tree family.
pub(crate) trait InfixContext {
    type Lhs;
    type Rhs;
    type Finished;

    fn to_lhs(&self, rhs: Self::Rhs) -> Self::Lhs;
    fn to_rhs(&self, finished: Self::Finished) -> Self::Rhs;

    /// Build the finished node for one operator application.
    fn finish_infix(
        &self,
        parser: &mut Parser<'_>,
        frame: UnfinishedInfix<Self::Lhs>,
        rhs: Self::Rhs,
        rhs_end: u32,
    ) -> Result<Self::Finished, ParseError>;
}

impl Parser<'_> {
    /// Reduce the operator stack above `base` against an incoming
    /// operator (`None` at the end of the chain).
    ///
    /// Pops while the top frame's precedence strictly dominates the
    /// incoming operator, or ties with left associativity. A tie with
    /// disagreeing associativity is a hard error.
    pub(crate) fn reduce_stack<C: InfixContext>(
        &mut self,
        ctx: &C,
        stack: &mut Vec<UnfinishedInfix<C::Lhs>>,
        base: usize,
        mut rhs: C::Rhs,
        rhs_end: u32,
        incoming: Option<&Ident>,
    ) -> Result<C::Rhs, ParseError> {
        let incoming_text = incoming.map(|op| self.name_text(op.name));
        let (incoming_prec, incoming_right) = match &incoming_text {
            Some(text) => (precedence(text), is_right_assoc(text)),
            None => (0, false),
        };

        while stack.len() > base {
            let Some(top) = stack.last() else { break };
            let top_text = self.name_text(top.op.name);
            let top_prec = precedence(&top_text);
            let top_right = is_right_assoc(&top_text);

            let dominates = if incoming_text.is_none() {
                true
            } else if top_prec != incoming_prec {
                top_prec > incoming_prec
            } else {
                if top_right != incoming_right {
                    let span = incoming.map(|op| op.origin.span).unwrap_or_default();
                    return Err(ParseError::new(
                        ErrorCode::E1061,
                        "left- and right-associative operators with same precedence may not be mixed",
                        span,
                    ));
                }
                !top_right
            };
            if !dominates {
                break;
            }
            let Some(frame) = stack.pop() else { break };
            let finished = ctx.finish_infix(self, frame, rhs, rhs_end)?;
            rhs = ctx.to_rhs(finished);
        }
        Ok(rhs)
    }
}

/// Term implementation: operands are argument lists so that tuples of
/// arguments (`a op (b, c)`) flow through unchanged.
pub(crate) struct TermInfixContext;

impl InfixContext for TermInfixContext {
    type Lhs = Vec<Term>;
    type Rhs = Vec<Term>;
    type Finished = Term;

    fn to_lhs(&self, rhs: Vec<Term>) -> Vec<Term> {
        rhs
    }

    fn to_rhs(&self, finished: Term) -> Vec<Term> {
        vec![finished]
    }

    fn finish_infix(
        &self,
        parser: &mut Parser<'_>,
        frame: UnfinishedInfix<Vec<Term>>,
        rhs: Vec<Term>,
        rhs_end: u32,
    ) -> Result<Term, ParseError> {
        let origin = parser.origin(frame.lhs_start as usize, rhs_end as usize);
        let lhs = parser.make_term_operand(frame.lhs, frame.lhs_start, frame.lhs_end);

        // The `match` keyword as an operator produces a match node; its
        // right-hand side must be a single partial-function literal.
        if frame.op.name == parser.soft.match_op && frame.targs.is_empty() {
            let mut rhs = rhs;
            if rhs.len() == 1 {
                if let TermKind::PartialFunction { cases } = rhs.remove(0).kind {
                    return Ok(Term::new(
                        TermKind::Match {
                            expr: Box::new(lhs),
                            cases,
                        },
                        origin,
                    ));
                }
            }
            return Err(ParseError::new(
                ErrorCode::E1041,
                "match statement requires cases",
                frame.op.origin.span,
            ));
        }

        Ok(Term::new(
            TermKind::ApplyInfix {
                lhs: Box::new(lhs),
                op: frame.op,
                targs: frame.targs,
                args: rhs,
            },
            origin,
        ))
    }
}

/// Pattern implementation: operands are single patterns; a tuple
/// right-hand side is splatted into the extractor's argument list.
pub(crate) struct PatInfixContext;

impl InfixContext for PatInfixContext {
    type Lhs = Pat;
    type Rhs = Pat;
    type Finished = Pat;

    fn to_lhs(&self, rhs: Pat) -> Pat {
        rhs
    }

    fn to_rhs(&self, finished: Pat) -> Pat {
        finished
    }

    fn finish_infix(
        &self,
        parser: &mut Parser<'_>,
        frame: UnfinishedInfix<Pat>,
        rhs: Pat,
        rhs_end: u32,
    ) -> Result<Pat, ParseError> {
        let origin = parser.origin(frame.lhs_start as usize, rhs_end as usize);
        let args = match rhs.kind {
            PatKind::Tuple { args } => args,
            _ => vec![rhs],
        };
        Ok(Pat::new(
            PatKind::ExtractInfix {
                lhs: Box::new(frame.lhs),
                op: frame.op,
                args,
            },
            origin,
        ))
    }
}
