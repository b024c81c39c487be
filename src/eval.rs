use itertools::Itertools;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op { Add, Sub, Mul, Div }

impl Op {
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            _ => None
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/'
        }
    }

    // static table of precedence for each operator
    pub fn precedence(self) -> usize {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2
        }
    }

    // Overflow wraps; division truncates toward zero
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
        Ok(match self {
            Op::Add => lhs.wrapping_add(rhs),
            Op::Sub => lhs.wrapping_sub(rhs),
            Op::Mul => lhs.wrapping_mul(rhs),
            Op::Div => {
                if rhs == 0 { return Err(EvalError::DivideByZero) }
                lhs.wrapping_div(rhs)
            }
        })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

pub fn is_op(c: char) -> bool {
    Op::from_char(c).is_some()
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("divide by zero")]
    DivideByZero,
    #[error("unexpected character {0:?} in expression")]
    UnexpectedChar(char),
    // Unreachable: each operator is preceded by a pushed operand. Guards the pops instead of panicking.
    #[error("operand stack exhausted")]
    MissingOperand
}

// Operator and operand stacks, alive for one evaluation only
#[derive(Debug, Default)]
struct Stacks {
    ops: Vec<Op>,
    nums: Vec<i64>
}

impl Stacks {
    // Apply `op` to the two most recent operands, pushing the result back
    fn calc_two_num(&mut self, op: Op) -> Result<(), EvalError> {
        let (rhs, lhs) = match (self.nums.pop(), self.nums.pop()) {
            (Some(rhs), Some(lhs)) => (rhs, lhs),
            _ => return Err(EvalError::MissingOperand)
        };
        self.nums.push(op.apply(lhs, rhs)?);
        Ok(())
    }

    // Resolve every pending operator that binds at least as tightly as `incoming`.
    // This keeps same-precedence chains left-to-right.
    fn collapse(&mut self, incoming: Op) -> Result<(), EvalError> {
        while let Some(&top) = self.ops.last() {
            if top.precedence() < incoming.precedence() { break }
            self.ops.pop();
            self.calc_two_num(top)?;
        }
        Ok(())
    }

    fn drain(mut self) -> Result<i64, EvalError> {
        while let Some(op) = self.ops.pop() {
            self.calc_two_num(op)?;
        }
        self.nums.pop().ok_or(EvalError::MissingOperand)
    }
}

fn push_digit(acc: i64, digit: char) -> i64 {
    acc.wrapping_mul(10).wrapping_add(i64::from(digit as u8 - b'0'))
}

/// Evaluates an expression of non-negative integers and `+ - * /`.
///
/// A leading operator takes `last_result` as its left operand, and a trailing operator is dropped.
/// Returns `Ok(None)` for empty input.
pub fn evaluate(text: &str, last_result: i64) -> Result<Option<i64>, EvalError> {
    let mut stacks = Stacks::default();
    let mut body = text;

    let first = match body.chars().next() {
        Some(c) => c,
        None => return Ok(None)
    };
    if let Some(op) = Op::from_char(first) {
        stacks.ops.push(op);
        stacks.nums.push(last_result);
        body = &body[first.len_utf8()..];
    }
    if let Some(last) = body.chars().next_back() {
        if is_op(last) {
            body = &body[..body.len() - last.len_utf8()];
        }
    }

    let mut chars = body.chars().peekable();
    let mut operand = 0;
    loop {
        operand = chars.peeking_take_while(|c| c.is_ascii_digit()).fold(operand, push_digit);
        match chars.next() {
            None => break,
            Some(c) => match Op::from_char(c) {
                Some(op) => {
                    stacks.nums.push(operand);
                    operand = 0;
                    stacks.collapse(op)?;
                    stacks.ops.push(op);
                },
                None => return Err(EvalError::UnexpectedChar(c))
            }
        }
    }
    stacks.nums.push(operand);

    stacks.drain().map(Some)
}
