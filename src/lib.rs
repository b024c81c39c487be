use thiserror::Error;

mod buffer;
mod eval;

pub use buffer::{is_valid_char, InputBuffer};
pub use eval::{evaluate, is_op, EvalError, Op};

pub const EVALUATE: char = '=';
pub const UNDO: char = 'u';
pub const REDO: char = 'r';

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("invalid character: {0}")]
    InvalidCharacter(char),
    #[error(transparent)]
    Eval(#[from] EvalError)
}

// What a single input character asks the calculator to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Append(char),
    Undo,
    Redo,
    Evaluate,
    Invalid(char)
}

impl From<char> for Command {
    fn from(ch: char) -> Self {
        match ch {
            UNDO => Command::Undo,
            REDO => Command::Redo,
            EVALUATE => Command::Evaluate,
            c if c.is_ascii_digit() || is_op(c) => Command::Append(c),
            c => Command::Invalid(c)
        }
    }
}

/// Holds the pending expression and the result carried over from the last evaluation.
#[derive(Debug, Default, Clone)]
pub struct Calculator {
    buffer: InputBuffer,
    last_result: i64
}

impl Calculator {
    pub fn new() -> Self {
        Calculator::default()
    }

    pub fn last_result(&self) -> i64 { self.last_result }
    pub fn buffer(&self) -> &InputBuffer { &self.buffer }

    // Handle one character; yields a value only when it triggered a successful evaluation
    pub fn process(&mut self, ch: char) -> Result<Option<i64>, CalcError> {
        let command = Command::from(ch);
        log::trace!("{:?} on {:?}", command, self.buffer.as_str());
        match command {
            Command::Append(c) => self.buffer.append(c).map(|()| None),
            Command::Undo => {
                self.buffer.undo();
                Ok(None)
            },
            Command::Redo => {
                self.buffer.redo();
                Ok(None)
            },
            Command::Evaluate => self.evaluate(),
            Command::Invalid(c) => Err(CalcError::InvalidCharacter(c))
        }
    }

    // Evaluate the buffer. Success clears it and carries the value forward; an empty buffer changes nothing.
    // Errors leave state alone, the line loop decides whether to reset.
    pub fn evaluate(&mut self) -> Result<Option<i64>, CalcError> {
        let result = evaluate(self.buffer.as_str(), self.last_result)?;
        if let Some(value) = result {
            log::debug!("{} (carried {}) = {}", self.buffer, self.last_result, value);
            self.buffer.reset();
            self.last_result = value;
        }
        Ok(result)
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
        self.last_result = 0;
    }

    fn run_line(&mut self, line: &str, outputs: &mut Vec<Result<i64, CalcError>>) -> Result<(), CalcError> {
        for ch in line.chars() {
            if let Some(value) = self.process(ch)? {
                outputs.push(Ok(value));
            }
        }
        // end of line always evaluates
        if let Some(value) = self.evaluate()? {
            outputs.push(Ok(value));
        }
        Ok(())
    }

    /// Process a whole input line, returning every result it produced in order.
    ///
    /// The first error stops the line, is appended to the output and resets all state,
    /// including the carried result.
    pub fn process_line(&mut self, line: &str) -> Vec<Result<i64, CalcError>> {
        let mut outputs = vec![];
        if let Err(e) = self.run_line(line, &mut outputs) {
            log::warn!("{} in line {:?}, resetting", e, line);
            self.reset();
            outputs.push(Err(e));
        }
        outputs
    }
}
