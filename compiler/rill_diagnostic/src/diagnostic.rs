use std::fmt;

use rill_ir::Span;

use crate::ErrorCode;

#[cfg(test)]
mod tests;

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with the context needed to point at the offending token.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    /// Human-readable hints for fixing the error.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

/// Create a "type mismatch" diagnostic.
pub fn type_mismatch(span: Span, expected: &str, found: &str, context: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!(
            "type mismatch: expected `{expected}`, found `{found}`"
        ))
        .with_label(span, context)
}

/// Create an "unexpected token" diagnostic.
pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!(
            "unexpected token: expected {expected}, found `{found}`"
        ))
        .with_label(span, format!("expected {expected}"))
}

/// Create an "expected expression" diagnostic.
pub fn expected_expression(span: Span, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("expected expression, found `{found}`"))
        .with_label(span, "expected expression here")
}

/// Create a diagnostic for an operator whose left or right operand is absent.
pub fn missing_operand(span: Span, operator: &str, side: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("missing {side} operand for `{operator}`"))
        .with_label(span, format!("`{operator}` needs a {side} operand"))
}

/// Create an "unclosed delimiter" diagnostic.
pub fn unclosed_delimiter(open_span: Span, close_span: Span, delimiter: char) -> Diagnostic {
    let expected = match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => delimiter,
    };
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!("unclosed delimiter `{delimiter}`"))
        .with_label(close_span, format!("expected `{expected}`"))
        .with_secondary_label(open_span, "unclosed delimiter opened here")
}

/// Create an "unknown identifier" diagnostic.
pub fn unknown_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!("unknown identifier `{name}`"))
        .with_label(span, "not found in this scope")
}

/// Create an "unknown member" diagnostic.
pub fn unknown_member(span: Span, ty: &str, member: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2006)
        .with_message(format!("type `{ty}` has no member `{member}`"))
        .with_label(span, "unknown member")
}

/// Create a diagnostic for an operator that has no meaning for the operand types.
pub fn unsupported_operator(span: Span, operator: &str, left: &str, right: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2008)
        .with_message(format!(
            "operator `{operator}` cannot be applied to `{left}` and `{right}`"
        ))
        .with_label(span, "no built-in or registered operator")
}

/// Create a diagnostic for an assignment or `++`/`--` on a read-only operand.
pub fn not_modifiable(span: Span, operator: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1006)
        .with_message(format!("operand of `{operator}` is not a modifiable value"))
        .with_label(span, "cannot be assigned to")
}

/// Create an "ambiguous overload" diagnostic listing the candidates.
pub fn ambiguous_overload(span: Span, member: &str, candidates: &[String]) -> Diagnostic {
    let mut diag = Diagnostic::error(ErrorCode::E2005)
        .with_message(format!("call to `{member}` is ambiguous"))
        .with_label(span, "multiple overloads match equally well");
    for candidate in candidates {
        diag = diag.with_note(format!("candidate: {candidate}"));
    }
    diag
}
