use std::fmt;


/// Error codes for expression diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: syntax errors found while collecting or reducing units
/// - E2xxx: type and resolution errors found while building nodes
/// - E9xxx: internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression / missing operand
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected member name after `.`
    E1004,
    /// Expected type after `new`
    E1005,
    /// Operand is not a modifiable value
    E1006,
    /// Reduction left more than one unit
    E1007,
    /// Array initializer longer than the declared count
    E1008,
    /// Function name not followed by an argument list
    E1009,
    /// Expression nested too deeply
    E1010,

    // Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type
    E2002,
    /// Unknown identifier
    E2003,
    /// No overload matches the arguments
    E2004,
    /// Ambiguous overload
    E2005,
    /// Unknown member
    E2006,
    /// Type has no indexer
    E2007,
    /// Operator not supported for the operand types
    E2008,
    /// Invalid cast
    E2009,
    /// Initializer on a type without an insertion capability
    E2010,
    /// Member yields no value where one is required
    E2011,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,
}

impl ErrorCode {
    /// Check if this is a syntax error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a type error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Syntax
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            // Type
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
