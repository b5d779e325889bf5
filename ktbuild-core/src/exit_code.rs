use std::fmt;

use serde::Serialize;

/// Exit code reported by the Kotlin compiler entry point.
///
/// Codes below 2 are non-terminal: success and a standard compilation error
/// leave the orchestration free to continue. Everything else is terminal and
/// aborts the whole build action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful compilation.
    pub const OK: Self = Self(0);
    /// Standard, user-facing compilation error.
    pub const COMPILATION_ERROR: Self = Self(1);
    /// Compiler-internal failure.
    pub const INTERNAL_ERROR: Self = Self(2);
    /// Script execution failure.
    pub const SCRIPT_EXECUTION_ERROR: Self = Self(3);

    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this code must abort the build action.
    ///
    /// Only codes of 2 and above are terminal. Negative codes are not; they
    /// are reported like a compilation error.
    pub const fn is_terminal(self) -> bool {
        self.0 >= 2
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "OK",
            1 => "COMPILATION_ERROR",
            2 => "INTERNAL_ERROR",
            3 => "SCRIPT_EXECUTION_ERROR",
            _ => return write!(f, "{}", self.0),
        };
        write!(f, "{} ({})", self.0, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_terminal_codes() {
        assert!(!ExitCode::OK.is_terminal());
        assert!(!ExitCode::COMPILATION_ERROR.is_terminal());
        assert!(!ExitCode::new(-1).is_terminal());
        assert!(!ExitCode::new(i32::MIN).is_terminal());
    }

    #[test]
    fn test_terminal_codes() {
        assert!(ExitCode::INTERNAL_ERROR.is_terminal());
        assert!(ExitCode::SCRIPT_EXECUTION_ERROR.is_terminal());
        assert!(ExitCode::new(42).is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::OK.to_string(), "0 (OK)");
        assert_eq!(ExitCode::INTERNAL_ERROR.to_string(), "2 (INTERNAL_ERROR)");
        assert_eq!(ExitCode::new(7).to_string(), "7");
    }
}
