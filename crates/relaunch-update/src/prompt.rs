//! Update confirmation

use crate::version::SemVer;

/// Asks the user whether to install an offered update.
///
/// Anything other than an affirmative answer, including a failure to ask,
/// must come back as `false`.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, current: &SemVer, latest: &SemVer) -> bool;
}

/// Answers every offer the same way (`--yes`, or non-interactive hosts)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmation for FixedAnswer {
    fn confirm(&self, _current: &SemVer, _latest: &SemVer) -> bool {
        self.0
    }
}

/// Interpret a typed answer; only `y`/`yes` (any case) is affirmative
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" Yes\n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("sure"));
    }

    #[test]
    fn test_fixed_answer() {
        let v = SemVer::new(1, 0, 0);
        assert!(FixedAnswer(true).confirm(&v, &v));
        assert!(!FixedAnswer(false).confirm(&v, &v));
    }
}
