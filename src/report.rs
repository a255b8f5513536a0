use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictClass {
    Pass,
    Fail,
    /// Advisory, non-blocking.
    Warn,
}

/// One evaluated rule's outcome — the sole contract with whatever presents
/// the results.
#[derive(Clone, Debug, Serialize)]
pub struct Verdict {
    pub rule_id: String,
    pub display_name: String,
    pub class: VerdictClass,
    /// What the file actually contains, rendered for display.
    pub observed: String,
    /// What the template requires, rendered for display.
    pub expected: String,
    pub message: String,
}

impl Verdict {
    pub(crate) fn new(
        rule_id: &str,
        display_name: &str,
        class: VerdictClass,
        observed: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        let observed = observed.into();
        let expected = expected.into();
        let message = format!("expected {expected}; observed {observed}");
        Verdict {
            rule_id: rule_id.to_string(),
            display_name: display_name.to_string(),
            class,
            observed,
            expected,
            message,
        }
    }
}

/// Ordered verdict list for one validation pass. Always complete: the
/// evaluator never drops a rule, even for an empty document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub verdicts: Vec<Verdict>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        self.verdicts.iter().any(|v| v.class == VerdictClass::Fail)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts
            .iter()
            .filter(|v| v.class == VerdictClass::Fail)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts
            .iter()
            .filter(|v| v.class == VerdictClass::Warn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter()
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
