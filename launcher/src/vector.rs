use serde::Serialize;

/// Shell-quoting requested for a token when the vector is rendered as a
/// shell command line. Spawning through `std::process::Command` passes the
/// bare values and ignores this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    None,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgToken {
    pub value: String,
    pub quoting: Quoting,
}

/// Ordered argument tokens for one launcher invocation. Empty values are
/// rejected at push time, so the vector never carries an empty token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentVector(Vec<ArgToken>);

impl ArgumentVector {
    pub(crate) fn push(&mut self, value: impl Into<String>) {
        self.push_token(value, Quoting::None);
    }

    pub(crate) fn push_strong(&mut self, value: impl Into<String>) {
        self.push_token(value, Quoting::Strong);
    }

    fn push_token(&mut self, value: impl Into<String>, quoting: Quoting) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.0.push(ArgToken { value, quoting });
    }

    pub fn tokens(&self) -> &[ArgToken] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Bare token values, in order, for handing to a process spawner.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|token| token.value.as_str())
    }

    /// Rendering for logs and terminals, with strong quoting applied.
    pub fn shell_line(&self) -> String {
        self.0
            .iter()
            .map(|token| match token.quoting {
                Quoting::None => token.value.clone(),
                Quoting::Strong => format!("'{}'", token.value),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_dropped() {
        let mut args = ArgumentVector::default();
        args.push("");
        args.push("run");
        args.push_strong("");
        assert_eq!(args.len(), 1);
        assert_eq!(args.values().collect::<Vec<_>>(), vec!["run"]);
    }

    #[test]
    fn shell_line_applies_strong_quoting() {
        let mut args = ArgumentVector::default();
        args.push_strong("-Dcamel.jbang.version=4.5.0");
        args.push("run");
        assert_eq!(args.shell_line(), "'-Dcamel.jbang.version=4.5.0' run");
    }
}
