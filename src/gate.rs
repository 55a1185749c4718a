/// Casual passcode check in front of the editor. Not a security boundary:
/// the passcode ships with the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessGate {
    passcode: String,
}

impl AccessGate {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        let granted = attempt == self.passcode;
        if !granted {
            log::debug!("editor access denied");
        }
        granted
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PASSCODE)
    }
}
