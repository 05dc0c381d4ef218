use std::fmt;

/// Wrapper that keeps credentials (API keys, signing secrets, webhook hashes) out of logs. The value never shows up
/// in `Debug` or `Display` output; the only way to get at it is an explicit [`Secret::reveal`] call, which makes
/// accidental leaks easy to grep for.
#[derive(Clone, Default)]
pub struct Secret<T>(T)
where T: Clone + Default;

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T: Clone + Default> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Clone + Default> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn secrets_never_format_their_contents() {
        let secret = Secret::new("FLWSECK-very-secret".to_string());
        assert_eq!(format!("{secret}"), "****");
        assert_eq!(format!("{secret:?}"), "****");
        assert_eq!(secret.reveal(), "FLWSECK-very-secret");
    }
}
