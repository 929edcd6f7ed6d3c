pub type MorphResult<T> = Result<T, MorphError>;

#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            MorphError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            MorphError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = MorphError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
