use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct LightBasisError {
    msg: String,
}

impl LightBasisError {
    pub fn error(msg: &str) -> Self {
        LightBasisError {
            msg: String::from(msg),
        }
    }

    pub fn message(&self) -> &str {
        return &self.msg;
    }
}

impl fmt::Display for LightBasisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for LightBasisError {}

impl From<&str> for LightBasisError {
    fn from(value: &str) -> Self {
        return LightBasisError::error(value);
    }
}

impl From<String> for LightBasisError {
    fn from(value: String) -> Self {
        return LightBasisError { msg: value };
    }
}

impl From<std::io::Error> for LightBasisError {
    fn from(value: std::io::Error) -> Self {
        return LightBasisError::error(&value.to_string());
    }
}

impl From<std::num::ParseIntError> for LightBasisError {
    fn from(value: std::num::ParseIntError) -> Self {
        return LightBasisError::error(&value.to_string());
    }
}

impl From<serde_json::Error> for LightBasisError {
    fn from(value: serde_json::Error) -> Self {
        let msg = format!("Invalid configuration: {}", value);
        return LightBasisError::error(&msg);
    }
}
