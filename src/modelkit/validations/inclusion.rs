use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

/// Value must be one of a fixed set.
#[derive(Debug, Clone)]
pub struct Inclusion {
    allowed: Vec<Value>,
}

impl Inclusion {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl EachValidator for Inclusion {
    fn kind(&self) -> &'static str {
        "inclusion"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        if self.allowed.contains(value) {
            Vec::new()
        } else {
            vec![ErrorKind::Inclusion]
        }
    }
}

/// Value must not be one of a fixed set.
#[derive(Debug, Clone)]
pub struct Exclusion {
    reserved: Vec<Value>,
}

impl Exclusion {
    pub fn new<I, V>(reserved: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }
}

impl EachValidator for Exclusion {
    fn kind(&self) -> &'static str {
        "exclusion"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        if self.reserved.contains(value) {
            vec![ErrorKind::Exclusion]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusion() {
        let sizes = Inclusion::new(["small", "large"]);
        assert!(sizes.check(&Value::str("small")).is_empty());
        assert_eq!(sizes.check(&Value::str("medium")), vec![ErrorKind::Inclusion]);
        assert_eq!(sizes.check(&Value::Nil), vec![ErrorKind::Inclusion]);
    }

    #[test]
    fn test_exclusion() {
        let reserved = Exclusion::new(["admin", "root"]);
        assert_eq!(reserved.check(&Value::str("root")), vec![ErrorKind::Exclusion]);
        assert!(reserved.check(&Value::str("bob")).is_empty());
    }
}
