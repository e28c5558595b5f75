//! Conversion collaborator boundary: identity of a record for routes and forms.

use crate::value::Value;

pub trait Conversion {
    /// Whether the record has been stored.
    fn persisted(&self) -> bool;

    /// Current values of the primary key attributes, in key order.
    fn key_values(&self) -> Vec<Value>;

    /// The key, when the record is persisted and any key part is set.
    fn to_key(&self) -> Option<Vec<Value>> {
        if !self.persisted() {
            return None;
        }
        let key = self.key_values();
        if key.is_empty() || key.iter().all(Value::is_nil) {
            None
        } else {
            Some(key)
        }
    }

    /// Key parts joined with `-`, when every part is set.
    fn to_param(&self) -> Option<String> {
        let key = self.to_key()?;
        if key.iter().any(Value::is_nil) {
            return None;
        }
        Some(
            key.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        persisted: bool,
        key: Vec<Value>,
    }

    impl Conversion for Row {
        fn persisted(&self) -> bool {
            self.persisted
        }

        fn key_values(&self) -> Vec<Value> {
            self.key.clone()
        }
    }

    #[test]
    fn new_records_have_no_key() {
        let row = Row {
            persisted: false,
            key: vec![Value::Int(1)],
        };
        assert_eq!(row.to_key(), None);
        assert_eq!(row.to_param(), None);
    }

    #[test]
    fn composite_keys_join_with_dash() {
        let row = Row {
            persisted: true,
            key: vec![Value::Int(7), Value::str("en")],
        };
        assert_eq!(row.to_key(), Some(vec![Value::Int(7), Value::str("en")]));
        assert_eq!(row.to_param().as_deref(), Some("7-en"));
    }

    #[test]
    fn partial_keys_have_no_param() {
        let row = Row {
            persisted: true,
            key: vec![Value::Int(7), Value::Nil],
        };
        assert!(row.to_key().is_some());
        assert_eq!(row.to_param(), None);

        let row = Row {
            persisted: true,
            key: vec![Value::Nil],
        };
        assert_eq!(row.to_key(), None);
    }
}
