//! Serialization collaborator boundary.
//!
//! The core emits no wire format. It hands out attribute values, which are
//! `serde::Serialize`, filtered by [`SerializeOptions`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Attribute filter for [`Serialization::serializable_hash`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    /// Keep only these attributes. Takes precedence over `except`.
    #[serde(default)]
    pub only: Option<Vec<String>>,
    #[serde(default)]
    pub except: Vec<String>,
}

impl SerializeOptions {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Some(names.into_iter().map(Into::into).collect()),
            except: Vec::new(),
        }
    }

    pub fn except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: None,
            except: names.into_iter().map(Into::into).collect(),
        }
    }

    fn keeps(&self, name: &str) -> bool {
        match &self.only {
            Some(only) => only.iter().any(|n| n == name),
            None => !self.except.iter().any(|n| n == name),
        }
    }
}

pub trait Serialization {
    /// Attribute names and current values, in declaration order.
    fn serializable_attributes(&self) -> Vec<(String, Value)>;

    fn serializable_hash(&self, options: &SerializeOptions) -> BTreeMap<String, Value> {
        self.serializable_attributes()
            .into_iter()
            .filter(|(name, _)| options.keeps(name))
            .collect()
    }
}
