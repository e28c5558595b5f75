//! Naming collaborator boundary.
//!
//! Turning `first_name` into "First name" or a type into a display label is a
//! translation concern that lives outside the core. The core only calls through
//! [`Naming`] and keeps working without it: error messages then use the raw
//! attribute key.

/// Display names for a model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    /// Type name as declared (e.g. "Person")
    pub name: String,
    /// Human label (e.g. "Person")
    pub human: String,
    /// Key used for params and forms (e.g. "person")
    pub param_key: String,
}

impl ModelName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            human: humanize(&underscore(&name)),
            param_key: underscore(&name),
            name,
        }
    }
}

pub trait Naming: Send + Sync {
    /// Label for an attribute, used in full error messages.
    fn human_attribute_name(&self, attribute: &str) -> String;

    fn model_name(&self) -> ModelName;
}

/// [`Naming`] that derives labels from the keys themselves.
#[derive(Debug, Clone)]
pub struct Humanized {
    model: ModelName,
}

impl Humanized {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: ModelName::new(model),
        }
    }
}

impl Naming for Humanized {
    fn human_attribute_name(&self, attribute: &str) -> String {
        humanize(attribute)
    }

    fn model_name(&self) -> ModelName {
        self.model.clone()
    }
}

/// `"first_name"` → `"First name"`, `"author_id"` → `"Author"`.
pub fn humanize(key: &str) -> String {
    let key = key.strip_suffix("_id").unwrap_or(key);
    let spaced = key.replace('_', " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `"BlogPost"` → `"blog_post"`.
fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_keys() {
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize("first_name"), "First name");
        assert_eq!(humanize("author_id"), "Author");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn model_name_derivations() {
        let name = ModelName::new("BlogPost");
        assert_eq!(name.name, "BlogPost");
        assert_eq!(name.param_key, "blog_post");
        assert_eq!(name.human, "Blog post");
    }

    #[test]
    fn humanized_naming() {
        let naming = Humanized::new("Person");
        assert_eq!(naming.human_attribute_name("last_name"), "Last name");
        assert_eq!(naming.model_name().param_key, "person");
    }
}
