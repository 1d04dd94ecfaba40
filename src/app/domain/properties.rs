use serde::{Deserialize, Serialize};

use super::preferences::Preferences;

/// The seven descriptive properties a rich-text document carries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub comment: Option<String>,
    pub keywords: Vec<String>,
}

/// Property names in presentation order.
pub const KNOWN_DOCUMENT_PROPERTIES: [&str; 7] = [
    "author", "copyright", "company", "title", "subject", "comment", "keywords",
];

/// Property name to the codec attribute it is stored under.
pub fn property_to_attribute_mappings() -> &'static [(&'static str, &'static str)] {
    &[
        ("author", "Author"),
        ("copyright", "Copyright"),
        ("company", "Company"),
        ("title", "Title"),
        ("subject", "Subject"),
        ("comment", "Comment"),
        ("keywords", "Keywords"),
    ]
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl DocumentProperties {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reset to the user's defaults: author, company and copyright come from
    /// preferences, everything else is emptied.
    pub fn set_to_defaults(&mut self, prefs: &Preferences) {
        *self = Self {
            author: non_empty(&prefs.author),
            copyright: non_empty(&prefs.copyright),
            company: non_empty(&prefs.company),
            ..Self::default()
        };
    }

    pub fn has_document_properties(&self) -> bool {
        self.author.is_some()
            || self.copyright.is_some()
            || self.company.is_some()
            || self.title.is_some()
            || self.subject.is_some()
            || self.comment.is_some()
            || !self.keywords.is_empty()
    }

    /// Look up a text property by name. Keywords are joined by `join_keywords`.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "author" => self.author.clone(),
            "copyright" => self.copyright.clone(),
            "company" => self.company.clone(),
            "title" => self.title.clone(),
            "subject" => self.subject.clone(),
            "comment" => self.comment.clone(),
            "keywords" if !self.keywords.is_empty() => Some(join_keywords(&self.keywords)),
            _ => None,
        }
    }

    /// Set a property by name; empty values clear it. Returns false for
    /// unknown names.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "author" => &mut self.author,
            "copyright" => &mut self.copyright,
            "company" => &mut self.company,
            "title" => &mut self.title,
            "subject" => &mut self.subject,
            "comment" => &mut self.comment,
            "keywords" => {
                self.keywords = split_keywords(value);
                return true;
            }
            _ => return false,
        };
        *slot = non_empty(value);
        true
    }
}

/// Join keywords with ", ". Commas and backslashes inside a keyword are
/// backslash-escaped so `split_keywords` gives the same list back.
pub fn join_keywords(keywords: &[String]) -> String {
    let mut out = String::new();
    for (i, keyword) in keywords.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        for c in keyword.chars() {
            if c == ',' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Split a comma separated keyword list, honouring `\,` and `\\` escapes.
pub fn split_keywords(value: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (',' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            ',' => keywords.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    keywords.push(current);
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_preferences() {
        let prefs = Preferences {
            author: "Grace".to_string(),
            company: "Navy".to_string(),
            ..Default::default()
        };
        let mut props = DocumentProperties {
            title: Some("Old".to_string()),
            ..Default::default()
        };
        props.set_to_defaults(&prefs);
        assert_eq!(props.author.as_deref(), Some("Grace"));
        assert_eq!(props.company.as_deref(), Some("Navy"));
        assert_eq!(props.copyright, None);
        assert_eq!(props.title, None);
    }

    #[test]
    fn test_has_properties_and_clear() {
        let mut props = DocumentProperties::default();
        assert!(!props.has_document_properties());
        props.keywords = vec!["draft".to_string()];
        assert!(props.has_document_properties());
        props.clear();
        assert!(!props.has_document_properties());
    }

    #[test]
    fn test_get_set_by_name() {
        let mut props = DocumentProperties::default();
        assert!(props.set("subject", "Minutes"));
        assert!(props.set("keywords", "a, b,, c "));
        assert!(!props.set("color", "red"));
        assert_eq!(props.get("subject").as_deref(), Some("Minutes"));
        assert_eq!(props.keywords, vec!["a", "b", "c"]);
        assert_eq!(props.get("keywords").as_deref(), Some("a, b, c"));
        props.set("subject", "");
        assert_eq!(props.subject, None);
    }

    #[test]
    fn test_keywords_with_commas_survive_join() {
        let keywords = vec!["red, green".to_string(), "C:\\dir".to_string(), "plain".to_string()];
        let joined = join_keywords(&keywords);
        assert_eq!(joined, "red\\, green, C:\\\\dir, plain");
        assert_eq!(split_keywords(&joined), keywords);
        assert_eq!(split_keywords("a\\b"), vec!["a\\b"]);
    }

    #[test]
    fn test_mappings_cover_known_properties() {
        let mapped: Vec<&str> = property_to_attribute_mappings().iter().map(|(p, _)| *p).collect();
        assert_eq!(mapped, KNOWN_DOCUMENT_PROPERTIES);
    }
}
