use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub text_ko: String,
    pub text_en: String,
    pub author: String,
    pub era: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Text in the preferred language, falling back to the other one when empty.
    pub fn text(&self, language: Language) -> &str {
        let (primary, secondary) = match language {
            Language::Ko => (&self.text_ko, &self.text_en),
            Language::En => (&self.text_en, &self.text_ko),
        };
        if primary.trim().is_empty() {
            secondary
        } else {
            primary
        }
    }

    pub fn fallback() -> Self {
        Self {
            id: String::new(),
            text_ko: "오늘 하루도 당신의 속도로 천천히 시작해요.".to_string(),
            text_en: "Start today slowly, at your own pace.".to_string(),
            author: "Hugmi".to_string(),
            era: None,
            image_url: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuote {
    #[serde(default)]
    pub text_ko: String,
    #[serde(default)]
    pub text_en: String,
    pub author: String,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default = "default_published", alias = "published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_falls_back_to_other_language() {
        let mut quote = Quote::fallback();
        quote.text_en = "  ".to_string();
        assert_eq!(quote.text(Language::En), quote.text_ko);
        assert_eq!(quote.text(Language::Ko), quote.text_ko);
    }

    #[test]
    fn test_new_quote_import_defaults() {
        let q: NewQuote =
            serde_json::from_str(r#"{"text_en": "Well begun is half done.", "author": "Aristotle", "image": "aristotle.png"}"#)
                .unwrap();
        assert!(q.is_published);
        assert_eq!(q.text_ko, "");
        assert_eq!(q.image_url.as_deref(), Some("aristotle.png"));
    }
}
