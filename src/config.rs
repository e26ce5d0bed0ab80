use serde::{Deserialize, Serialize};

use crate::selector::parse_selector_groups;
use crate::{Error, Result};

/// Class-name tokens the controller toggles. The stylesheet that gives them
/// meaning lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassVocabulary {
    pub hidden: String,
    pub step_enter: String,
    pub card_selected: Vec<String>,
    pub card_idle: Vec<String>,
    pub field_error: Vec<String>,
}

impl Default for ClassVocabulary {
    fn default() -> Self {
        Self {
            hidden: "hidden".into(),
            step_enter: "animate-fade-in-up".into(),
            card_selected: vec![
                "ring-2".into(),
                "ring-brand-primary".into(),
                "bg-brand-primary/5".into(),
                "border-brand-primary".into(),
            ],
            card_idle: vec!["border-gray-100".into()],
            field_error: vec![
                "border-red-500".into(),
                "ring-1".into(),
                "ring-red-500".into(),
            ],
        }
    }
}

/// How the controller finds its elements, and what it shows the user.
///
/// The defaults describe the quote request page: a `#quote-form` made of
/// `.form-step` sections, `.btn-next`/`.btn-prev` triggers, a `#progress-bar`,
/// the `interest_type` choice switching between `#business-fields` and
/// `#residential-fields`, and `.radio-card` tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub form: String,
    pub step: String,
    pub next: String,
    pub prev: String,
    pub progress: String,
    pub interest_field: String,
    pub business_value: String,
    pub business_section: String,
    pub residential_section: String,
    pub radio_card: String,
    pub classes: ClassVocabulary,
    pub acknowledgment: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            form: "#quote-form".into(),
            step: ".form-step".into(),
            next: ".btn-next".into(),
            prev: ".btn-prev".into(),
            progress: "#progress-bar".into(),
            interest_field: "interest_type".into(),
            business_value: "business".into(),
            business_section: "#business-fields".into(),
            residential_section: "#residential-fields".into(),
            radio_card: ".radio-card".into(),
            classes: ClassVocabulary::default(),
            acknowledgment: "Thank you! Your quote request has been received. We will contact you shortly.".into(),
        }
    }
}

impl WizardConfig {
    /// Parses a JSON object; omitted keys keep their defaults.
    pub fn from_json(src: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(src).map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, selector) in [
            ("form", &self.form),
            ("step", &self.step),
            ("next", &self.next),
            ("prev", &self.prev),
            ("progress", &self.progress),
            ("business_section", &self.business_section),
            ("residential_section", &self.residential_section),
            ("radio_card", &self.radio_card),
        ] {
            parse_selector_groups(selector)
                .map_err(|err| Error::InvalidConfig(format!("{key}: {err}")))?;
        }

        if self.interest_field.trim().is_empty() {
            return Err(Error::InvalidConfig("interest_field is empty".into()));
        }

        let classes = &self.classes;
        let single = [("hidden", &classes.hidden), ("step_enter", &classes.step_enter)];
        for (key, token) in single {
            check_class_token(key, token)?;
        }
        let lists = [
            ("card_selected", &classes.card_selected),
            ("card_idle", &classes.card_idle),
            ("field_error", &classes.field_error),
        ];
        for (key, tokens) in lists {
            for token in tokens {
                check_class_token(key, token)?;
            }
        }
        Ok(())
    }
}

fn check_class_token(key: &str, token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(Error::InvalidConfig(format!(
            "{key} class token {token:?} must be a single non-empty token"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() -> Result<()> {
        WizardConfig::default().validate()
    }

    #[test]
    fn json_overrides_merge_with_defaults() -> Result<()> {
        let config = WizardConfig::from_json(
            r##"{ "form": "#lead-form", "classes": { "hidden": "is-hidden" } }"##,
        )?;
        assert_eq!(config.form, "#lead-form");
        assert_eq!(config.step, ".form-step");
        assert_eq!(config.classes.hidden, "is-hidden");
        assert_eq!(config.classes.card_idle, vec!["border-gray-100".to_string()]);
        Ok(())
    }

    #[test]
    fn rejects_bad_selectors_and_tokens() {
        let err = WizardConfig::from_json(r#"{ "next": "" }"#).expect_err("empty selector");
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.starts_with("next:")));

        let err = WizardConfig::from_json(r#"{ "classes": { "field_error": ["a b"] } }"#)
            .expect_err("token with whitespace");
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("field_error")));

        let err = WizardConfig::from_json("[1, 2]").expect_err("not an object");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
