use regex::Regex;

use super::controller::{FieldDecoration, FieldKey, FormController, FormResult, read_lock};

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Default + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> &'static [FieldKey];
    fn value(&self, key: FieldKey) -> Option<&str>;
    fn set_value(&mut self, key: FieldKey, value: String) -> bool;

    fn key_for(name: &str) -> Option<FieldKey> {
        Self::field_keys()
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
    }

    fn trimmed(&self) -> Self {
        let mut out = self.clone();
        for key in Self::field_keys() {
            if let Some(value) = self.value(*key) {
                let trimmed = value.trim().to_string();
                out.set_value(*key, trimmed);
            }
        }
        out
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: "Valid".to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Clone, Debug)]
pub struct ValidationRule {
    min_len: Option<usize>,
    pattern: Option<Regex>,
    message: String,
}

impl ValidationRule {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            min_len: None,
            pattern: None,
            message: message.into(),
        }
    }

    // Counted in chars, not bytes.
    pub fn min_len(mut self, value: usize) -> Self {
        self.min_len = Some(value);
        self
    }

    pub fn pattern(mut self, value: Regex) -> Self {
        self.pattern = Some(value);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn check(&self, field: &str, value: &str) -> ValidationResult {
        if value.is_empty() {
            return ValidationResult::invalid(format!("Please enter your {field}."));
        }
        if self
            .min_len
            .is_some_and(|min| value.chars().count() < min)
        {
            return ValidationResult::invalid(self.message.clone());
        }
        if self
            .pattern
            .as_ref()
            .is_some_and(|pattern| !pattern.is_match(value))
        {
            return ValidationResult::invalid(self.message.clone());
        }
        ValidationResult::ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<(FieldKey, ValidationRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, key: FieldKey, rule: ValidationRule) -> Self {
        match self.rules.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((key, rule)),
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.rules.iter().map(|(key, _)| *key)
    }

    pub fn get(&self, field_name: &str) -> Option<&ValidationRule> {
        self.rules
            .iter()
            .find(|(key, _)| key.as_str() == field_name)
            .map(|(_, rule)| rule)
    }

    pub fn validate_field(&self, field_name: &str, raw_value: &str) -> ValidationResult {
        let Some(rule) = self.get(field_name) else {
            return ValidationResult::ok();
        };
        rule.check(field_name, raw_value.trim())
    }

    pub fn validate_form<T: FormModel>(&self, model: &T) -> ValidationResult {
        self.first_failure(model)
            .map(|(_, result)| result)
            .unwrap_or_else(ValidationResult::ok)
    }

    pub fn validate_form_all<T: FormModel>(&self, model: &T) -> Vec<(FieldKey, ValidationResult)> {
        self.rules
            .iter()
            .map(|(key, rule)| {
                let value = model.value(*key).unwrap_or_default();
                (*key, rule.check(key.as_str(), value.trim()))
            })
            .filter(|(_, result)| !result.valid)
            .collect()
    }

    pub fn first_failure<T: FormModel>(&self, model: &T) -> Option<(FieldKey, ValidationResult)> {
        self.rules.iter().find_map(|(key, rule)| {
            let value = model.value(*key).unwrap_or_default();
            let result = rule.check(key.as_str(), value.trim());
            (!result.valid).then_some((*key, result))
        })
    }
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn validate_field(&self, field_name: &str, raw_value: &str) -> ValidationResult {
        self.rules.validate_field(field_name, raw_value)
    }

    pub fn validate_form(&self) -> FormResult<ValidationResult> {
        let model = read_lock(&self.state, "reading model for form validation")?
            .model
            .clone();
        Ok(self.rules.validate_form(&model))
    }

    pub(super) fn validate_current(&self, key: FieldKey) -> FormResult<Option<ValidationResult>> {
        let value = {
            let state = read_lock(&self.state, "reading field value for validation")?;
            state.model.value(key).unwrap_or_default().trim().to_string()
        };
        if value.is_empty() {
            return Ok(None);
        }

        let result = self.rules.validate_field(key.as_str(), &value);
        let decoration = if result.valid {
            FieldDecoration::Success
        } else {
            FieldDecoration::Error(result.message.clone())
        };
        self.decorate(key, decoration)?;
        Ok(Some(result))
    }
}
