//! Form state for add/edit/upload dialogs

use super::FieldDef;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub numeric: bool,
    pub value: String,
}

/// Editable text fields with a focus cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub focused: usize,
    /// Last validation failure, shown under the fields
    pub error: Option<String>,
}

impl FormState {
    /// Blank form for `defs`
    pub fn new(defs: &[FieldDef]) -> Self {
        Self::with_values(defs, &[])
    }

    /// Form for `defs` pre-filled with `values` (missing values are blank)
    pub fn with_values(defs: &[FieldDef], values: &[String]) -> Self {
        let fields = defs
            .iter()
            .enumerate()
            .map(|(idx, def)| FormField {
                key: def.key,
                label: def.label,
                required: def.required,
                numeric: def.numeric,
                value: values.get(idx).cloned().unwrap_or_default(),
            })
            .collect();

        Self {
            fields,
            focused: 0,
            error: None,
        }
    }

    /// Single free-text field, used by the upload dialog
    pub fn single(label: &'static str) -> Self {
        Self {
            fields: vec![FormField {
                key: "files",
                label,
                required: true,
                numeric: false,
                value: String::new(),
            }],
            focused: 0,
            error: None,
        }
    }

    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Type a character into the focused field. Numeric fields drop non-digits.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if field.numeric && !c.is_ascii_digit() {
                return;
            }
            field.value.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
            self.error = None;
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
