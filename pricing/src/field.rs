// Text buffer behind a price input widget.
// The UI layer forwards its edit and focus-lost events here and writes
// `value()` back into the widget afterwards.

use crate::colombian_format::{format_price_on_blur, parse_price, validate_price_input};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceField {
    buffer: String,
}

impl PriceField {
    /// Empty buffer, as for a freshly focused widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from text already present in the widget, e.g. a stored price.
    /// The text is kept as given until the next edit or blur.
    pub fn with_value(text: impl Into<String>) -> Self {
        Self { buffer: text.into() }
    }

    /// Handles an edit event: `raw` is the widget's whole text after the edit.
    pub fn input(&mut self, raw: &str) -> &str {
        self.buffer = validate_price_input(raw);
        &self.buffer
    }

    /// Handles focus loss by snapping the buffer to canonical price text.
    pub fn blur(&mut self) -> &str {
        let normalized = format_price_on_blur(&self.buffer);
        if normalized != self.buffer {
            tracing::debug!(from = %self.buffer, to = %normalized, "Normalized price field on blur");
        }
        self.buffer = normalized;
        &self.buffer
    }

    /// Text to write back into the widget.
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Numeric value of the current text; `NaN` when it holds no numeral.
    pub fn amount(&self) -> f64 {
        parse_price(self.buffer.as_str())
    }

    /// Empties the buffer, e.g. when the form is reset.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
