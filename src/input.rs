use std::num::IntErrorKind;

use crate::timer::{MAX_HOURS, MAX_MINUTES, MAX_SECONDS};

/// One of the three duration input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Hours, Field::Minutes, Field::Seconds];

    /// Largest value the field accepts.
    pub fn max(self) -> u32 {
        match self {
            Field::Hours => MAX_HOURS,
            Field::Minutes => MAX_MINUTES,
            Field::Seconds => MAX_SECONDS,
        }
    }

    pub fn next(self) -> Field {
        match self {
            Field::Hours => Field::Minutes,
            Field::Minutes => Field::Seconds,
            Field::Seconds => Field::Hours,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Hours => Field::Seconds,
            Field::Minutes => Field::Hours,
            Field::Seconds => Field::Minutes,
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Hours => 0,
            Field::Minutes => 1,
            Field::Seconds => 2,
        }
    }
}

/// Normalize the text of a field to a value in `0..=max`.
///
/// Empty or non-numeric text reads as 0, anything out of range is clamped.
pub fn parse_field(text: &str, max: u32) -> u32 {
    match text.trim().parse::<i64>() {
        Ok(value) => value.clamp(0, max as i64) as u32,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => max,
        Err(_) => 0,
    }
}

/// Maximum number of digits typed into a single field.
const FIELD_DIGITS: usize = 2;

/// The hours, minutes and seconds entry fields, edited like spinboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    text: [String; 3],
    focus: Field,
}

impl Fields {
    /// Create the fields with initial values.
    ///
    /// Values are clamped into range.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        let mut fields = Self {
            text: Default::default(),
            focus: Field::Hours,
        };
        fields.set(Field::Hours, hours);
        fields.set(Field::Minutes, minutes);
        fields.set(Field::Seconds, seconds);
        fields
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Raw text of a field, as typed.
    pub fn text(&self, field: Field) -> &str {
        &self.text[field.index()]
    }

    /// Normalized value of a field.
    pub fn value(&self, field: Field) -> u32 {
        parse_field(self.text(field), field.max())
    }

    /// Normalized `(hours, minutes, seconds)`.
    pub fn values(&self) -> (u32, u32, u32) {
        (
            self.value(Field::Hours),
            self.value(Field::Minutes),
            self.value(Field::Seconds),
        )
    }

    /// Type a character into the focused field.
    ///
    /// Anything but an ASCII digit is ignored. Typing into a full field
    /// starts it over.
    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }

        let text = &mut self.text[self.focus.index()];
        if text.len() >= FIELD_DIGITS || text.as_str() == "00" {
            text.clear();
        }
        text.push(c);
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        self.text[self.focus.index()].pop();
    }

    /// Step the focused field up or down, wrapping around at its bounds.
    pub fn step(&mut self, delta: i32) {
        let field = self.focus;
        let span = field.max() as i64 + 1;
        let value = (self.value(field) as i64 + delta as i64).rem_euclid(span);
        self.set(field, value as u32);
    }

    /// Set every field back to `00` and focus the hours.
    pub fn clear(&mut self) {
        *self = Self::new(0, 0, 0);
    }

    fn set(&mut self, field: Field, value: u32) {
        self.text[field.index()] = format!("{:02}", value.min(field.max()));
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("", 59), 0);
        assert_eq!(parse_field("  ", 59), 0);
        assert_eq!(parse_field("abc", 59), 0);
        assert_eq!(parse_field("07", 59), 7);
        assert_eq!(parse_field(" 42 ", 59), 42);
        assert_eq!(parse_field("75", 59), 59);
        assert_eq!(parse_field("30", 23), 23);
        assert_eq!(parse_field("-5", 59), 0);
        assert_eq!(parse_field("99999999999999999999999", 23), 23);
    }

    #[test]
    fn test_new_clamps() {
        let fields = Fields::new(40, 70, 5);
        assert_eq!(fields.text(Field::Hours), "23");
        assert_eq!(fields.text(Field::Minutes), "59");
        assert_eq!(fields.text(Field::Seconds), "05");
        assert_eq!(fields.values(), (23, 59, 5));
    }

    #[test]
    fn test_typing_digits() {
        let mut fields = Fields::default();

        fields.push_digit('1');
        assert_eq!(fields.text(Field::Hours), "1");
        fields.push_digit('x');
        assert_eq!(fields.text(Field::Hours), "1");
        fields.push_digit('5');
        assert_eq!(fields.text(Field::Hours), "15");
        fields.push_digit('9');
        assert_eq!(fields.text(Field::Hours), "9");

        fields.backspace();
        fields.backspace();
        assert_eq!(fields.text(Field::Hours), "");
        assert_eq!(fields.value(Field::Hours), 0);
    }

    #[test]
    fn test_focus_cycles() {
        let mut fields = Fields::default();
        assert_eq!(fields.focus(), Field::Hours);

        fields.focus_next();
        fields.push_digit('3');
        assert_eq!(fields.text(Field::Minutes), "3");

        fields.focus_next();
        fields.focus_next();
        assert_eq!(fields.focus(), Field::Hours);

        fields.focus_prev();
        assert_eq!(fields.focus(), Field::Seconds);
    }

    #[test]
    fn test_step_wraps() {
        let mut fields = Fields::default();

        fields.step(-1);
        assert_eq!(fields.text(Field::Hours), "23");
        fields.step(1);
        assert_eq!(fields.text(Field::Hours), "00");

        fields.focus_prev();
        fields.step(-1);
        assert_eq!(fields.text(Field::Seconds), "59");
        fields.step(2);
        assert_eq!(fields.text(Field::Seconds), "01");
    }

    #[test]
    fn test_clear() {
        let mut fields = Fields::new(1, 2, 3);
        fields.focus_next();
        fields.clear();

        assert_eq!(fields, Fields::default());
        assert_eq!(fields.values(), (0, 0, 0));
    }
}
