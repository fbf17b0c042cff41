//! Formatting of user-facing messages.

/// Formats a message template with named parameters.
pub trait Translate {
    /// Returns `template` with each `{name}` placeholder replaced by the value
    /// paired with `name` in `params`.
    fn translate(&self, template: &str, params: &[(&str, &str)]) -> String;
}

impl<T: Translate + ?Sized> Translate for &T {
    fn translate(&self, template: &str, params: &[(&str, &str)]) -> String {
        (**self).translate(template, params)
    }
}

/// Placeholder substitution without any message catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct Translator;

impl Translate for Translator {
    fn translate(&self, template: &str, params: &[(&str, &str)]) -> String {
        interpolate(template, params)
    }
}

/// Replaces `{name}` placeholders; unknown placeholders are kept verbatim.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
