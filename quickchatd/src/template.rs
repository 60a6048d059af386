use quickchat_common::RenderError;

/// Expand `{category}` / `{category:modifier}` placeholders in a template.
///
/// Literal text passes through unchanged. An unterminated `{` is emitted
/// verbatim to the end of the string rather than treated as an error.
pub fn render_template<F>(template: &str, mut pick: F) -> Result<String, RenderError>
where
    F: FnMut(&str) -> Result<String, RenderError>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let close = match after_open.find('}') {
            Some(close) => close,
            None => {
                // Unclosed brace: emit the remainder as-is
                out.push_str(&rest[open..]);
                return Ok(out);
            }
        };

        let token = after_open[..close].trim();
        let (key, modifier) = match token.split_once(':') {
            Some((key, modifier)) => (key, Some(modifier)),
            None => (token, None),
        };

        let replacement = pick(key.trim())?;
        out.push_str(&apply_modifier(&replacement, modifier)?);

        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Apply a `{key:modifier}` text transform
pub fn apply_modifier(text: &str, modifier: Option<&str>) -> Result<String, RenderError> {
    let modifier = match modifier {
        None => return Ok(text.to_string()),
        Some(m) => m.trim().to_lowercase(),
    };

    match modifier.as_str() {
        "lower" => Ok(text.to_lowercase()),
        "upper" => Ok(text.to_uppercase()),
        "capitalize" => {
            let mut chars = text.chars();
            Ok(match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            })
        }
        "title" => {
            // Word boundaries are whitespace only; other separators stay
            // inside the word.
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if c.is_whitespace() {
                    out.push(c);
                    at_word_start = true;
                } else if at_word_start {
                    out.extend(c.to_uppercase());
                    at_word_start = false;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            Ok(out)
        }
        _ => Err(RenderError::UnknownModifier(modifier)),
    }
}

/// Force a message down to plain ASCII: map common "smart" punctuation to
/// ASCII equivalents, then strip whatever non-ASCII remains.
pub fn normalize_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            c if c.is_ascii() => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(value: &'static str) -> impl FnMut(&str) -> Result<String, RenderError> {
        move |_| Ok(value.to_string())
    }

    #[test]
    fn test_plain_text_unchanged() {
        let out = render_template("no placeholders", fixed("x")).unwrap();
        assert_eq!(out, "no placeholders");
    }

    #[test]
    fn test_placeholder_substitution() {
        let out = render_template("Hello {friend}!", fixed("ole Buddy")).unwrap();
        assert_eq!(out, "Hello ole Buddy!");
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(render_template("{x:upper}", fixed("hi")).unwrap(), "HI");
        assert_eq!(render_template("{x:lower}", fixed("HI")).unwrap(), "hi");
        assert_eq!(
            render_template("{x:capitalize}", fixed("hi there")).unwrap(),
            "Hi there"
        );
        assert_eq!(
            render_template("{x:title}", fixed("hi there")).unwrap(),
            "Hi There"
        );
    }

    #[test]
    fn test_unknown_modifier() {
        let err = render_template("{x:shout}", fixed("hi")).unwrap_err();
        assert_eq!(err, RenderError::UnknownModifier("shout".to_string()));
    }

    #[test]
    fn test_unterminated_brace_passes_through() {
        let out = render_template("broken {unterminated", fixed("x")).unwrap();
        assert_eq!(out, "broken {unterminated");
    }

    #[test]
    fn test_key_is_trimmed_before_lookup() {
        let out = render_template("{ greeting :upper}", |key| {
            assert_eq!(key, "greeting");
            Ok("hey".to_string())
        })
        .unwrap();
        assert_eq!(out, "HEY");
    }

    #[test]
    fn test_pick_error_propagates() {
        let err = render_template("{nope}", |key| {
            Err(RenderError::UnknownCategory(key.to_string()))
        })
        .unwrap_err();
        assert_eq!(err, RenderError::UnknownCategory("nope".to_string()));
    }

    #[test]
    fn test_modifier_splits_at_first_colon() {
        // Only the first colon separates key and modifier; the rest of the
        // token belongs to the modifier and fails as unknown.
        let err = render_template("{x:upper:extra}", fixed("hi")).unwrap_err();
        assert_eq!(err, RenderError::UnknownModifier("upper:extra".to_string()));
    }

    #[test]
    fn test_normalize_ascii() {
        assert_eq!(
            normalize_ascii("\u{201C}nice\u{201D} shot \u{2014} wow\u{2026}"),
            "\"nice\" shot - wow..."
        );
        assert_eq!(normalize_ascii("caf\u{00E9}"), "caf");
        assert_eq!(normalize_ascii("plain"), "plain");
    }
}
