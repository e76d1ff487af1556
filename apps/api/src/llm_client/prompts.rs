// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to prompts whose output is pasted straight into a markdown document.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "\
    Respond with the requested text only. \
    Do NOT add a preamble such as \"Here is\" or \"Sure\". \
    Do NOT wrap the answer in code fences. \
    Do NOT add notes or explanations after the text.";

/// Writing register used when matching rewritten (humanized) text.
pub const SIMPLE_REGISTER_INSTRUCTION: &str = "\
    Keep the same simple, direct style with short sentences. \
    Avoid buzzwords, filler transitions and overly formal phrasing.";

/// Fills `{name}` placeholders in `template` in a single left-to-right pass.
///
/// Only the template is scanned: text coming from `vars` is copied verbatim,
/// so a value that itself contains `{name}` is never substituted again.
/// Braces that do not name a known placeholder are kept as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let filled = fill_template("{a} and {b}, then {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(filled, "x and y, then x");
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_values() {
        let filled = fill_template(
            "style: {style}\ntail: {tail}",
            &[("style", "Use {tail} in templates"), ("tail", "the end")],
        );
        assert_eq!(filled, "style: Use {tail} in templates\ntail: the end");
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unbalanced_braces() {
        assert_eq!(fill_template("{unknown} {", &[("a", "x")]), "{unknown} {");
        assert_eq!(fill_template("{{a}}", &[("a", "x")]), "{x}");
    }
}
