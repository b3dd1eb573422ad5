//! Processing instructions (`<?tag attr="value"?>`) embedded in templates.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::pos::Pos;

static PRAGMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<\?([A-Za-z][\w-]*)((?:\s+[A-Za-z_][\w.:-]*\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*\?>"#,
    )
    .expect("pragma pattern")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("pragma attribute pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    /// Where the instruction started in the text it was extracted from.
    pub pos: Pos,
}

impl Instruction {
    /// All instructions in `script`, in source order.
    pub fn from_source(script: &str) -> Vec<Instruction> {
        PRAGMA
            .captures_iter(script)
            .map(|caps| {
                let whole = caps.get(0).map_or(0, |m| m.start());
                let attributes: HashMap<String, String> = caps
                    .get(2)
                    .map(|atts| {
                        ATTRIBUTE
                            .captures_iter(atts.as_str())
                            .filter_map(|att| {
                                let value = att.get(2).or_else(|| att.get(3))?;
                                Some((att[1].to_owned(), value.as_str().to_owned()))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Instruction {
                    tag: caps[1].to_owned(),
                    attributes,
                    pos: Pos::locate(script, whole),
                }
            })
            .collect()
    }

    /// `script` with every instruction removed.
    pub fn clean(script: &str) -> String {
        PRAGMA.replace_all(script, "").into_owned()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_and_attributes() {
        let pis = Instruction::from_source(
            "<?param name=\"model\" type='Model'?>\n<p>x</p>",
        );
        assert_eq!(pis.len(), 1);
        assert_eq!(pis[0].tag, "param");
        assert_eq!(pis[0].attribute("name"), Some("model"));
        assert_eq!(pis[0].attribute("type"), Some("Model"));
        assert_eq!(pis[0].attribute("other"), None);
        assert_eq!(pis[0].pos, Pos::origin());
    }

    #[test]
    fn keeps_source_order() {
        let source = "<?param name=\"a\"?>\n<?input type=\"b\" ?>\n<?param name=\"c\"?>";
        let pis = Instruction::from_source(source);
        let tags: Vec<&str> = pis.iter().map(|pi| pi.tag.as_str()).collect();
        assert_eq!(tags, vec!["param", "input", "param"]);
        assert_eq!(pis[1].pos.line, 2);
        assert_eq!(pis[2].attribute("name"), Some("c"));
    }

    #[test]
    fn bare_instruction_has_no_attributes() {
        let pis = Instruction::from_source("<?debug?>");
        assert_eq!(pis[0].tag, "debug");
        assert!(pis[0].attributes.is_empty());
    }

    #[test]
    fn clean_removes_only_instructions() {
        assert_eq!(
            Instruction::clean("<?param name=\"a\"?>\n<p>${a}</p> <?x?>"),
            "\n<p>${a}</p> "
        );
    }

    #[test]
    fn geek_operator_is_not_an_instruction() {
        let source = "<p ?{a}>?</p>";
        assert!(Instruction::from_source(source).is_empty());
        assert_eq!(Instruction::clean(source), source);
    }
}
