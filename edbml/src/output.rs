//! Output accumulator and unparser.
//!
//! The compiled body is collected as a list of [`Node`]s rather than raw
//! text. Hoisted helper declarations ([`Outline`]s) are kept on the side,
//! each anchored to the node that opened its markup block, and are woven in
//! by [`Output::unparse`] in a single pass. All quoting of markup text goes
//! through [`escape`].

use std::fmt;

/// Name of the output object in generated code.
pub const OUT: &str = "out";
/// Name of the attribute helper in generated code.
pub const ATT: &str = "att";

/// Escape text for a single-quoted string literal.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

/// The hoisted binding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Callback invoked on an event, with `value, checked`.
    Poke,
    /// Getter invoked and read.
    Geek,
}

/// Attribute helper calls produced by the `@` shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttCall {
    Html(String),
    Pop(String),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Script text, verbatim.
    Code(String),
    /// Opens a markup string literal on the output object.
    Open,
    /// Literal markup text.
    Text(String),
    /// Inline expression concatenated into the open literal.
    Peek(String),
    Att(AttCall),
    /// Call-site reference to a hoisted binding.
    Inline { binding: Binding, name: String },
    /// Source line break inside an open literal.
    Break,
    /// Closes the open literal.
    Close,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Code(code) => f.write_str(code),
            Node::Open => write!(f, "{OUT}.html += '"),
            Node::Text(text) => f.write_str(&escape(text)),
            Node::Peek(expr) => write!(f, "' + ({expr}) + '"),
            Node::Att(AttCall::Html(name)) => {
                write!(f, "' + {ATT}.$html ( '{}' ) + '", escape(name))
            }
            Node::Att(AttCall::Pop(name)) => {
                write!(f, "' + {ATT}.$pop ( '{}' ) + '", escape(name))
            }
            Node::Att(AttCall::All) => write!(f, "' + {ATT}.$all() + '"),
            Node::Inline {
                binding: Binding::Poke,
                name,
            } => write!(f, "edb.$run(event,&quot;' + {name} + '&quot;);"),
            Node::Inline {
                binding: Binding::Geek,
                name,
            } => write!(f, "edb.$get(&quot;' + {name} + '&quot;);"),
            Node::Break => f.write_str("' +\n'"),
            Node::Close => f.write_str("';"),
        }
    }
}

/// A hoisted helper declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Index of the node the declaration is placed before.
    pub anchor: usize,
    pub binding: Binding,
    pub name: String,
    /// Captured source text.
    pub body: String,
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { name, body, .. } = self;
        match self.binding {
            Binding::Poke => write!(
                f,
                "var {name} = edb.$set(function(value, checked) {{\n{body};\n}}, this);"
            ),
            Binding::Geek => write!(
                f,
                "var {name} = edb.$set(function() {{\nreturn {body};\n}}, this);"
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct Output {
    nodes: Vec<Node>,
    outlines: Vec<Outline>,
    temp: Option<String>,
}

impl Output {
    pub fn new(prologue: &str) -> Self {
        let mut output = Self::default();
        output.code(prologue);
        output
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }

    pub fn code(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        match self.nodes.last_mut() {
            Some(Node::Code(last)) => last.push_str(code),
            _ => self.nodes.push(Node::Code(code.to_owned())),
        }
    }

    pub fn code_char(&mut self, c: char) {
        match self.nodes.last_mut() {
            Some(Node::Code(last)) => last.push(c),
            _ => self.nodes.push(Node::Code(c.to_string())),
        }
    }

    pub fn text(&mut self, c: char) {
        match self.nodes.last_mut() {
            Some(Node::Text(last)) => last.push(c),
            _ => self.nodes.push(Node::Text(c.to_string())),
        }
    }

    /// Open a markup literal and return its anchor.
    pub fn open(&mut self) -> usize {
        self.nodes.push(Node::Open);
        self.nodes.len() - 1
    }

    pub fn close(&mut self) {
        self.nodes.push(Node::Close);
    }

    pub fn line_break(&mut self) {
        self.nodes.push(Node::Break);
    }

    pub fn att(&mut self, call: AttCall) {
        self.nodes.push(Node::Att(call));
    }

    pub fn inline(&mut self, binding: Binding, name: String) {
        self.nodes.push(Node::Inline { binding, name });
    }

    pub fn peek_open(&mut self) {
        self.nodes.push(Node::Peek(String::new()));
    }

    pub fn peek_push(&mut self, c: char) {
        if let Some(Node::Peek(expr)) = self.nodes.last_mut() {
            expr.push(c);
        }
    }

    pub fn temp_open(&mut self) {
        self.temp = Some(String::new());
    }

    pub fn temp_push(&mut self, c: char) {
        if let Some(temp) = self.temp.as_mut() {
            temp.push(c);
        }
    }

    pub fn take_temp(&mut self) -> String {
        self.temp.take().unwrap_or_default()
    }

    pub fn hoist(&mut self, outline: Outline) {
        self.outlines.push(outline);
    }

    /// Remove a trailing `c` from the last markup text, if it is there.
    pub fn trim_text_end(&mut self, c: char) -> bool {
        match self.nodes.last_mut() {
            Some(Node::Text(text)) if text.ends_with(c) => {
                text.pop();
                if text.is_empty() {
                    self.nodes.pop();
                }
                true
            }
            _ => false,
        }
    }

    /// Render the body, placing each outline on its own line before its
    /// anchor node. Outlines sharing an anchor keep their creation order.
    pub fn unparse(&self) -> String {
        let mut outlines: Vec<&Outline> = self.outlines.iter().collect();
        outlines.sort_by_key(|outline| outline.anchor);
        let mut outlines = outlines.into_iter().peekable();

        let mut out = String::new();
        for (index, node) in self.nodes.iter().enumerate() {
            while let Some(outline) = outlines.next_if(|o| o.anchor <= index) {
                out.push_str(&outline.to_string());
                out.push('\n');
            }
            out.push_str(&node.to_string());
        }
        for outline in outlines {
            out.push('\n');
            out.push_str(&outline.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(escape(r"it's a \ test"), r"it\'s a \\ test");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn adjacent_text_and_code_merge() {
        let mut output = Output::new("a");
        output.code_char('b');
        output.code("");
        output.open();
        output.text('x');
        output.text('y');
        assert_eq!(
            output.nodes(),
            &[
                Node::Code("ab".to_string()),
                Node::Open,
                Node::Text("xy".to_string()),
            ]
        );
    }

    #[test]
    fn unparse_markup_block() {
        let mut output = Output::new("");
        output.open();
        output.text('<');
        output.text('\'');
        output.peek_open();
        output.peek_push('x');
        output.att(AttCall::Html("class".to_string()));
        output.line_break();
        output.close();
        assert_eq!(
            output.unparse(),
            "out.html += '<\\'' + (x) + '' + att.$html ( 'class' ) + '' +\n'';"
        );
    }

    #[test]
    fn outlines_render_before_anchor_in_order() {
        let mut output = Output::new("x;\n");
        let spot = output.open();
        output.inline(Binding::Poke, "$edb1".to_string());
        output.hoist(Outline {
            anchor: spot,
            binding: Binding::Poke,
            name: "$edb1".to_string(),
            body: "a()".to_string(),
        });
        output.hoist(Outline {
            anchor: spot,
            binding: Binding::Geek,
            name: "$edb2".to_string(),
            body: "b".to_string(),
        });
        output.close();
        assert_eq!(
            output.unparse(),
            "x;\n\
             var $edb1 = edb.$set(function(value, checked) {\na();\n}, this);\n\
             var $edb2 = edb.$set(function() {\nreturn b;\n}, this);\n\
             out.html += 'edb.$run(event,&quot;' + $edb1 + '&quot;);';"
        );
    }

    #[test]
    fn outline_past_last_node_renders_at_end() {
        let mut output = Output::new("x;");
        output.hoist(Outline {
            anchor: 5,
            binding: Binding::Geek,
            name: "$edb1".to_string(),
            body: "b".to_string(),
        });
        assert_eq!(
            output.unparse(),
            "x;\nvar $edb1 = edb.$set(function() {\nreturn b;\n}, this);"
        );
    }

    #[test]
    fn trim_text_end_only_touches_trailing_text() {
        let mut output = Output::new("");
        output.open();
        output.text('-');
        assert!(output.trim_text_end('-'));
        assert_eq!(output.nodes(), &[Node::Open]);
        assert!(!output.trim_text_end('-'));
    }

    #[test]
    fn temp_buffer_is_cleared_after_take() {
        let mut output = Output::new("");
        output.temp_push('x');
        output.temp_open();
        output.temp_push('a');
        assert_eq!(output.take_temp(), "a");
        assert_eq!(output.take_temp(), "");
    }
}
