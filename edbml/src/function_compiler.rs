//! The compile pipeline: a fixed sequence of source-to-source steps ending in
//! the character-level [`Compiler`].

use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, LazyLock};

use log::{debug, trace, warn};
use parking_lot::Mutex;
use regex::Regex;

use crate::compiler::Compiler;
use crate::error::{CompileError, CompileErrorKind};
use crate::instruction::Instruction;
use crate::output::{ATT, OUT};
use crate::pos::Pos;
use crate::result::Compiled;

/// Attributes of the script element a template came from.
pub type Directives = HashMap<String, String>;

/// A template script element inside the template.
static NESTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script.*type=["']?text/edbml["']?.*>([\s\S]+?)"#)
        .expect("nested template pattern")
});

/// Declarations and helper definitions placed ahead of the body.
///
/// A [`DirectHook`] fills it in; the define step writes it out after the
/// `out` and `att` declarations.
#[derive(Debug, Default)]
pub struct Head {
    declarations: Vec<String>,
    functiondefs: Vec<String>,
}

impl Head {
    /// Declare a variable alongside `out` and `att`. Declared once.
    pub fn declare(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.declarations.contains(&name) {
            self.declarations.push(name);
        }
    }

    /// Add a function definition after the declarations.
    pub fn define(&mut self, def: impl Into<String>) {
        self.functiondefs.push(def.into());
    }

    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    pub fn functiondefs(&self) -> &[String] {
        &self.functiondefs
    }
}

/// Rewrites the script from the directives before the header is defined.
pub type DirectHook = fn(String, &mut Head, &Directives) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Uncomment,
    Validate,
    Extract,
    Direct,
    Define,
    Compile,
}

const SEQUENCE: [Step; 6] = [
    Step::Uncomment,
    Step::Validate,
    Step::Extract,
    Step::Direct,
    Step::Define,
    Step::Compile,
];

/// Compiles template source into a function body.
///
/// The helper-name counter lives in the compiler, so one instance never
/// hands out the same name twice. Use one instance per thread, or a
/// [`SharedCompiler`].
#[derive(Debug, Default)]
pub struct FunctionCompiler {
    compiler: Compiler,
    directives: Directives,
    instructions: Vec<Instruction>,
    params: Vec<String>,
    hook: Option<DirectHook>,
}

impl FunctionCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(mut self, hook: DirectHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Helper names issued by this compiler so far.
    pub fn issued(&self) -> usize {
        self.compiler.names().issued()
    }

    pub fn compile(
        &mut self,
        source: &str,
        directives: &Directives,
    ) -> Result<Compiled, CompileError> {
        self.directives = directives.clone();
        self.params.clear();
        self.instructions.clear();

        let mut head = Head::default();
        let script = SEQUENCE
            .iter()
            .try_fold(source.to_owned(), |script, &step| {
                self.step(step, script, &mut head)
            })?;

        debug!(
            "compiled template: {} params, {} instructions, {} names issued",
            self.params.len(),
            self.instructions.len(),
            self.issued()
        );
        Ok(Compiled::new(
            script,
            mem::take(&mut self.params),
            mem::take(&mut self.instructions),
        ))
    }

    fn step(
        &mut self,
        step: Step,
        script: String,
        head: &mut Head,
    ) -> Result<String, CompileError> {
        trace!("{step:?}: {} bytes in", script.len());
        let script = match step {
            Step::Uncomment => uncomment(&script),
            Step::Validate => validate(script)?,
            Step::Extract => self.extract(&script),
            Step::Direct => self.direct(script, head),
            Step::Define => self.define(script, head),
            Step::Compile => self.compiler.compile(&script),
        };
        Ok(script)
    }

    fn extract(&mut self, script: &str) -> String {
        for pi in Instruction::from_source(script) {
            self.instruct(&pi);
            self.instructions.push(pi);
        }
        Instruction::clean(script)
    }

    fn instruct(&mut self, pi: &Instruction) {
        match pi.tag.as_str() {
            "param" => match pi.attribute("name") {
                Some(name) => self.params.push(name.to_owned()),
                None => warn!("param instruction at {} has no name", pi.pos),
            },
            other => debug!("instruction '{other}' at {} has no effect", pi.pos),
        }
    }

    /// Directive hook. Nothing by default.
    fn direct(&self, script: String, head: &mut Head) -> String {
        match self.hook {
            Some(hook) => hook(script, head, &self.directives),
            None => {
                if !self.directives.is_empty() {
                    trace!("{} directives passed through", self.directives.len());
                }
                script
            }
        }
    }

    fn define(&self, script: String, head: &Head) -> String {
        let mut html = String::from("var ");
        if !self.params.iter().any(|param| param == OUT) {
            html.push_str(&format!("{OUT} = $function.$out, "));
        }
        html.push_str(&format!("{ATT} = new edb.Att () "));
        for name in head.declarations() {
            html.push_str(", ");
            html.push_str(name);
        }
        html.push_str(";\n");
        for def in head.functiondefs() {
            html.push_str(def);
            html.push('\n');
        }
        html + &script
    }
}

/// Strip markup and block comments. Each kind is stripped independently.
pub fn uncomment(script: &str) -> String {
    let script = strip_out(script, "<!--", "-->");
    strip_out(&script, "/*", "*/")
}

/// Remove every `open ... close` span, one character at a time. A span
/// starts at a character that begins `open` and ends at the first character
/// that completes `close`, counting characters of `open` itself, so `<!-->`
/// is a whole comment. Spans do not nest. An open delimiter without a close
/// is left in place.
pub fn strip_out(script: &str, open: &str, close: &str) -> String {
    let chars: Vec<char> = script.chars().collect();
    let open: Vec<char> = open.chars().collect();
    let close: Vec<char> = close.chars().collect();
    let (Some((first, open_rest)), Some((last, close_rest))) =
        (open.split_first(), close.split_last())
    else {
        return script.to_owned();
    };

    let mut out = String::with_capacity(script.len());
    let mut span: Option<usize> = None;
    for (i, &c) in chars.iter().enumerate() {
        match span {
            None if c == *first && chars[i + 1..].starts_with(open_rest) => span = Some(i),
            None => out.push(c),
            Some(_) if c == *last && chars[..i].ends_with(close_rest) => span = None,
            Some(_) => {}
        }
    }
    if let Some(start) = span {
        trace!("unclosed comment at char {start} left in place");
        out.extend(&chars[start..]);
    }
    out
}

/// Reject a template that contains another template.
pub fn validate(script: String) -> Result<String, CompileError> {
    match NESTED.find(&script) {
        Some(nested) => Err(CompileError::new(
            CompileErrorKind::NestedTemplate,
            Pos::locate(&script, nested.start()),
        )),
        None => Ok(script),
    }
}

/// A [`FunctionCompiler`] that can be shared between threads. Compilations
/// through clones of one handle are serialized, so helper names stay unique.
#[derive(Debug, Clone, Default)]
pub struct SharedCompiler(Arc<Mutex<FunctionCompiler>>);

impl SharedCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(
        &self,
        source: &str,
        directives: &Directives,
    ) -> Result<Compiled, CompileError> {
        self.0.lock().compile(source, directives)
    }

    pub fn issued(&self) -> usize {
        self.0.lock().issued()
    }
}
