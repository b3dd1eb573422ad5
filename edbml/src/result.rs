use crate::instruction::Instruction;

/// The product of one compilation: a function body plus the parameter
/// names it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    source: String,
    params: Vec<String>,
    instructions: Vec<Instruction>,
}

impl Compiled {
    pub(crate) fn new(
        source: String,
        params: Vec<String>,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            source,
            params,
            instructions,
        }
    }

    /// Function body text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names in declaration order. Duplicates are kept.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The body wrapped in a function expression, for debugging.
    pub fn function_source(&self) -> String {
        let args = if self.params.is_empty() {
            "()".to_owned()
        } else {
            format!("( {} )", self.params.join(", "))
        };
        let body = self.source.strip_suffix('\n').unwrap_or(&self.source);
        format!("function {args} {{\n{body}\n}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_source_without_params() {
        let compiled = Compiled::new("return 1;".into(), Vec::new(), Vec::new());
        assert_eq!(compiled.function_source(), "function () {\nreturn 1;\n}");
    }

    #[test]
    fn function_source_lists_params() {
        let compiled = Compiled::new(
            "a;\n".into(),
            vec!["a".into(), "b".into()],
            Vec::new(),
        );
        assert_eq!(compiled.function_source(), "function ( a, b ) {\na;\n}");
    }
}
