//! # EDBML
//!
//! Compiles EDBML templates, a mix of script lines and markup lines, into
//! the body of a function that renders the markup when invoked.
//!
//! ## Pipeline
//!
//! ```text
//!  source
//!    │
//!    ▼
//!  uncomment ─▶ validate ─▶ extract ─▶ direct ─▶ define ─▶ compile
//!  (<!-- -->,   (nested     (<?param   (hook)    (var out,  (Runner +
//!   /* */)       templates)   ...?>)              att, …)    Compiler)
//!                                                              │
//!                                                              ▼
//!                                                          Compiled
//! ```
//!
//! A line starting with `<` opens markup; the markup runs to the end of the
//! line, or further when the line ends with `+`. Inside markup:
//!
//! - `${expr}` splices `expr` into the output,
//! - `#{stmt}` hoists `stmt` into an event callback and references it,
//! - `?{expr}` hoists `expr` into a getter and references it,
//! - `@name`, `-@name` and `@@` call the attribute helper.
//!
//! ```rust
//! use edbml::{Directives, FunctionCompiler};
//!
//! let mut compiler = FunctionCompiler::new();
//! let compiled = compiler
//!     .compile("<?param name=\"title\"?>\n<h1>${title}</h1>", &Directives::new())
//!     .unwrap();
//!
//! assert_eq!(compiled.params(), ["title"]);
//! assert!(compiled.source().contains("out.html += '<h1>' + (title) + '</h1>';"));
//! ```

pub mod compiler;
pub mod error;
pub mod function_compiler;
pub mod instruction;
mod markup;
pub mod output;
pub mod pos;
pub mod result;
pub mod runner;
pub mod status;

pub use compiler::{Compiler, Names, PREFIX};
pub use error::{CompileError, CompileErrorKind};
pub use function_compiler::{DirectHook, Directives, FunctionCompiler, Head, SharedCompiler};
pub use instruction::Instruction;
pub use output::{AttCall, Binding, Node, Outline, Output};
pub use pos::Pos;
pub use result::Compiled;
pub use runner::{Runner, Scanner};
pub use status::{Capture, Mode, Status};
