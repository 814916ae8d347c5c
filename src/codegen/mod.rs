//! C# emission from a parsed [`Program`].

use log::debug;

use crate::ast::Program;

mod csharp;
#[cfg(test)]
mod tests;

pub use csharp::Generator;

/// Knobs for the emitted C# shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub namespace: String,
    pub class_name: String,
    /// One level of indentation.
    pub indent: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            namespace: "GeneratedProgram".into(),
            class_name: "Program".into(),
            indent: "    ".into(),
        }
    }
}

/// Generates a complete C# compilation unit. Never fails: every tree the
/// parser produces has a translation.
pub fn generate(program: &Program, options: &Options) -> String {
    let code = Generator::new(options).generate(program);
    debug!("generated {} bytes of C#", code.len());
    code
}
