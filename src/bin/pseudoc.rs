//! Entrypoint for CLI
use std::{
    error::Error,
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use log::{info, LevelFilter};
use pseudoc::{codegen::Options, util::fmt, Transpiler};

/// Translates FILE (or the standard input) into a C# program.
#[derive(Debug, Parser)]
#[command(name = "pseudoc", version)]
struct Cli {
    /// Print the syntax tree instead of C#
    #[arg(long)]
    tree: bool,

    /// Namespace of the generated program
    #[arg(long, value_name = "NAME", default_value = "GeneratedProgram")]
    namespace: String,

    /// Class holding the generated Main
    #[arg(long = "class", value_name = "NAME", default_value = "Program")]
    class_name: String,

    #[arg(long, env = "PSEUDOC_LOG", value_name = "LEVEL", default_value = "warn")]
    log: LevelFilter,

    /// Source file; the standard input when absent
    file: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            namespace: self.namespace.clone(),
            class_name: self.class_name.clone(),
            ..Options::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = simple_logger::SimpleLogger::new().with_level(cli.log).init() {
        eprintln!("failed to initialize logger: {error}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let src = match &cli.file {
        Some(path) => {
            info!("reading {}", path.display());
            fs::read_to_string(path)?
        }
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            src
        }
    };

    let mut transpiler = Transpiler::with_options(cli.options());
    let rendered = |error| fmt::error::render(&error, &src);

    if cli.tree {
        let program = transpiler.parse(&src).map_err(rendered)?;
        print!("{}", fmt::tree::print_program_string(&program));
    } else {
        let code = transpiler.transpile(&src).map_err(rendered)?;
        print!("{code}");
    }
    Ok(())
}
