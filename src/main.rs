use std::io::Read;

use clap::Parser;
use log::error;

use rapids::parse_declaration;
use rapids::parse_expression;
use rapids::parse_module;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to a Swift source file; reads stdin when omitted.
    file: Option<std::path::PathBuf>,

    /// Parse a single expression instead of a whole module.
    #[arg(long)]
    expression: bool,

    /// Parse a single declaration instead of a whole module.
    #[arg(long)]
    declaration: bool,

    /// Print the AST as JSON instead of the debug tree.
    #[arg(long)]
    json: bool,

    /// Log parser progress.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).unwrap();

    let input = match &args.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(input) => input,
            Err(e) => {
                error!("could not read '{}': {e}", path.to_string_lossy());
                std::process::exit(1);
            }
        },
        None => {
            let mut input = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut input) {
                error!("could not read stdin: {e}");
                std::process::exit(1);
            }
            input
        }
    };

    let output = if args.expression {
        parse_expression(&input).map(|ast| render(&ast, args.json))
    } else if args.declaration {
        parse_declaration(&input).map(|ast| render(&ast, args.json))
    } else {
        parse_module(&input).map(|ast| render(&ast, args.json))
    };

    match output {
        Ok(rendered) => println!("{rendered}"),
        Err(parse_error) => {
            eprintln!("{}", parse_error.render(&input));
            std::process::exit(1);
        }
    }
}

fn render<T: serde::Serialize + std::fmt::Debug>(ast: &T, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(ast).unwrap_or_else(|e| format!("serialization failed: {e}"))
    } else {
        format!("{ast:#?}")
    }
}
