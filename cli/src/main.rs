use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use pullwire::Registry;
use pullwire_compiler::{generate_from_text, CodegenError, GenOptions};

#[derive(Parser)]
#[command(name = "pullwirec")]
#[command(about = "Compile pullwire schemas to Rust field-dispatch code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust code from a `.pw` schema
    Gen {
        /// Input `.pw` schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrap generated items in `pub mod <name>`
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Tokenize, parse, and resolve a schema, reporting errors only
    Check {
        /// Input `.pw` schema file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Dump the resolved schema model as pretty JSON
    Dump {
        /// Input `.pw` schema file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), CodegenError> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Gen {
            input,
            output,
            module,
        } => {
            let text = fs::read_to_string(input)?;
            let opts = GenOptions {
                module: module.clone(),
                ..GenOptions::default()
            };
            let code = generate_from_text(&text, &opts)?;
            match output {
                Some(path) => {
                    fs::write(path, &code)?;
                    println!("Generated Rust code written to {}", path.display());
                }
                None => println!("{}", code),
            }
            Ok(())
        }

        Commands::Check { input } => {
            let text = fs::read_to_string(input)?;
            pullwire::schema::compile_schema(&text)?;
            println!("{}: ok", input.display());
            Ok(())
        }

        Commands::Dump { input } => {
            let text = fs::read_to_string(input)?;
            let registry = Registry::from_text(&text)?;
            println!("{}", pullwire::schema_json(&registry));
            Ok(())
        }
    }
}
