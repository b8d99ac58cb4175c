use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use color_print::{ceprintln, cprintln};
use marieasm::{
    assemble,
    error::{print_error, CliError},
    report::{write_reports, Report},
    source,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input source file
    input: PathBuf,

    /// Output a Logisim ROM image [default: <INPUT>.LogisimImage]
    #[clap(long, value_name = "PATH")]
    logisim: Option<Option<PathBuf>>,

    /// Output the raw 8192-byte memory image [default: <INPUT>.hex]
    #[clap(long, value_name = "PATH")]
    rawhex: Option<Option<PathBuf>>,

    /// Output the symbol table [default: <INPUT>.sym]
    #[clap(long, value_name = "PATH")]
    symboltable: Option<Option<PathBuf>>,

    /// Output the listing with high level code [default: <INPUT>.lst]
    #[clap(long, value_name = "PATH")]
    listing: Option<Option<PathBuf>>,
}

impl Args {
    /// Requested reports and where each one goes.
    fn outputs(&self) -> Vec<(Report, PathBuf)> {
        [
            (Report::Logisim, &self.logisim),
            (Report::RawHex, &self.rawhex),
            (Report::SymbolTable, &self.symboltable),
            (Report::Listing, &self.listing),
        ]
        .into_iter()
        .filter_map(|(report, opt)| {
            let path = opt.as_ref()?;
            let path = path
                .clone()
                .unwrap_or_else(|| report.default_path(&self.input));
            Some((report, path))
        })
        .collect()
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::FileOpen(path.display().to_string(), e))?;
    source::decode(&bytes)
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("MARIE Assembler");

    println!("1. Read Source");
    println!("  < {}", args.input.display());
    let src = match read_source(&args.input) {
        Ok(src) => src,
        Err(err) => {
            print_error(&err);
            return ExitCode::FAILURE;
        }
    };

    println!("2. Assemble");
    let file = args.input.display().to_string();
    let (result, warnings) = assemble(&src);
    for warning in &warnings {
        warning.print_diag(&file, &src);
    }
    let asm = match result {
        Ok(asm) => asm,
        Err(fatal) => {
            fatal.print_diag(&file, &src);
            cprintln!("<red,bold>Assembly failed</>, no outputs were written");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "  {} words, {} identifiers",
        asm.image.occupied().count(),
        asm.idents.defs().count()
    );

    let outputs = args.outputs();
    if outputs.is_empty() {
        ceprintln!("<yellow,bold>[Warning]</> No outputs were requested. Pass at least one of --logisim, --rawhex, --symboltable or --listing");
        return ExitCode::FAILURE;
    }

    println!("3. Write Outputs");
    let mut success = true;
    let mut sinks = vec![];
    for (report, path) in &outputs {
        println!("  > {} ({})", path.display(), report.name());
        match File::create(path) {
            Ok(file) => sinks.push((*report, BufWriter::new(file))),
            Err(e) => {
                print_error(&CliError::FileCreate(path.display().to_string(), e));
                success = false;
            }
        }
    }
    for (report, err) in write_reports(&asm, sinks) {
        let name = outputs
            .iter()
            .find(|(r, _)| *r == report)
            .map(|(_, path)| path.display().to_string())
            .unwrap_or_default();
        print_error(&CliError::FileWrite(name, err));
        success = false;
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
