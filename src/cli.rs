// Command-line interface for Oxilzo.
//
// Subcommands: `compress`, `decompress`, and `info` (frame header dump).

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::io::{self, HEADER_LEN};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// LZO1X compressor/decompressor.
#[derive(Parser, Debug)]
#[command(
    name = "oxilzo",
    version,
    about = "LZO1X compressor/decompressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a file into the OXLZ frame format.
    Compress(FileArgs),
    /// Decompress an OXLZ-framed file.
    Decompress(FileArgs),
    /// Print frame information for an OXLZ file.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file (default: input path with `.lzo` added or removed).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// OXLZ input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    let cli = Cli::parse();
    let default_filter = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    let code = match dispatch(&cli) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("oxilzo: {msg}");
            1
        }
    };
    process::exit(code);
}

fn dispatch(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Cmd::Compress(args) => {
            let output = resolve_output(args, true);
            check_overwrite(&output, cli.force)?;
            let stats = io::compress_file(&args.input, &output).map_err(|e| e.to_string())?;
            if !cli.quiet {
                eprintln!(
                    "{}: {} -> {} bytes (ratio {:.3})",
                    args.input.display(),
                    stats.input_size,
                    stats.output_size,
                    stats.ratio()
                );
            }
            Ok(())
        }
        Cmd::Decompress(args) => {
            let output = resolve_output(args, false);
            check_overwrite(&output, cli.force)?;
            let stats = io::decompress_file(&args.input, &output).map_err(|e| e.to_string())?;
            if !cli.quiet {
                eprintln!(
                    "{}: {} -> {} bytes",
                    args.input.display(),
                    stats.input_size,
                    stats.output_size
                );
            }
            Ok(())
        }
        Cmd::Info(args) => {
            let data = std::fs::read(&args.input).map_err(|e| e.to_string())?;
            let (expected_len, payload) = io::parse_header(&data).map_err(|e| e.to_string())?;
            println!("file:              {}", args.input.display());
            println!("frame header:      {HEADER_LEN} bytes");
            println!("compressed bytes:  {}", payload.len());
            println!("uncompressed size: {expected_len}");
            Ok(())
        }
    }
}

/// Default output path: append `.lzo` when compressing, strip it (or
/// append `.out`) when decompressing.
fn resolve_output(args: &FileArgs, compressing: bool) -> PathBuf {
    if let Some(out) = &args.output {
        return out.clone();
    }
    if compressing {
        let mut name = args.input.as_os_str().to_owned();
        name.push(".lzo");
        PathBuf::from(name)
    } else if args.input.extension().is_some_and(|e| e == "lzo") {
        args.input.with_extension("")
    } else {
        let mut name = args.input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn check_overwrite(path: &Path, force: bool) -> Result<(), String> {
    if !force && path.exists() {
        return Err(format!(
            "output file {} exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file_args(input: &str, output: Option<&str>) -> FileArgs {
        FileArgs {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
        }
    }

    #[test]
    fn output_defaults_append_lzo() {
        let args = file_args("data.bin", None);
        assert_eq!(resolve_output(&args, true), PathBuf::from("data.bin.lzo"));
    }

    #[test]
    fn output_defaults_strip_lzo() {
        let args = file_args("data.bin.lzo", None);
        assert_eq!(resolve_output(&args, false), PathBuf::from("data.bin"));
    }

    #[test]
    fn output_defaults_append_out_without_lzo_extension() {
        let args = file_args("data.bin", None);
        assert_eq!(resolve_output(&args, false), PathBuf::from("data.bin.out"));
    }

    #[test]
    fn explicit_output_wins() {
        let args = file_args("a", Some("b"));
        assert_eq!(resolve_output(&args, true), PathBuf::from("b"));
    }
}
