//! Matrix Calculator CLI
//!
//! Command-line tool answering register-mapping questions about AMD
//! matrix multiply-accumulate instructions.

use clap::Parser;
use matrix_calculator::formatter::{
    AsciiDocFormatter, AsciiFormatter, CsvFormatter, MarkdownFormatter, TableFormatter,
};
use matrix_calculator::{arch, query, CalcError, Matrix, Modifiers};
use std::process::ExitCode;

/// Register mapping calculator for AMD matrix instructions.
///
/// Pick an architecture and an instruction, then ask one of: full
/// instruction detail, coordinate-to-register, register-to-coordinates,
/// or a whole-matrix/whole-register layout table.
#[derive(Parser, Debug)]
#[command(name = "matrix-calc")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Architecture to query: generation name, gfx identifier,
    /// codename, or chip name (case-insensitive)
    #[arg(short = 'a', long = "architecture", value_name = "NAME")]
    architecture: Option<String>,

    /// Instruction mnemonic (case-insensitive)
    #[arg(short = 'i', long = "instruction", value_name = "MNEMONIC")]
    instruction: Option<String>,

    /// List the architecture's matrix instructions
    #[arg(short = 'L', long = "list-instructions")]
    list_instructions: bool,

    /// Print the instruction's descriptor and mapping formulas
    #[arg(short = 'd', long = "detail-instruction")]
    detail_instruction: bool,

    /// Map a matrix coordinate to its register and lane
    #[arg(short = 'g', long = "get-register")]
    get_register: bool,

    /// Map a register and lane to the matrix entries stored there
    #[arg(short = 'm', long = "matrix-entry")]
    matrix_entry: bool,

    /// Print the full register-to-matrix table
    #[arg(short = 'R', long = "register-layout")]
    register_layout: bool,

    /// Print the full matrix-to-register table
    #[arg(short = 'M', long = "matrix-layout")]
    matrix_layout: bool,

    /// Query the A matrix
    #[arg(short = 'A', long = "A-matrix")]
    a_matrix: bool,

    /// Query the B matrix
    #[arg(short = 'B', long = "B-matrix")]
    b_matrix: bool,

    /// Query the C matrix
    #[arg(short = 'C', long = "C-matrix")]
    c_matrix: bool,

    /// Query the D matrix
    #[arg(short = 'D', long = "D-matrix")]
    d_matrix: bool,

    /// Query the sparse compression index matrix
    #[arg(short = 'k', long = "compression")]
    compression: bool,

    /// Row coordinate
    #[arg(short = 'I', long = "I-coordinate", value_name = "N", default_value_t = 0)]
    i_coordinate: u32,

    /// Column coordinate
    #[arg(short = 'J', long = "J-coordinate", value_name = "N", default_value_t = 0)]
    j_coordinate: u32,

    /// Depth coordinate
    #[arg(short = 'K', long = "K-coordinate", value_name = "N", default_value_t = 0)]
    k_coordinate: u32,

    /// Block index
    #[arg(short = 'b', long = "block", value_name = "N", default_value_t = 0)]
    block: u32,

    /// Register offset within the operand's group
    #[arg(short = 'r', long = "register", value_name = "N", default_value_t = 0)]
    register: u32,

    /// SIMD lane
    #[arg(short = 'l', long = "lane", value_name = "N", default_value_t = 0)]
    lane: u32,

    /// CBSZ modifier value
    #[arg(long, value_name = "N", default_value_t = 0)]
    cbsz: u32,

    /// ABID modifier value
    #[arg(long, value_name = "N", default_value_t = 0)]
    abid: u32,

    /// BLGP modifier value
    #[arg(long, value_name = "N", default_value_t = 0)]
    blgp: u32,

    /// OPSEL modifier value
    #[arg(long, value_name = "N", default_value_t = 0)]
    opsel: u32,

    /// NEG modifier value
    #[arg(long, value_name = "N", default_value_t = 0)]
    neg: u32,

    /// NEG_HI modifier value
    #[arg(long = "neg_hi", value_name = "N", default_value_t = 0)]
    neg_hi: u32,

    /// Expand D = A*B + C term by term (D-matrix queries only)
    #[arg(short = 'o', long = "output-calculation")]
    output_calculation: bool,

    /// Emit layout tables as CSV
    #[arg(short = 'c', long = "csv")]
    csv: bool,

    /// Emit layout tables as Markdown
    #[arg(long)]
    markdown: bool,

    /// Emit layout tables as AsciiDoc
    #[arg(long)]
    asciidoc: bool,

    /// Swap table rows and columns
    #[arg(long)]
    transpose: bool,

    /// Verbose output (debug-level logging for this crate)
    #[arg(short = 'V', long = "verbose")]
    verbose: bool,

    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version, help = "Print version")]
    version: Option<bool>,
}

impl Args {
    fn modifiers(&self) -> Modifiers {
        Modifiers {
            cbsz: self.cbsz,
            abid: self.abid,
            blgp: self.blgp,
            opsel: self.opsel,
            neg: self.neg,
            neg_hi: self.neg_hi,
        }
    }

    fn selected_matrix(&self) -> Result<Option<Matrix>, CalcError> {
        let picked: Vec<Matrix> = [
            (self.a_matrix, Matrix::A),
            (self.b_matrix, Matrix::B),
            (self.c_matrix, Matrix::C),
            (self.d_matrix, Matrix::D),
            (self.compression, Matrix::K),
        ]
        .into_iter()
        .filter_map(|(on, m)| on.then_some(m))
        .collect();
        match picked.len() {
            0 => Ok(None),
            1 => Ok(Some(picked[0])),
            _ => Err(CalcError::usage(
                "matrix selections (-A/-B/-C/-D/-k) are mutually exclusive",
            )),
        }
    }

    fn formatter(&self) -> Result<Box<dyn TableFormatter>, CalcError> {
        let chosen = u32::from(self.csv) + u32::from(self.markdown) + u32::from(self.asciidoc);
        if chosen > 1 {
            return Err(CalcError::usage(
                "--csv, --markdown, and --asciidoc are mutually exclusive",
            ));
        }
        let transpose = self.transpose;
        Ok(if self.csv {
            Box::new(CsvFormatter { transpose })
        } else if self.markdown {
            Box::new(MarkdownFormatter { transpose })
        } else if self.asciidoc {
            Box::new(AsciiDocFormatter { transpose })
        } else {
            Box::new(AsciiFormatter { transpose })
        })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Warnings always reach stderr; `--verbose` additionally enables this
/// crate's debug traces. The filter is fixed so the output surface is
/// governed by CLI arguments alone.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = if verbose {
        EnvFilter::new("warn,matrix_calc=debug,matrix_calculator=debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn print_warnings(warnings: &[String]) {
    for w in warnings {
        tracing::warn!("{}", w);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let arch_name = args
        .architecture
        .as_deref()
        .ok_or_else(|| CalcError::usage("--architecture is required"))?;
    let arch = arch::resolve(arch_name)?;
    tracing::debug!("resolved '{}' to {} ({})", arch_name, arch, arch.gfx_name());

    if args.list_instructions {
        for mnemonic in query::list_instructions(arch) {
            println!("{}", mnemonic);
        }
        return Ok(());
    }

    let ops = [
        args.detail_instruction,
        args.get_register,
        args.matrix_entry,
        args.register_layout,
        args.matrix_layout,
    ];
    if ops.iter().filter(|&&on| on).count() != 1 {
        return Err(CalcError::usage(
            "exactly one of --detail-instruction, --get-register, --matrix-entry, --register-layout, or --matrix-layout is required",
        )
        .into());
    }

    let instruction = args
        .instruction
        .as_deref()
        .ok_or_else(|| CalcError::usage("--instruction is required for this query"))?;
    let matrix = args.selected_matrix()?;
    let mods = args.modifiers();

    let layout_query = args.register_layout || args.matrix_layout;
    if (args.csv || args.markdown || args.asciidoc || args.transpose) && !layout_query {
        return Err(CalcError::usage(
            "table formatting options only apply to --register-layout and --matrix-layout",
        )
        .into());
    }
    if args.output_calculation && !(args.get_register || args.matrix_entry) {
        return Err(CalcError::usage(
            "--output-calculation only applies to --get-register and --matrix-entry",
        )
        .into());
    }

    if args.detail_instruction {
        if matrix.is_some() {
            return Err(CalcError::usage(
                "--detail-instruction does not take a matrix selection",
            )
            .into());
        }
        print!("{}", query::detail(arch, instruction)?);
        return Ok(());
    }

    let matrix = matrix.ok_or_else(|| {
        CalcError::usage("select a matrix with -A, -B, -C, -D, or -k for this query")
    })?;
    tracing::debug!("querying the {} matrix of {}", matrix, instruction);

    if args.get_register {
        let result = query::get_register(
            arch,
            instruction,
            matrix,
            args.i_coordinate,
            args.j_coordinate,
            args.k_coordinate,
            args.block,
            &mods,
            args.output_calculation,
        )?;
        print_warnings(&result.warnings);
        println!("{}", result);
    } else if args.matrix_entry {
        let result = query::matrix_entry(
            arch,
            instruction,
            matrix,
            args.register,
            args.lane,
            &mods,
            args.output_calculation,
        )?;
        print_warnings(&result.warnings);
        println!("{}", result);
    } else {
        let result = if args.register_layout {
            query::register_layout(arch, instruction, matrix, &mods)?
        } else {
            query::matrix_layout(arch, instruction, matrix, &mods)?
        };
        print_warnings(&result.warnings);
        let formatter = args.formatter()?;
        print!("{}", formatter.format_tables(&result.tables));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "matrix-calc",
            "-a",
            "cdna2",
            "-i",
            "v_mfma_f32_4x4x4f16",
            "-g",
            "-I",
            "1",
            "-K",
            "2",
            "-b",
            "4",
            "-A",
        ])
        .unwrap();
        assert_eq!(args.architecture.as_deref(), Some("cdna2"));
        assert!(args.get_register);
        assert_eq!(args.i_coordinate, 1);
        assert_eq!(args.k_coordinate, 2);
        assert_eq!(args.block, 4);
        assert_eq!(args.selected_matrix().unwrap(), Some(Matrix::A));
    }

    #[test]
    fn test_case_sensitive_matrix_flags() {
        // -k is the compression index, -K the depth coordinate.
        let args =
            Args::try_parse_from(["matrix-calc", "-a", "rdna4", "-i", "x", "-g", "-k", "-K", "31"])
                .unwrap();
        assert!(args.compression);
        assert_eq!(args.k_coordinate, 31);
    }

    #[test]
    fn test_matrix_flags_exclusive() {
        let args = Args::try_parse_from(["matrix-calc", "-a", "cdna2", "-A", "-B"]).unwrap();
        assert!(args.selected_matrix().is_err());
    }

    #[test]
    fn test_verbose_flag() {
        // -V is verbose; -v is the version flag.
        let args =
            Args::try_parse_from(["matrix-calc", "-a", "cdna2", "-i", "x", "-d", "-V"]).unwrap();
        assert!(args.verbose);
        let args = Args::try_parse_from(["matrix-calc", "-a", "cdna2", "-i", "x", "-d"]).unwrap();
        assert!(!args.verbose);
    }

    #[test]
    fn test_modifier_args() {
        let args = Args::try_parse_from([
            "matrix-calc",
            "-a",
            "cdna2",
            "-i",
            "x",
            "-R",
            "-A",
            "--cbsz",
            "2",
            "--abid",
            "2",
            "--neg_hi",
            "3",
        ])
        .unwrap();
        let mods = args.modifiers();
        assert_eq!(mods.cbsz, 2);
        assert_eq!(mods.abid, 2);
        assert_eq!(mods.neg_hi, 3);
    }

    #[test]
    fn test_run_requires_single_operation() {
        let args =
            Args::try_parse_from(["matrix-calc", "-a", "cdna2", "-i", "x", "-g", "-m", "-A"])
                .unwrap();
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_run_end_to_end_get_register() {
        let args = Args::try_parse_from([
            "matrix-calc",
            "-a",
            "CDNA2",
            "-i",
            "V_MFMA_F32_4X4X4F16",
            "-g",
            "-I",
            "1",
            "-K",
            "2",
            "-b",
            "4",
            "-A",
        ])
        .unwrap();
        assert!(run(&args).is_ok());
    }

    #[test]
    fn test_format_flags_exclusive() {
        let args = Args::try_parse_from([
            "matrix-calc",
            "-a",
            "cdna2",
            "-i",
            "V_MFMA_F32_4X4X1F32",
            "-M",
            "-A",
            "--csv",
            "--markdown",
        ])
        .unwrap();
        assert!(run(&args).is_err());
    }
}
