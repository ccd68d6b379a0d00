use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chromaframe_core::{
    BitBuffer, BitCursor, BlockGeometry, CheckpointSummary, CustomPalettes, DecoderConfig,
    DefaultPalettes, FailureKind, FailureSummary, FrameHeaderSummary, InitializerSummary,
    PayloadSummary, Report, Severity, decode_frame_header, decode_initializer, make_empty_report,
    make_stub_report, minimum_block_checkpoint,
};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::Level;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("CHROMAFRAME_BUILD_COMMIT"),
    ", built ",
    env!("CHROMAFRAME_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = concat!(
    "Examples:\n",
    "  chromaframe header initializer stream.bin --block-height 40 --block-width 30",
    " -o report.json\n",
    "  chromaframe header frame frame_0007.bin --stdout --pretty\n",
    "  chromaframe payload verify payload.bin --bits 152 --frame-hash <HEX> --stdout\n",
    "  chromaframe checkpoint --frame-width 1920 --frame-height 1080",
    " --block-width 30 --block-height 40 --stdout"
);

#[derive(Parser, Debug)]
#[command(name = "chromaframe")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Verifier for colored-block frame streams: headers, palettes and payload hashes.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log decoder diagnostics at debug level on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode and verify captured header bytes.
    Header {
        #[command(subcommand)]
        command: HeaderCommands,
    },
    /// Operations on extracted payload bits.
    Payload {
        #[command(subcommand)]
        command: PayloadCommands,
    },
    /// Check block-size overrides against the active frame area.
    Checkpoint {
        /// Active frame width in pixels
        #[arg(long)]
        frame_width: u32,

        /// Active frame height in pixels
        #[arg(long)]
        frame_height: u32,

        /// Block width override
        #[arg(long)]
        block_width: Option<u32>,

        /// Block height override
        #[arg(long)]
        block_height: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
enum HeaderCommands {
    /// Verify a stream initializer (CRC32, protocol, geometry, palette).
    Initializer {
        /// Path (or glob matching one file) to the initializer bytes
        input: PathBuf,

        /// Block rows established by lock-on
        #[arg(long)]
        block_height: u16,

        /// Block columns established by lock-on
        #[arg(long)]
        block_width: u16,

        /// Supported protocol version; repeat to accept several (default: 1, 2)
        #[arg(long = "protocol", value_parser = clap::value_parser!(u8).range(0..16))]
        protocols: Vec<u8>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Verify a frame header (CRC32) and print its fields.
    Frame {
        /// Path (or glob matching one file) to the frame header bytes
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
enum PayloadCommands {
    /// Hash payload bits with SHA-256 and compare with a frame hash.
    Verify {
        /// Path (or glob matching one file) to the packed payload bits
        input: PathBuf,

        /// Number of payload bits to hash (default: the whole file)
        #[arg(long)]
        bits: Option<usize>,

        /// Expected SHA-256 from the frame header (64 hex digits)
        #[arg(long)]
        frame_hash: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if the input is rejected
    #[arg(long)]
    strict: bool,
}

impl Commands {
    fn output(&self) -> &OutputArgs {
        match self {
            Commands::Header { command } => match command {
                HeaderCommands::Initializer { output, .. }
                | HeaderCommands::Frame { output, .. } => output,
            },
            Commands::Payload { command } => match command {
                PayloadCommands::Verify { output, .. } => output,
            },
            Commands::Checkpoint { output, .. } => output,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.command.output().quiet);

    let result = match cli.command {
        Commands::Header { command } => match command {
            HeaderCommands::Initializer {
                input,
                block_height,
                block_width,
                protocols,
                output,
            } => cmd_header_initializer(input, block_height, block_width, protocols, output),
            HeaderCommands::Frame { input, output } => cmd_header_frame(input, output),
        },
        Commands::Payload { command } => match command {
            PayloadCommands::Verify {
                input,
                bits,
                frame_hash,
                output,
            } => cmd_payload_verify(input, bits, frame_hash, output),
        },
        Commands::Checkpoint {
            frame_width,
            frame_height,
            block_width,
            block_height,
            output,
        } => cmd_checkpoint(frame_width, frame_height, block_width, block_height, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_header_initializer(
    input: PathBuf,
    block_height: u16,
    block_width: u16,
    protocols: Vec<u8>,
    output: OutputArgs,
) -> Result<(), CliError> {
    let loaded = load_input(&input)?;
    let config = if protocols.is_empty() {
        DecoderConfig::default()
    } else {
        DecoderConfig::with_protocols(protocols)
    };

    let mut report = loaded.report();
    let mut cursor = BitCursor::new(&loaded.bytes);
    match decode_initializer(
        &mut cursor,
        BlockGeometry::new(block_height, block_width),
        &config,
        &CustomPalettes::new(),
        &DefaultPalettes::builtin(),
    ) {
        Ok(initializer) => report.initializer = Some(InitializerSummary::from(&initializer)),
        Err(err) => {
            report.failure = Some(FailureSummary::new(err.kind(), err.severity(), &err));
        }
    }
    emit_report(&report, Some(&loaded.canonical), &output)
}

fn cmd_header_frame(input: PathBuf, output: OutputArgs) -> Result<(), CliError> {
    let loaded = load_input(&input)?;
    let mut report = loaded.report();
    let mut cursor = BitCursor::new(&loaded.bytes);
    match decode_frame_header(&mut cursor) {
        Ok(header) => report.frame_header = Some(FrameHeaderSummary::from(&header)),
        Err(err) => {
            report.failure = Some(FailureSummary::new(err.kind(), err.severity(), &err));
        }
    }
    emit_report(&report, Some(&loaded.canonical), &output)
}

fn cmd_payload_verify(
    input: PathBuf,
    bits: Option<usize>,
    frame_hash: String,
    output: OutputArgs,
) -> Result<(), CliError> {
    if frame_hash.len() != 64 || !frame_hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CliError::new(
            format!("invalid frame hash '{}'", frame_hash),
            Some("expected 64 hex digits (SHA-256)".to_string()),
        ));
    }

    let loaded = load_input(&input)?;
    let available = loaded.bytes.len().saturating_mul(8);
    let bits = bits.unwrap_or(available);
    if bits > available {
        return Err(CliError::new(
            format!(
                "--bits {} exceeds the {} bits in {}",
                bits,
                available,
                loaded.path.display()
            ),
            Some("the input holds 8 payload bits per byte".to_string()),
        ));
    }

    let mut payload = BitBuffer::from_bytes(loaded.bytes.clone());
    payload.truncate(bits);

    let (summary, verified) = PayloadSummary::verify(&payload, &frame_hash);
    let mut report = loaded.report();
    report.payload = Some(summary);
    if let Err(err) = verified {
        report.failure = Some(FailureSummary::new(err.kind(), err.severity(), &err));
    }
    emit_report(&report, Some(&loaded.canonical), &output)
}

fn cmd_checkpoint(
    frame_width: u32,
    frame_height: u32,
    block_width: Option<u32>,
    block_height: Option<u32>,
    output: OutputArgs,
) -> Result<(), CliError> {
    let passed = minimum_block_checkpoint(block_height, block_width, frame_width, frame_height);

    let mut report = make_empty_report();
    report.generated_at = generated_at();
    report.checkpoint = Some(CheckpointSummary {
        active_width: frame_width,
        active_height: frame_height,
        block_width,
        block_height,
        passed,
    });
    if !passed {
        report.failure = Some(FailureSummary::new(
            FailureKind::GeometryMismatch,
            Severity::StreamFatal,
            format!(
                "block override exceeds the active frame area {}x{}",
                frame_width, frame_height
            ),
        ));
    }
    emit_report(&report, None, &output)
}

struct LoadedInput {
    path: PathBuf,
    canonical: PathBuf,
    bytes: Vec<u8>,
}

impl LoadedInput {
    fn report(&self) -> Report {
        let mut report =
            make_stub_report(&self.path.display().to_string(), self.bytes.len() as u64);
        report.generated_at = generated_at();
        report
    }
}

fn generated_at() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| chromaframe_core::DEFAULT_GENERATED_AT.to_string())
}

fn load_input(input: &Path) -> Result<LoadedInput, CliError> {
    let resolved = resolve_input_path(input)?;
    validate_input_file(&resolved)?;
    let canonical = fs::canonicalize(&resolved)
        .with_context(|| format!("Failed to resolve input path: {}", resolved.display()))?;
    let bytes = fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;
    Ok(LoadedInput {
        path: resolved,
        canonical,
        bytes,
    })
}

fn emit_report(
    report: &Report,
    input_abs: Option<&Path>,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let json = serialize_report(report, output.pretty, output.compact)?;

    if output.stdout {
        println!("{}", json);
    } else {
        let path = output.report.as_ref().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        if let Some(input_abs) = input_abs {
            ensure_distinct_output(path, input_abs)?;
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        if !output.quiet {
            eprintln!("OK: report written -> {}", path.display());
        }
    }

    if let Some(failure) = report.failure.as_ref() {
        if !output.quiet {
            eprintln!("rejected: {} ({})", failure.kind, failure.message);
        }
        if output.strict {
            return Err(CliError::new(
                format!("input rejected: {}", failure.kind),
                Some("inspect the failure section of the report".to_string()),
            ));
        }
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    let Some(report_dir) = report_dir else {
        return Ok(());
    };
    let report_target = report_dir.join(
        report_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
    );
    if report_target == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the raw header or payload bytes captured from the stream".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single binary file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str("; matches: ");
        message.push_str(&listed);
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
