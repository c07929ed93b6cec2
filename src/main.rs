//! Command-line interface for GGH lattice encryption

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use ggh_lattice::{
    utils::{generate_near_orthogonal_basis, time_function},
    EncryptionParams, Encryptor, Lattice, LatticeKeyPair, LatticeVector, Matrix, DEFAULT_NOISE_BOUND,
};

/// GGH lattice encryption CLI
#[derive(Parser, Debug)]
#[clap(name = "ggh")]
#[clap(about = "GGH lattice encryption with HNF public keys and Babai rounding decryption")]
#[clap(version)]
struct Args {
    #[clap(subcommand)]
    command: Commands,

    /// Set logging level (error, warn, info, debug, trace)
    #[clap(long, global = true, default_value = "info")]
    log_level: String,

    /// Output format
    #[clap(long, global = true, value_enum, default_value = "plain")]
    format: OutputFormat,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Encrypt and decrypt a fixed message under the built-in 4x4 basis
    Demo {
        /// Seed for the noise; entropy-seeded when omitted
        #[clap(long)]
        seed: Option<u64>,

        /// Euclidean norm of the noise vector
        #[clap(long, default_value_t = DEFAULT_NOISE_BOUND)]
        noise_bound: f64,
    },
    /// Validate a private basis and print its public basis
    Keygen {
        /// Private basis file (JSON or text rows)
        #[clap(long)]
        basis: PathBuf,
    },
    /// Encrypt a message under the public basis derived from a private basis
    Encrypt {
        #[clap(long)]
        basis: PathBuf,

        /// Comma separated integer message
        #[clap(long, value_delimiter = ',', allow_negative_numbers = true)]
        message: Vec<i64>,

        #[clap(long)]
        seed: Option<u64>,

        #[clap(long, default_value_t = DEFAULT_NOISE_BOUND)]
        noise_bound: f64,
    },
    /// Decrypt a ciphertext
    Decrypt {
        #[clap(long)]
        basis: PathBuf,

        /// Comma separated real ciphertext
        #[clap(long, value_delimiter = ',', allow_negative_numbers = true)]
        ciphertext: Vec<f64>,

        /// Round against the public basis instead of the private one
        #[clap(long)]
        public: bool,
    },
    /// Write a random near-orthogonal private basis as JSON
    Generate {
        #[clap(long)]
        dimension: usize,

        #[clap(long)]
        seed: Option<u64>,

        #[clap(long)]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Plain,
    Json,
}

const DEMO_BASIS: [[i64; 4]; 4] = [[4, -2, 1, 0], [0, -1, 5, 2], [-1, 6, 1, -1], [0, 1, -1, 6]];
const DEMO_MESSAGE: [i64; 4] = [3, 5, 7, 9];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_logging(&args)?;

    match args.command.clone() {
        Commands::Demo { seed, noise_bound } => run_demo(&args, seed, noise_bound),
        Commands::Keygen { basis } => run_keygen(&args, basis),
        Commands::Encrypt { basis, message, seed, noise_bound } => {
            run_encrypt(&args, basis, message, seed, noise_bound)
        }
        Commands::Decrypt { basis, ciphertext, public } => run_decrypt(&args, basis, ciphertext, public),
        Commands::Generate { dimension, seed, output } => run_generate(&args, dimension, seed, output),
    }
}

fn setup_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    use env_logger::Builder;
    use log::LevelFilter;

    let level_filter = match args.log_level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        other => return Err(format!("Unknown log level '{}'", other).into()),
    };

    let mut builder = Builder::from_default_env();
    builder.filter_level(level_filter);
    builder.try_init()?;

    Ok(())
}

fn encryption_params(seed: Option<u64>, noise_bound: f64) -> EncryptionParams {
    match seed {
        Some(s) => EncryptionParams::seeded(s),
        None => EncryptionParams::default(),
    }
    .with_noise_bound(noise_bound)
}

fn load_key_pair(path: &Path) -> Result<LatticeKeyPair, Box<dyn std::error::Error>> {
    let lattice = Lattice::load_from_file(path)
        .map_err(|e| format!("Failed to load basis from {}: {}", path.display(), e))?;
    let (keys, elapsed) = time_function("key derivation", || LatticeKeyPair::new(lattice));
    log::info!("public basis derived in {:.2?}", elapsed);
    Ok(keys?)
}

fn run_demo(args: &Args, seed: Option<u64>, noise_bound: f64) -> Result<(), Box<dyn std::error::Error>> {
    let rows = DEMO_BASIS.iter().map(|r| r.to_vec()).collect();
    let keys = LatticeKeyPair::from_rows(rows)?;

    let mut encryptor = Encryptor::with_params(encryption_params(seed, noise_bound))?;
    let ciphertext = encryptor.encrypt(&DEMO_MESSAGE, keys.public_basis())?;
    let private = keys.decrypt(&ciphertext)?;
    let public = keys.decrypt_with_public(&ciphertext)?;

    let report = DemoReport {
        public_basis: keys.public_basis().to_vec(),
        message: DEMO_MESSAGE.to_vec(),
        ciphertext,
        private_recovery: private.to_integer_vec(),
        public_recovery: public.to_integer_vec(),
    };
    emit(args.format, &report)
}

fn run_keygen(args: &Args, basis: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let keys = load_key_pair(&basis)?;
    emit(args.format, &PublicKeyReport { rows: keys.public_basis().to_vec() })
}

fn run_encrypt(
    args: &Args,
    basis: PathBuf,
    message: Vec<i64>,
    seed: Option<u64>,
    noise_bound: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let keys = load_key_pair(&basis)?;
    let mut encryptor = Encryptor::with_params(encryption_params(seed, noise_bound))?;
    let ciphertext = encryptor.encrypt(&message, keys.public_basis())?;
    emit(args.format, &CiphertextReport { ciphertext })
}

fn run_decrypt(
    args: &Args,
    basis: PathBuf,
    ciphertext: Vec<f64>,
    public: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let keys = load_key_pair(&basis)?;
    let ciphertext = LatticeVector::new(ciphertext);
    let recovered = if public {
        keys.decrypt_with_public(&ciphertext)?
    } else {
        keys.decrypt(&ciphertext)?
    };
    emit(args.format, &MessageReport { message: recovered.to_integer_vec() })
}

fn run_generate(
    args: &Args,
    dimension: usize,
    seed: Option<u64>,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let lattice = generate_near_orthogonal_basis(dimension, seed)?;
    lattice.save_to_file(&output)?;
    log::info!("Generated {}-dimensional basis in {}", dimension, output.display());
    emit(
        args.format,
        &GenerateReport {
            output: output.display().to_string(),
            dimension,
            orthogonality_defect: lattice.orthogonality_defect()?,
        },
    )
}

// Result rendering
trait Report: Serialize {
    fn plain(&self) -> String;
}

fn emit<R: Report>(format: OutputFormat, report: &R) -> Result<(), Box<dyn std::error::Error>> {
    let content = match format {
        OutputFormat::Plain => report.plain(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };
    println!("{}", content);
    Ok(())
}

fn format_rows(rows: &[Vec<i64>]) -> String {
    match Matrix::new(rows.to_vec()) {
        Ok(m) => m.to_string(),
        Err(_) => format!("{:?}", rows),
    }
}

#[derive(Serialize)]
struct DemoReport {
    public_basis: Vec<Vec<i64>>,
    message: Vec<i64>,
    ciphertext: LatticeVector,
    private_recovery: Vec<i64>,
    public_recovery: Vec<i64>,
}

impl Report for DemoReport {
    fn plain(&self) -> String {
        let mut out = String::new();
        out.push_str("Public key:\n");
        out.push_str(&format_rows(&self.public_basis));
        out.push_str(&format!("Message:           {:?}\n", self.message));
        out.push_str(&format!("Ciphertext:        {}\n", self.ciphertext));
        out.push_str(&format!("Private recovery:  {:?}\n", self.private_recovery));
        out.push_str(&format!("Public recovery:   {:?}", self.public_recovery));
        out
    }
}

#[derive(Serialize)]
struct PublicKeyReport {
    rows: Vec<Vec<i64>>,
}

impl Report for PublicKeyReport {
    fn plain(&self) -> String {
        format!("Public key:\n{}", format_rows(&self.rows).trim_end())
    }
}

#[derive(Serialize)]
struct CiphertextReport {
    ciphertext: LatticeVector,
}

impl Report for CiphertextReport {
    fn plain(&self) -> String {
        let coords: Vec<String> = self.ciphertext.as_slice().iter().map(|v| v.to_string()).collect();
        coords.join(",")
    }
}

#[derive(Serialize)]
struct MessageReport {
    message: Vec<i64>,
}

impl Report for MessageReport {
    fn plain(&self) -> String {
        let coords: Vec<String> = self.message.iter().map(|v| v.to_string()).collect();
        coords.join(",")
    }
}

#[derive(Serialize)]
struct GenerateReport {
    output: String,
    dimension: usize,
    orthogonality_defect: f64,
}

impl Report for GenerateReport {
    fn plain(&self) -> String {
        format!(
            "Generated {}-dimensional basis in {} (orthogonality defect {:.4})",
            self.dimension, self.output, self.orthogonality_defect
        )
    }
}
