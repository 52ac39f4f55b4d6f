use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pentavox::noise::BitErrorChannel;
use pentavox::quantiser::QuantisationAxis;
use pentavox::{read, write_named, PatternDict, StoragePattern};
use rand::RngCore;
use std::fs::File;
use std::io::{Read as _, Write as _};

#[derive(Parser, Debug)]
#[command(author, version, about = "Five-dimensional optical voxel storage codec")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a file into a storage pattern, printed as JSON.
    Encode {
        #[arg(long, help = "Path to the file to encode")]
        input: String,
        #[arg(long, default_value_t = 64)]
        nx: u32,
        #[arg(long, default_value_t = 64)]
        ny: u32,
        #[arg(long, default_value_t = 8)]
        nz: u32,
        #[arg(long, default_value_t = 16, help = "Intensity quantisation levels")]
        levels_i: u32,
        #[arg(long, default_value_t = 8, help = "Polarization quantisation levels")]
        levels_j: u32,
        #[arg(long, default_value = "hamming74", help = "ECC scheme name")]
        ecc: String,
        #[arg(long, help = "Output JSON path (stdout if omitted)")]
        output: Option<String>,
    },
    /// Decode a storage pattern (JSON) back to the original file.
    Decode {
        #[arg(long, help = "Path to the pattern JSON produced by `encode`")]
        input: String,
        #[arg(long, help = "Output path for the recovered payload")]
        output: String,
    },
    /// Run a synthetic payload through the bit-error channel at varying
    /// rates and report correction/detection counts.
    Simulate {
        #[arg(long, default_value_t = 0.0, help = "Bit error rate")]
        ber: f64,
        #[arg(long, default_value = "hamming74")]
        ecc: String,
        #[arg(long, default_value_t = 1024, help = "Synthetic payload size in bytes")]
        file_size: usize,
        #[arg(long, default_value_t = 10, help = "Number of trials")]
        trials: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Encode {
            input,
            nx,
            ny,
            nz,
            levels_i,
            levels_j,
            ecc,
            output,
        } => encode(&input, (nx, ny, nz), levels_i, levels_j, &ecc, output.as_deref()),
        Command::Decode { input, output } => decode(&input, &output),
        Command::Simulate {
            ber,
            ecc,
            file_size,
            trials,
        } => simulate(ber, &ecc, file_size, trials),
    }
}

fn encode(
    input: &str,
    grid_size: (u32, u32, u32),
    levels_i: u32,
    levels_j: u32,
    ecc: &str,
    output: Option<&str>,
) -> Result<()> {
    let mut data = Vec::new();
    File::open(input)
        .context("failed to open input file")?
        .read_to_end(&mut data)
        .context("failed to read input file")?;

    let intensity_axis = QuantisationAxis::new(levels_i, 0.0, 1.0).context("invalid intensity axis")?;
    let polarization_axis =
        QuantisationAxis::new(levels_j, 0.0, std::f64::consts::PI).context("invalid polarization axis")?;

    let pattern = write_named(&data, grid_size, (1.0, 1.0, 1.0), intensity_axis, polarization_axis, ecc)
        .context("encoding failed")?;

    let json = serde_json::to_string_pretty(&pattern.to_dict())?;
    match output {
        Some(path) => {
            File::create(path)
                .context("failed to create output file")?
                .write_all(json.as_bytes())?;
            println!("Wrote pattern with {} voxels to {path}", pattern.voxels.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn decode(input: &str, output: &str) -> Result<()> {
    let mut json = String::new();
    File::open(input)
        .context("failed to open pattern file")?
        .read_to_string(&mut json)
        .context("failed to read pattern file")?;
    let dict: PatternDict = serde_json::from_str(&json).context("failed to parse pattern JSON")?;
    let pattern = StoragePattern::from_dict(dict).context("invalid pattern")?;

    let result = read(&pattern).context("decoding failed")?;
    File::create(output)
        .context("failed to create output file")?
        .write_all(&result.payload)?;

    println!(
        "Recovered {} bytes ({} voxels, {} corrected, {} uncorrectable)",
        result.payload.len(),
        result.voxels_processed,
        result.corrected_errors,
        result.detected_uncorrectable
    );
    Ok(())
}

fn simulate(ber: f64, ecc: &str, file_size: usize, trials: usize) -> Result<()> {
    let intensity_axis = QuantisationAxis::new(16, 0.0, 1.0)?;
    let polarization_axis = QuantisationAxis::new(8, 0.0, std::f64::consts::PI)?;

    let mut rng = rand::thread_rng();
    let mut data = vec![0u8; file_size];
    rng.fill_bytes(&mut data);

    let pattern = write_named(
        &data,
        (64, 64, 8),
        (5.0, 5.0, 15.0),
        intensity_axis,
        polarization_axis,
        ecc,
    )
    .context("encoding the synthetic payload failed")?;

    let channel = BitErrorChannel::new(ber);
    let mut recovered = 0usize;
    let mut total_corrected = 0usize;
    let mut total_uncorrectable = 0usize;

    for trial in 0..trials {
        let noisy = channel.apply(&pattern, Some(trial as u64));
        match read(&noisy) {
            Ok(result) => {
                total_corrected += result.corrected_errors;
                total_uncorrectable += result.detected_uncorrectable;
                if result.payload == data {
                    recovered += 1;
                }
            }
            Err(e) => log::warn!("trial {trial} failed to read: {e}"),
        }
    }

    println!("ecc={ecc} ber={ber} trials={trials}");
    println!("recovered: {recovered}/{trials}");
    println!("corrected_errors total: {total_corrected}");
    println!("detected_uncorrectable total: {total_uncorrectable}");
    Ok(())
}
