//! Headless compute probe: runs a workgroup prefix scan over 1024 ones and
//! prints one element of the result.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use kiln_engine::compute::{HeadlessGpu, PREFIX_SCAN_WGSL, ScanProbe, WORKGROUP_SIZE};
use kiln_engine::device::GpuInit;
use kiln_engine::logging::{LoggingConfig, init_logging};

const ELEMENTS: usize = 1024;

#[derive(Parser, Debug)]
#[command(name = "kiln-scan-probe", about = "Run a compute prefix scan and print one element")]
struct Args {
    /// WGSL compute shader with a `main` entry point and one read-write
    /// `array<i32>` at group 0, binding 0. Defaults to the built-in scan.
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Element to print.
    #[arg(long, default_value_t = 63)]
    index: usize,
}

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run(Args::parse()) {
        eprintln!("kiln-scan-probe: {err:#}");
        std::process::exit(-1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.index >= ELEMENTS {
        bail!("index {} is out of range (0..{ELEMENTS})", args.index);
    }

    let gpu = HeadlessGpu::new(&GpuInit::default()).context("headless GPU setup failed")?;

    let probe = match &args.shader {
        Some(path) => ScanProbe::from_file(&gpu, path)?,
        None => ScanProbe::new(&gpu, PREFIX_SCAN_WGSL)?,
    };

    let input = vec![1i32; ELEMENTS];
    log::info!(
        "dispatching {} workgroups of {WORKGROUP_SIZE}",
        ELEMENTS / WORKGROUP_SIZE as usize
    );
    let output = probe.run(&gpu, &input).context("compute dispatch failed")?;

    println!("{}", output[args.index]);
    Ok(())
}
