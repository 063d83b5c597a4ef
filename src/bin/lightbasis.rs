use clap::*;

use lightbasis::core::options::*;
use lightbasis::core::pipeline::*;
use std::env;
use std::path::PathBuf;
use std::process;

use log::*;

#[derive(Debug, Parser)]
#[clap(author, about, version)]
struct CommandOptions {
    /// JSON run configuration.
    #[arg(short, long, value_name = "filename")]
    pub config: Option<PathBuf>,

    /// Directory receiving weights, diagnostics and relit images.
    #[arg(short, long = "output-dir", value_name = "dir")]
    pub output_dir: Option<PathBuf>,

    /// Number of evenly spaced azimuthal offsets of the environment map.
    #[arg(short = 'n', long, value_name = "num")]
    pub offsets: Option<usize>,

    /// Weight refinement: disabled, original-space or pca-space.
    #[arg(long, value_name = "method")]
    pub optimization: Option<OptimizationMethod>,

    /// Suppress all text output other than error messages.
    #[clap(long, default_value = "false")]
    pub quiet: bool,

    /// Log messages at or above this level (0 -> INFO,
    /// 1 -> WARNING, 2 -> ERROR, 3-> FATAL).
    #[arg(long, value_name = "num")]
    pub minloglevel: Option<i32>,
}

fn init_logger(opts: &CommandOptions) {
    if let Some(minloglevel) = opts.minloglevel {
        const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        let log_level = LOG_LEVELS[(minloglevel + 2).clamp(0, 4) as usize];
        env::set_var("RUST_LOG", log_level);
    } else if opts.quiet {
        env::set_var("RUST_LOG", "error");
    } else {
        //default log level : warn
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_owned());
        env::set_var("RUST_LOG", log_level);
    }

    env_logger::Builder::from_default_env()
        .format_target(false)
        .format_module_path(false)
        .init();
}

fn load_options(opts: &CommandOptions) -> Result<RelightOptions, lightbasis::core::error::LightBasisError> {
    let mut options = match opts.config.as_ref() {
        Some(path) => RelightOptions::load(path)?,
        None => RelightOptions::default(),
    };
    if let Some(dir) = opts.output_dir.as_ref() {
        options.output_dir = dir.clone();
    }
    if let Some(n) = opts.offsets {
        options.number_of_offsets = n;
    }
    if let Some(method) = opts.optimization {
        // keep a configured component count when the method matches
        if std::mem::discriminant(&method) != std::mem::discriminant(&options.optimization) {
            options.optimization = method;
        }
    }
    return Ok(options);
}

fn relight(opts: &CommandOptions) -> i32 {
    let options = match load_options(opts) {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return -1;
        }
    };
    let pipeline = RelightingPipeline::new(options);
    match pipeline.run() {
        Ok(report) => {
            if !opts.quiet {
                println!(
                    "lightbasis version {}: {} lights, {} offsets written to {}",
                    env!("CARGO_PKG_VERSION"),
                    report.partition.number_of_cells(),
                    report.results.len(),
                    pipeline.options().output_dir.display()
                );
            }
            return 0;
        }
        Err(e) => {
            error!("{}", e);
            return -1;
        }
    }
}

pub fn main() {
    let opts = CommandOptions::parse();
    init_logger(&opts);
    if opts.config.is_none() {
        println!("{}", CommandOptions::command().render_usage());
        process::exit(-1);
    }
    let ret = relight(&opts);
    process::exit(ret);
}
