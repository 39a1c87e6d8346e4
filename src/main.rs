use anyhow::Result;
use clap::Parser;
use pkg_matchers::{
    Matchers, Platform,
    commands::{Assertion, ReportOptions, evaluate, report},
    runtime::RealRuntime,
};
use std::path::PathBuf;

/// pkg-matchers - assertions on published package metadata
///
/// Checks dependency declarations in a package.json and the executables
/// linked into node_modules/.bin. Prints the verdict and exits non-zero when
/// the assertion does not hold.
///
/// Examples:
///   pkg-matchers depend-on packages/cli lodash ^4.0.0
///   pkg-matchers binary-link packages/cli lerna
#[derive(Parser, Debug)]
#[command(author, version = env!("PKG_MATCHERS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Platform naming convention for links: windows or unix (defaults to the current one)
    #[arg(
        long,
        env = "PKG_MATCHERS_PLATFORM",
        value_name = "PLATFORM",
        global = true
    )]
    platform: Option<Platform>,

    /// Invert the assertion
    #[arg(long = "not", global = true)]
    negate: bool,

    /// Print the verdict as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Assert that a package declares a production dependency (toDependOn)
    DependOn(DependencyArgs),

    /// Assert that a package declares a development dependency (toDevDependOn)
    DevDependOn(DependencyArgs),

    /// Assert that a package links exactly the given executables (toBinaryLink)
    BinaryLink(BinaryLinkArgs),
}

#[derive(clap::Args, Debug)]
struct DependencyArgs {
    /// Directory containing the package.json
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Name of the dependency
    #[arg(value_name = "PACKAGE")]
    package: String,

    /// Version range the declared range must intersect
    #[arg(value_name = "RANGE")]
    range: Option<String>,
}

#[derive(clap::Args, Debug)]
struct BinaryLinkArgs {
    /// Package directory whose node_modules/.bin is checked
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Expected executable names
    #[arg(value_name = "NAMES")]
    names: Vec<String>,
}

impl From<Commands> for Assertion {
    fn from(command: Commands) -> Self {
        match command {
            Commands::DependOn(args) => Assertion::DependOn {
                dir: args.dir,
                package: args.package,
                range: args.range,
            },
            Commands::DevDependOn(args) => Assertion::DevDependOn {
                dir: args.dir,
                package: args.package,
                range: args.range,
            },
            Commands::BinaryLink(args) => Assertion::BinaryLink {
                dir: args.dir,
                names: args.names,
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let matchers = match cli.platform {
        Some(platform) => Matchers::with_platform(RealRuntime, platform),
        None => Matchers::new(RealRuntime),
    };

    let verdict = evaluate(&matchers, &cli.command.into())?;
    let (output, holds) = report(
        verdict,
        ReportOptions {
            negate: cli.negate,
            json: cli.json,
        },
    )?;
    println!("{}", output);

    if !holds {
        std::process::exit(1);
    }
    Ok(())
}
