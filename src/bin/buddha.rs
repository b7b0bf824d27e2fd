use clap::{App, AppSettings, Arg, ArgMatches, ErrorKind, SubCommand};
use nebulabrot::pipeline::{self, GenerateConfig, DEFAULT_DATA_FILE, DEFAULT_IMAGE_FILE};
use nebulabrot::{BuddhaError, ImageFormat, Thresholds};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::str::FromStr;
use tracing::Level;

const USAGE: &str = "buddha generate width height samples red green blue\n\
                     buddha render width height";

const GENERATE: &str = "generate";
const RENDER: &str = "render";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const SAMPLES: &str = "samples";
const RED: &str = "red";
const GREEN: &str = "green";
const BLUE: &str = "blue";
const DATA: &str = "data";
const OUTPUT: &str = "output";
const FORMAT: &str = "format";
const SEED: &str = "seed";
const QUIET: &str = "quiet";
const VERBOSE: &str = "verbose";

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn positional(
    name: &'static str,
    index: u64,
    help: &'static str,
    err: &'static str,
) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .required(true)
        .index(index)
        .validator(move |s| validate_number::<u64>(&s, err))
        .help(help)
}

fn data_arg() -> Arg<'static, 'static> {
    Arg::with_name(DATA)
        .long(DATA)
        .short("d")
        .takes_value(true)
        .default_value(DEFAULT_DATA_FILE)
        .help("Histogram file")
}

fn verbose_arg() -> Arg<'static, 'static> {
    Arg::with_name(VERBOSE)
        .long(VERBOSE)
        .short("v")
        .help("Log what each phase is doing")
}

fn app() -> App<'static, 'static> {
    App::new("buddha")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Nebulabrot generator and renderer")
        .setting(AppSettings::SubcommandRequired)
        .subcommand(
            SubCommand::with_name(GENERATE)
                .about("Trace escaping orbits into the histogram file")
                .arg(positional(WIDTH, 1, "Image width", "Could not parse width"))
                .arg(positional(HEIGHT, 2, "Image height", "Could not parse height"))
                .arg(positional(SAMPLES, 3, "Escaping orbits to trace", "Could not parse sample count"))
                .arg(positional(RED, 4, "Red iteration threshold", "Could not parse red threshold"))
                .arg(positional(GREEN, 5, "Green iteration threshold", "Could not parse green threshold"))
                .arg(positional(BLUE, 6, "Blue iteration threshold", "Could not parse blue threshold"))
                .arg(data_arg())
                .arg(
                    Arg::with_name(SEED)
                        .long(SEED)
                        .short("s")
                        .takes_value(true)
                        .validator(|s| validate_number::<u64>(&s, "Could not parse seed"))
                        .help("Seed for the random number generator"),
                )
                .arg(
                    Arg::with_name(QUIET)
                        .long(QUIET)
                        .short("q")
                        .help("Don't print progress"),
                )
                .arg(verbose_arg()),
        )
        .subcommand(
            SubCommand::with_name(RENDER)
                .about("Tone map the histogram file into an image")
                .arg(positional(WIDTH, 1, "Image width", "Could not parse width"))
                .arg(positional(HEIGHT, 2, "Image height", "Could not parse height"))
                .arg(data_arg())
                .arg(
                    Arg::with_name(OUTPUT)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output file [default: buddha.ppm, or buddha.png for png]"),
                )
                .arg(
                    Arg::with_name(FORMAT)
                        .long(FORMAT)
                        .short("f")
                        .takes_value(true)
                        .possible_values(&["ppm", "png"])
                        .default_value("ppm")
                        .help("Image format"),
                )
                .arg(verbose_arg()),
        )
}

// Every value reaching here has been through a validator.
fn value<T: FromStr + Default>(matches: &ArgMatches, name: &str) -> T {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .unwrap_or_default()
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.is_present(VERBOSE) {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_progress(accepted: u64, samples: u64) {
    eprint!("{}%\r", accepted * 100 / samples);
    let _ = std::io::stderr().flush();
}

fn generate(matches: &ArgMatches) -> Result<(), BuddhaError> {
    let thresholds = Thresholds::new(
        value(matches, RED),
        value(matches, GREEN),
        value(matches, BLUE),
    )?;
    let config = GenerateConfig::new(
        value(matches, WIDTH),
        value(matches, HEIGHT),
        value(matches, SAMPLES),
        thresholds,
    )?;
    let mut rng = match matches.value_of(SEED) {
        Some(_) => StdRng::seed_from_u64(value(matches, SEED)),
        None => StdRng::from_entropy(),
    };
    let data = matches.value_of(DATA).unwrap_or(DEFAULT_DATA_FILE);
    if matches.is_present(QUIET) {
        pipeline::generate_to_file(&config, &mut rng, &mut nebulabrot::NoProgress, data)?;
    } else {
        pipeline::generate_to_file(&config, &mut rng, &mut print_progress, data)?;
        eprintln!();
    }
    println!("done!");
    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), BuddhaError> {
    let format = matches
        .value_of(FORMAT)
        .and_then(|s| ImageFormat::from_str(s).ok())
        .unwrap_or(ImageFormat::Ppm);
    let output = match (matches.value_of(OUTPUT), format) {
        (Some(output), _) => output,
        (None, ImageFormat::Ppm) => DEFAULT_IMAGE_FILE,
        (None, ImageFormat::Png) => "buddha.png",
    };
    pipeline::render_file(
        value(matches, WIDTH),
        value(matches, HEIGHT),
        matches.value_of(DATA).unwrap_or(DEFAULT_DATA_FILE),
        output,
        format,
    )?;
    println!("done!");
    Ok(())
}

fn run() -> Result<(), BuddhaError> {
    let matches = match app().get_matches_safe() {
        Ok(matches) => matches,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
                eprintln!("{}", e.message);
                std::process::exit(-1);
            }
            _ => {
                return Err(BuddhaError::InvalidArgumentCount {
                    usage: format!("{}\n\n{}", e.message, USAGE),
                })
            }
        },
    };
    match matches.subcommand() {
        (GENERATE, Some(sub)) => {
            init_logging(sub);
            generate(sub)
        }
        (RENDER, Some(sub)) => {
            init_logging(sub);
            render(sub)
        }
        _ => Err(BuddhaError::InvalidArgumentCount {
            usage: USAGE.to_string(),
        }),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(-1);
    }
}
