use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use quire::build::{build_site, clean};
use quire::config::Config;
use quire::frontmatter::parse_date;
use quire::new_post::{create, NewPost};
use std::error::Error;
use std::path::{Path, PathBuf};

const DEFAULTS_ENV: &str = "QUIRE_DEFAULTS_DIR";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let matches = App::new("quire")
        .about("Builds a static blog from a directory of Markdown posts")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("root")
                .long("root")
                .takes_value(true)
                .help("The project directory (default: the current directory)"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .takes_value(true)
                .help("The output directory (default: {root}/docs)"),
        )
        .arg(
            Arg::with_name("defaults")
                .long("defaults")
                .takes_value(true)
                .help("The default theme directory (falls back to $QUIRE_DEFAULTS_DIR)"),
        )
        .subcommand(SubCommand::with_name("generate").about("Generates the site (the default)"))
        .subcommand(SubCommand::with_name("clean").about("Empties the output directory"))
        .subcommand(
            SubCommand::with_name("new")
                .about("Creates a new post")
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("date")
                        .long("date")
                        .takes_value(true)
                        .help("YYYY-MM-DD (default: today)"),
                )
                .arg(Arg::with_name("description").long("description").takes_value(true))
                .arg(
                    Arg::with_name("body-file")
                        .long("body-file")
                        .takes_value(true)
                        .help("A Markdown file to use as the post body"),
                ),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let root = PathBuf::from(matches.value_of("root").unwrap_or("."));
    let defaults = matches
        .value_of("defaults")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(DEFAULTS_ENV).map(PathBuf::from));
    let config = Config::from_directory(
        &root,
        matches.value_of("output").map(Path::new),
        defaults.as_deref(),
    )?;

    match matches.subcommand() {
        ("clean", _) => clean(&config)?,
        ("new", Some(args)) => {
            let body = match args.value_of("body-file") {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };
            let path = create(
                &config,
                &NewPost {
                    title: args.value_of("title").unwrap_or_default().to_owned(),
                    date: args.value_of("date").map(parse_date).transpose()?,
                    description: args.value_of("description").map(str::to_owned),
                    body,
                },
            )?;
            println!("{}", path.display());
        }
        _ => {
            build_site(&config)?;
        }
    }
    Ok(())
}
