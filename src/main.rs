use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use time::macros::format_description;
use time::OffsetDateTime;

use wndb_lmf::senseidx::{build_sense_index, write_sense_index};
use wndb_lmf::{build_lexicon, load_ili_map, BuildOptions, LexiconInfo, Result, Source, WndbError};

fn cli() -> Command {
    let log = Arg::new("log")
        .long("log")
        .value_name("log.txt")
        .help("Where to write the log to (default: standard error)");
    Command::new("wndb-lmf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tools for converting WNDB databases into WN-LMF style lexicons")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert a WNDB directory into a lexicon (JSON)")
                .arg(Arg::new("SRC").required(true).help("The WNDB directory"))
                .arg(
                    Arg::new("DEST")
                        .required(true)
                        .help("The output file, compressed if it ends in .bz2"),
                )
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_name("ID")
                        .required(true)
                        .help("The lexicon identifier, e.g., pwn30"),
                )
                .arg(meta_arg("label", "LABEL", "A descriptive label for the lexicon"))
                .arg(meta_arg("language", "LANG", "The language of the lexicon"))
                .arg(meta_arg("email", "EMAIL", "The maintainer's email address"))
                .arg(meta_arg("license", "LICENSE", "The license of the lexicon"))
                .arg(meta_arg("version", "VERSION", "The version of this lexicon"))
                .arg(meta_arg("url", "URL", "A URL for the project"))
                .arg(meta_arg("citation", "CITATION", "A citation for the project"))
                .arg(meta_arg("logo", "URL", "A URL for a logo for the project"))
                .arg(
                    Arg::new("ili-map")
                        .long("ili-map")
                        .value_name("ili-map.tab")
                        .help("A file mapping ILI ids to synset offsets"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on redundant senses, unknown pointers and similar noise"),
                )
                .arg(log.clone()),
        )
        .subcommand(
            Command::new("senseidx")
                .about("Build a sense index (index.sense) from a WNDB directory")
                .arg(Arg::new("SRC").required(true).help("The WNDB directory"))
                .arg(
                    Arg::new("outfile")
                        .short('o')
                        .long("outfile")
                        .value_name("index.sense")
                        .default_value("-")
                        .help("Where to write the index (standard output if -)"),
                )
                .arg(
                    Arg::new("use-adjposition")
                        .long("use-adjposition")
                        .action(ArgAction::SetTrue)
                        .help("Keep adjective positions on satellite head words"),
                )
                .arg(log),
        )
}

fn meta_arg(name: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name(value_name).help(help)
}

fn value<'a>(args: &'a ArgMatches, name: &str) -> Option<&'a str> {
    args.get_one::<String>(name).map(String::as_str)
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[day]/[month]/[year repr:last_two] [hour]:[minute]"
    ))
    .unwrap_or_default()
}

fn init_logging(log_file: Option<&str>) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(buf, "[{}] {}: {}", timestamp(), record.level(), record.args())
    });
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Writes to `path`, or standard output if there is none. `.bz2` files are
/// compressed.
fn write_output<F>(path: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = match path {
        Some(path) => path,
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            return write(&mut out)
                .and_then(|_| out.flush())
                .map_err(|e| WndbError::Io {
                    path: PathBuf::from("-"),
                    source: e,
                });
        }
    };
    let io_err = |e| WndbError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let file = BufWriter::new(File::create(path).map_err(io_err)?);
    if path.to_string_lossy().ends_with(".bz2") {
        let mut out = BzEncoder::new(file, Compression::best());
        write(&mut out).map_err(io_err)?;
        out.finish().and_then(|mut f| f.flush()).map_err(io_err)
    } else {
        let mut out = file;
        write(&mut out).and_then(|_| out.flush()).map_err(io_err)
    }
}

fn convert(args: &ArgMatches) -> Result<()> {
    // required arguments are checked by clap
    let src = Path::new(value(args, "SRC").unwrap_or_default());
    let dest = Path::new(value(args, "DEST").unwrap_or_default());

    let mut info = LexiconInfo::new(value(args, "id").unwrap_or_default());
    if let Some(label) = value(args, "label") {
        info.label = label.to_string();
    }
    if let Some(language) = value(args, "language") {
        info.language = language.to_string();
    }
    if let Some(email) = value(args, "email") {
        info.email = email.to_string();
    }
    if let Some(license) = value(args, "license") {
        info.license = license.to_string();
    }
    if let Some(version) = value(args, "version") {
        info.version = version.to_string();
    }
    info.url = value(args, "url").map(String::from);
    info.citation = value(args, "citation").map(String::from);
    info.logo = value(args, "logo").map(String::from);
    let options = BuildOptions {
        strict: args.get_flag("strict"),
    };

    info!("Building {}:{}", info.id, info.version);
    let source = Source::load(src)?;
    let ili_map = match value(args, "ili-map") {
        Some(path) => {
            info!("Loading ILI map");
            load_ili_map(Path::new(path))?
        }
        None => HashMap::new(),
    };
    let (lexicon, diagnostics) = build_lexicon(&source, info, &ili_map, options)?;
    diagnostics.log_summary();

    info!("Writing to {}", dest.display());
    write_output(Some(dest), |out| {
        serde_json::to_writer_pretty(out, &lexicon).map_err(io::Error::from)
    })?;
    info!(
        "Built {}:{} with {} entries and {} synsets",
        lexicon.info.id,
        lexicon.info.version,
        lexicon.lexical_entries.len(),
        lexicon.synsets.len()
    );
    Ok(())
}

fn senseidx(args: &ArgMatches) -> Result<()> {
    let src = Path::new(value(args, "SRC").unwrap_or_default());
    if !src.is_dir() {
        return Err(WndbError::MissingRequiredFile(src.to_path_buf()));
    }
    let senses = build_sense_index(src, args.get_flag("use-adjposition"))?;
    let outfile = value(args, "outfile").filter(|path| *path != "-");
    write_output(outfile.map(Path::new), |out| write_sense_index(&senses, out))
}

fn main() {
    let args = cli().get_matches();
    let (name, sub) = match args.subcommand() {
        Some(subcommand) => subcommand,
        None => process::exit(2),
    };
    let log_file = value(sub, "log");
    if let Err(e) = init_logging(log_file) {
        eprintln!("Could not open log file: {}", e);
        process::exit(2);
    }

    let result = match name {
        "convert" => convert(sub),
        "senseidx" => senseidx(sub),
        _ => Ok(()),
    };
    if let Err(err) = result {
        error!("{}", err);
        if log_file.is_some() {
            eprintln!("{}", err);
        }
        process::exit(1);
    }
}
