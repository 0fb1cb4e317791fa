use std::error::Error as StdError;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lib_gamemap::{
    BatchError, BatchLoader, DEFAULT_DICTIONARY_PATH, DEFAULT_MAPS_DIR, MAP_EXTENSION, MapLoader,
    binary_io,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let characters = cli
        .characters
        .unwrap_or(PathBuf::from(DEFAULT_DICTIONARY_PATH));

    let result = match cli.command {
        Commands::CheckMap { map } => check_map(&characters, map),
        Commands::CompileMap { map, out } => {
            new_loader(&characters).and_then(|loader| compile_map(&loader, map, out))
        }
        Commands::DumpMap { map } => dump_map(map),
        Commands::CompileDir { dir, out } => compile_dir(&characters, dir, out),
        Commands::LoadDir { dir } => load_dir(&characters, dir),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn new_loader(characters: &PathBuf) -> Result<MapLoader, Box<dyn StdError>> {
    Ok(MapLoader::from_dictionary_file(characters)?)
}

fn check_map(characters: &PathBuf, map: PathBuf) -> Result<(), Box<dyn StdError>> {
    println!("Checking {map:?}");

    new_loader(characters)?.load_map(map)?;
    Ok(())
}

fn compile_map(loader: &MapLoader, map: PathBuf, out: PathBuf) -> Result<(), Box<dyn StdError>> {
    println!("Compiling {map:?} into {out:?}");

    let map = loader.load_map(map)?;
    let out = fs::File::create(out)?;
    binary_io::compile::write_map(&map, out)?;
    Ok(())
}

fn dump_map(map: PathBuf) -> Result<(), Box<dyn StdError>> {
    let map_data = fs::read(map)?;
    let map = binary_io::load_from_memory(&map_data)?;
    println!("{map:?}");
    Ok(())
}

fn compile_dir(characters: &PathBuf, dir: PathBuf, out: PathBuf) -> Result<(), Box<dyn StdError>> {
    let loader = new_loader(characters)?;
    for file in fs::read_dir(dir)? {
        let file = file?.path();
        let name = file.file_name().expect("File in DirEntry has no name");
        let Some(extension) = file.extension() else {
            continue;
        };
        if extension != MAP_EXTENSION {
            continue;
        }

        let mut buff = out.clone();
        buff.push(name);
        buff.set_extension("bin");
        compile_map(&loader, file, buff)?;
    }
    Ok(())
}

fn load_dir(characters: &PathBuf, dir: PathBuf) -> Result<(), Box<dyn StdError>> {
    let loader = new_loader(characters)?;
    let mut batch = BatchLoader::new(loader, dir)?;

    println!("Loading {} maps", batch.total());
    loop {
        match batch.load_next() {
            Ok(step) => println!("[{:>5.1}%] loaded {}", step.progress, step.name),
            Err(BatchError::AlreadyComplete) => break,
            Err(e) => return Err(e.into()),
        }
    }
    println!("Done: {} maps loaded", batch.maps().len());
    Ok(())
}

/// A tool for working with the game's maps.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The location of the character dictionary
    #[arg(long, value_name = "FILE")]
    characters: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if a map satisfies all conventions
    CheckMap {
        /// The map to check
        #[arg(short, long, value_name = "FILE")]
        map: PathBuf,
    },
    /// Convert a map into binary format
    CompileMap {
        /// The map to compile
        #[arg(short, long, value_name = "FILE")]
        map: PathBuf,
        /// The output file
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Debug-dump a binary map
    DumpMap {
        /// The map to dump
        #[arg(short, long, value_name = "FILE")]
        map: PathBuf,
    },
    /// Build all maps in specified directory and put
    /// the compiled maps in the other. Each map called
    /// "name.json" will be turned into "name.bin".
    CompileDir {
        /// The directory to read the maps from
        #[arg(short, long, value_name = "DIR")]
        dir: PathBuf,
        /// The directory to put the results into
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Load every map in a directory one call at a time,
    /// printing progress
    LoadDir {
        /// The directory to read the maps from
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_MAPS_DIR)]
        dir: PathBuf,
    },
}
