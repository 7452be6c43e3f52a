use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Builds the index of an EDICT file.
    Index {
        /// The path to the input EDICT file.
        #[arg(short, long, env = "SEARCHEDICT_EDICT")]
        edict: PathBuf,
        /// The path to the output index. Defaults to the EDICT path with `.index` appended.
        #[arg(short, long, env = "SEARCHEDICT_INDEX")]
        output: Option<PathBuf>,
        /// The minimum number of milliseconds between progress reports. Defaults to 1/64 s.
        #[arg(short, long)]
        progress_step_ms: Option<u64>,
    },
    /// Prints the entries with the given writing or reading.
    Search {
        /// The path to the EDICT file.
        #[arg(short, long, env = "SEARCHEDICT_EDICT")]
        edict: PathBuf,
        /// The path to the index of the EDICT file.
        #[arg(short, long, env = "SEARCHEDICT_INDEX")]
        index: Option<PathBuf>,
        /// Print the entries as JSON.
        #[arg(short, long)]
        json: bool,
        /// The word to look up.
        key: String,
    },
    /// Prints the sequence number of the entry matching the given word.
    Guess {
        /// The path to the EDICT file.
        #[arg(short, long, env = "SEARCHEDICT_EDICT")]
        edict: PathBuf,
        /// The path to the index of the EDICT file.
        #[arg(short, long, env = "SEARCHEDICT_INDEX")]
        index: Option<PathBuf>,
        /// The word in kanji.
        #[arg(long)]
        kanji: Option<String>,
        /// The word in kana.
        #[arg(long)]
        kana: Option<String>,
        /// The word as furigana, e.g. 食[た]べ 物[もの]. Takes precedence over --kanji and --kana.
        #[arg(short, long)]
        furigana: Option<String>,
    },
    /// Prints the word with its reading as furigana.
    Furigana {
        /// The path to the KANJIDIC file.
        #[arg(short, long, env = "SEARCHEDICT_KANJIDIC")]
        kanjidic: PathBuf,
        /// Print every possible alignment instead of the first one.
        #[arg(short, long)]
        all: bool,
        /// The word.
        kanji: String,
        /// The reading of the word.
        kana: String,
    },
}
