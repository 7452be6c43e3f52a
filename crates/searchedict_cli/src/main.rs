//! Builds and queries EDICT indices, and produces furigana for words.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use eyre::WrapErr;
use searchedict::{
    edict::{index::DEFAULT_PROGRESS_STEP, search::default_index_path, SOURCE_ENCODING},
    furigana, match_kanji_kana, BuildOptions, Dictionary, Guess, Kanjidic,
};
use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Index {
            edict,
            output,
            progress_step_ms,
        } => {
            let output = output.unwrap_or_else(|| default_index_path(&edict));
            build_index(&edict, &output, progress_step(progress_step_ms))?;
        }
        Command::Search {
            edict,
            index,
            json,
            key,
        } => {
            let dictionary = open_dictionary(&edict, index.as_deref())?;
            search(&dictionary, &key, json)?;
        }
        Command::Guess {
            edict,
            index,
            kanji,
            kana,
            furigana: furigana_text,
        } => {
            let (kanji, kana) = match furigana_text {
                Some(text) => (Some(furigana::kanji(&text)), Some(furigana::kana(&text))),
                None => (kanji, kana),
            };
            let dictionary = open_dictionary(&edict, index.as_deref())?;
            guess(&dictionary, kanji.as_deref(), kana.as_deref())?;
        }
        Command::Furigana {
            kanjidic,
            all,
            kanji,
            kana,
        } => {
            print_furigana(&kanjidic, &kanji, &kana, all)?;
        }
    }

    Ok(())
}

fn progress_step(progress_step_ms: Option<u64>) -> Duration {
    progress_step_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PROGRESS_STEP)
}

fn build_index(edict: &Path, output: &Path, progress_step: Duration) -> eyre::Result<()> {
    let options = BuildOptions {
        progress_step,
        ..BuildOptions::default()
    };
    searchedict::build_index_with_progress(edict, output, &options, |progress| {
        tracing::info!("{:.0}%", progress * 100.0);
    })
    .wrap_err_with(|| format!("Failed to index '{}'", edict.display()))?;
    Ok(())
}

fn open_dictionary(edict: &Path, index: Option<&Path>) -> eyre::Result<Dictionary> {
    let index = index
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_index_path(edict));
    tracing::info!("opening {} with {}", edict.display(), index.display());
    Dictionary::open(edict, &index, SOURCE_ENCODING).wrap_err_with(|| {
        format!(
            "Failed to open dictionary, build the index with `searchedict index --edict {}` first",
            edict.display()
        )
    })
}

fn search(dictionary: &Dictionary, key: &str, json: bool) -> eyre::Result<()> {
    let entries = dictionary.search(key);
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &entries)?;
        writeln!(stdout)?;
    } else {
        for entry in entries {
            writeln!(stdout, "{}", entry.line)?;
        }
    }
    Ok(())
}

fn guess(dictionary: &Dictionary, kanji: Option<&str>, kana: Option<&str>) -> eyre::Result<()> {
    if kanji.is_none() && kana.is_none() {
        eyre::bail!("Either the kanji, the kana or the furigana of the word is required");
    }
    match dictionary.guess(kanji, kana) {
        Guess::NotFound => eyre::bail!("No entry found"),
        Guess::Unique(entry) => match entry.sequence_number() {
            Some(sequence_number) => println!("{sequence_number}"),
            None => println!("{}", entry.line),
        },
        Guess::Ambiguous(entries) => {
            tracing::warn!("{} entries match", entries.len());
            for entry in entries {
                println!("{}", entry.line);
            }
        }
    }
    Ok(())
}

fn print_furigana(kanjidic: &Path, kanji: &str, kana: &str, all: bool) -> eyre::Result<()> {
    let kanjidic = Kanjidic::open(kanjidic)?;
    tracing::info!("loaded readings for {} kanji", kanjidic.len());

    let mut matches = match_kanji_kana(kanji, kana, &kanjidic);
    if all {
        for segmentation in matches {
            println!("{}", segmentation.to_furigana());
        }
    } else if let Some(segmentation) = matches.next() {
        if segmentation.fallback {
            tracing::warn!("Failed to align '{kanji}' with '{kana}'");
        }
        println!("{}", segmentation.to_furigana());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn progress_step_defaults_to_library_step() {
        let cli = Cli::try_parse_from(["searchedict", "index", "--edict", "edict2"]).unwrap();
        let Command::Index {
            progress_step_ms, ..
        } = cli.command
        else {
            panic!("expected the index command");
        };
        assert_eq!(progress_step(progress_step_ms), DEFAULT_PROGRESS_STEP);
        assert_eq!(progress_step(Some(500)), Duration::from_millis(500));
    }
}
