use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use language_tags::LanguageTag;
use rayon::prelude::*;
use serde::Serialize;

use rimotron::config::SearchConfig;
use rimotron::index::LexiconIndex;
use rimotron::phonemizer::{CachedPhonemizer, EspeakConfig, EspeakPhonemizer};
use rimotron::pronunciation::Pronunciation;
use rimotron::search::{PhoneticEngine, Rhyme, WordplaySearch};
use rimotron::types::Cover;

type Engine = PhoneticEngine<CachedPhonemizer<EspeakPhonemizer>>;

trait OutputWriter {
    fn write_covers(&mut self, word: &str, covers: &[Cover]);
    fn write_rhymes(&mut self, word: &str, rhymes: &[Rhyme]);
    fn write_pronunciation(&mut self, word: &str, pronunciation: &Pronunciation);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_covers(&mut self, word: &str, covers: &[Cover]) {
        println!("{} -> {:?}", word, covers);
    }

    fn write_rhymes(&mut self, _word: &str, rhymes: &[Rhyme]) {
        for rhyme in rhymes {
            match rhyme.distance {
                Some(d) => println!("{}\t\t{}\t(distance {})", rhyme.value, rhyme.frequency, d),
                None => println!("{}\t\t{}", rhyme.value, rhyme.frequency),
            }
        }
    }

    fn write_pronunciation(&mut self, word: &str, pronunciation: &Pronunciation) {
        println!("{}\t{}", word, pronunciation);
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
struct CoverResult {
    word: String,
    covers: Vec<Cover>,
}

#[derive(Serialize)]
struct RhymeResult {
    word: String,
    rhymes: Vec<Rhyme>,
}

#[derive(Serialize)]
struct PronunciationResult {
    word: String,
    pronunciation: Pronunciation,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonWriter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cover: Vec<CoverResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rhyme: Vec<RhymeResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pronounce: Vec<PronunciationResult>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        Self::default()
    }
}

impl OutputWriter for JsonWriter {
    fn write_covers(&mut self, word: &str, covers: &[Cover]) {
        self.cover.push(CoverResult {
            word: word.to_string(),
            covers: covers.to_vec(),
        });
    }

    fn write_rhymes(&mut self, word: &str, rhymes: &[Rhyme]) {
        self.rhyme.push(RhymeResult {
            word: word.to_string(),
            rhymes: rhymes.to_vec(),
        });
    }

    fn write_pronunciation(&mut self, word: &str, pronunciation: &Pronunciation) {
        self.pronounce.push(PronunciationResult {
            word: word.to_string(),
            pronunciation: pronunciation.clone(),
        });
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Could not serialize results: {}", e),
        }
    }
}

fn writer(json: bool) -> Box<dyn OutputWriter> {
    if json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "rimotron",
    about = "Rhymes and homophone covers for French words"
)]
struct Args {
    /// Lexicon table built by lexicon-tools
    #[arg(short = 'l', long, global = true, default_value = "lex_master.tsv")]
    lexicon: PathBuf,

    /// JSON search configuration
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Language tag for the phonemizer voice
    #[arg(long, global = true)]
    voice: Option<String>,

    /// Path to the espeak-ng executable
    #[arg(long, global = true)]
    espeak: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split each word into lexicon words that sound the same
    ///
    /// A word is never offered as its own cover. To allow it, pass a --config
    /// file containing {"cover": {"exclude_self": false}}.
    Cover(CoverArgs),

    /// List words rhyming with each input
    Rhyme(RhymeArgs),

    /// Print the pronunciation the searches use
    Pronounce(PronounceArgs),
}

#[derive(Debug, Parser)]
struct CoverArgs {
    /// Maximum candidates tried per span length
    #[arg(short = 'b', long)]
    max_branch: Option<usize>,

    /// Cover the whole phrase at once instead of word by word
    #[arg(long)]
    whole: bool,

    #[arg(long)]
    json: bool,

    inputs: Vec<String>,
}

#[derive(Debug, Parser)]
struct RhymeArgs {
    /// Number of trailing phonemes that must match
    #[arg(short = 'm', long = "min-syl")]
    min_syllables: Option<usize>,

    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Fall back to near rhymes when nothing matches exactly
    #[arg(short = 'a', long)]
    approx: bool,

    #[arg(long)]
    json: bool,

    inputs: Vec<String>,
}

#[derive(Debug, Parser)]
struct PronounceArgs {
    #[arg(long)]
    json: bool,

    inputs: Vec<String>,
}

fn read_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    let text = if inputs.is_empty() {
        eprintln!("Reading from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        inputs.join(" ")
    };

    Ok(text.split_whitespace().map(|x| x.to_string()).collect())
}

fn load_engine(args: &Args) -> anyhow::Result<Engine> {
    let mut espeak = match &args.voice {
        Some(voice) => {
            let tag = LanguageTag::parse(voice)
                .map_err(|e| anyhow::anyhow!("invalid voice {:?}: {}", voice, e))?;
            EspeakConfig::for_language(&tag)
        }
        None => EspeakConfig::default(),
    };
    if let Some(binary) = &args.espeak {
        espeak.binary = binary.clone();
    }

    let index = LexiconIndex::open(&args.lexicon)
        .with_context(|| format!("loading lexicon {}", args.lexicon.display()))?;
    log::info!(
        "Loaded {} entries from {}",
        index.lexicon().len(),
        args.lexicon.display()
    );

    let phonemizer = CachedPhonemizer::new(EspeakPhonemizer::new(espeak));
    Ok(PhoneticEngine::new(Arc::new(index), phonemizer))
}

fn load_config(args: &Args) -> anyhow::Result<SearchConfig> {
    match &args.config {
        Some(path) => Ok(SearchConfig::from_path(path)?),
        None => Ok(SearchConfig::default()),
    }
}

fn cover(engine: &Engine, mut config: SearchConfig, args: CoverArgs) -> anyhow::Result<()> {
    if let Some(v) = args.max_branch {
        config.cover.max_branch = v;
    }

    let mut words = read_inputs(args.inputs)?;
    if args.whole {
        words = vec![words.join(" ")];
    }

    // Words are independent, results come back in input order.
    let results: Vec<(String, Vec<Cover>)> = words
        .into_par_iter()
        .map(|word| {
            let covers = engine.cover_with_config(&word, &config.cover);
            (word, covers)
        })
        .collect();

    let mut writer = writer(args.json);
    for (word, covers) in results {
        writer.write_covers(&word, &covers);
    }
    writer.finish();

    Ok(())
}

fn rhyme(engine: &Engine, mut config: SearchConfig, args: RhymeArgs) -> anyhow::Result<()> {
    if let Some(v) = args.min_syllables {
        config.rhyme.min_syllables = v;
    }
    if let Some(v) = args.max_results {
        config.rhyme.limit = v;
    }
    if args.approx {
        config.rhyme.approximate = true;
    }

    let mut writer = writer(args.json);
    for word in read_inputs(args.inputs)? {
        let rhymes = engine.rhymes_with_config(&word, &config.rhyme);
        writer.write_rhymes(&word, &rhymes);
    }
    writer.finish();

    Ok(())
}

fn pronounce(engine: &Engine, args: PronounceArgs) -> anyhow::Result<()> {
    let mut writer = writer(args.json);
    for word in read_inputs(args.inputs)? {
        writer.write_pronunciation(&word, &engine.pronounce(&word));
    }
    writer.finish();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let engine = load_engine(&args)?;

    match args.command {
        Command::Cover(cmd) => cover(&engine, config, cmd),
        Command::Rhyme(cmd) => rhyme(&engine, config, cmd),
        Command::Pronounce(cmd) => pronounce(&engine, cmd),
    }
}
