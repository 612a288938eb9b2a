use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use language_tags::LanguageTag;

use rimotron::dataset::{self, DatasetStatus};
use rimotron::index::LexiconIndex;
use rimotron::ingest::{self, Source, SourceFile};
use rimotron::lexicon::table;
use rimotron::phonemizer::{CachedPhonemizer, EspeakConfig, EspeakPhonemizer};

#[derive(Debug, Parser)]
#[command(
    name = "lexicon-tools",
    about = "Build the phonetic lexicon used by rimotron."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download the datasets listed in a descriptor file
    Fetch {
        #[arg(long, default_value = "datasets.json")]
        desc: PathBuf,

        #[arg(default_value = "datasets")]
        dest: PathBuf,
    },

    /// Merge raw dictionaries into a lexicon table
    Build(BuildArgs),

    /// Print statistics for a lexicon table
    Info { table: PathBuf },
}

#[derive(Debug, Parser)]
struct BuildArgs {
    #[arg(long)]
    lexique: PathBuf,

    #[arg(long)]
    glaff: Option<PathBuf>,

    /// DELAF file, UTF-16, optionally gzipped
    #[arg(long)]
    dela: Option<PathBuf>,

    #[arg(long)]
    lefff: Option<PathBuf>,

    #[arg(short = 'o', long)]
    output: PathBuf,

    #[arg(long)]
    voice: Option<String>,

    #[arg(long)]
    espeak: Option<PathBuf>,
}

fn fetch(desc: PathBuf, dest: PathBuf) -> anyhow::Result<()> {
    let descriptors = dataset::load_descriptors(&desc)
        .with_context(|| format!("reading {}", desc.display()))?;
    std::fs::create_dir_all(&dest).with_context(|| format!("creating {}", dest.display()))?;

    let mut failed = vec![];
    for (name, descriptor) in &descriptors {
        match dataset::ensure_dataset(descriptor, &dest) {
            Ok(DatasetStatus::UpToDate) => println!("{}: up to date", name),
            Ok(DatasetStatus::Unverified) => println!("{}: present (unverified)", name),
            Ok(DatasetStatus::Downloaded) => println!("{}: downloaded", name),
            Err(e) => {
                log::error!("{}: {}", name, e);
                failed.push(name.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("{} dataset(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let mut espeak = match &args.voice {
        Some(voice) => {
            let tag = LanguageTag::parse(voice)
                .map_err(|e| anyhow::anyhow!("invalid voice {:?}: {}", voice, e))?;
            EspeakConfig::for_language(&tag)
        }
        None => EspeakConfig::default(),
    };
    if let Some(binary) = args.espeak {
        espeak.binary = binary;
    }
    let phonemizer = CachedPhonemizer::new(EspeakPhonemizer::new(espeak));

    let mut files = vec![SourceFile::new(Source::Lexique, args.lexique)];
    let optional = [
        (Source::Glaff, args.glaff),
        (Source::Delaf, args.dela),
        (Source::Lefff, args.lefff),
    ];
    for (source, path) in optional {
        if let Some(path) = path {
            files.push(SourceFile::new(source, path));
        }
    }

    let lexicon = ingest::build_lexicon(&files, &phonemizer)?;
    table::write_table(&lexicon, &args.output)?;
    println!(
        "Wrote {} entries ({} with a pronunciation) to {}",
        lexicon.len(),
        lexicon.usable_count(),
        args.output.display()
    );
    Ok(())
}

fn info(path: PathBuf) -> anyhow::Result<()> {
    let lexicon = table::read_table(&path)?;
    println!("Entries:\t{}", lexicon.len());
    println!("With pronunciation:\t{}", lexicon.usable_count());

    if lexicon.usable_count() > 0 {
        let index = LexiconIndex::new(lexicon)?;
        println!("Distinct lengths:\t{}", index.cover_index().lengths());
        println!("Suffix keys:\t{}", index.rhyme_index().len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    match Args::parse().command {
        Command::Fetch { desc, dest } => fetch(desc, dest),
        Command::Build(args) => build(args),
        Command::Info { table } => info(table),
    }
}
