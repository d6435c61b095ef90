use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use gumdrop::Options;
use serde::Serialize;

use smartkey::database::WhichEntries;
use smartkey::speller::Speller;
use smartkey::store::Entry;
use smartkey::{Settings, SpellCheckEngine, SpellCheckResult, WordGuess, WordListSpeller};

trait OutputWriter {
    fn write_result(&mut self, word: &str, result: &SpellCheckResult);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_result(&mut self, word: &str, result: &SpellCheckResult) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if result.in_dictionary { "CORRECT" } else { "INCORRECT" }
        );

        for guess in &result.guesses {
            let mut flags = vec![];
            if guess.is_auto_replace {
                flags.push("replace");
            }
            if guess.is_spelling_correction {
                flags.push("correction");
            }
            if guess.is_auto_accept {
                flags.push("accept");
            }
            println!("{}\t\t{}", guess.text, flags.join(","));
        }
        println!();
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest {
    word: String,
    in_dictionary: bool,
    guesses: Vec<WordGuess>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<CheckRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_result(&mut self, word: &str, result: &SpellCheckResult) {
        self.results.push(CheckRequest {
            word: word.to_owned(),
            in_dictionary: result.in_dictionary,
            guesses: result.guesses.clone(),
        });
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}", e),
        }
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "c", help = "JSON settings file")]
    config: Option<PathBuf>,

    #[options(short = "d", long = "data-dir", help = "directory of shipped dictionaries")]
    data_dir: Option<PathBuf>,

    #[options(short = "u", long = "user-dir", help = "directory for user dictionaries")]
    user_dir: Option<PathBuf>,

    #[options(short = "w", help = "directory of per-locale word lists")]
    words: Option<PathBuf>,

    #[options(short = "l", help = "locale such as en_us")]
    locale: Option<String>,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "check words and print guesses")]
    Check(CheckArgs),

    #[options(help = "complete a prefix")]
    Complete(CompleteArgs),

    #[options(help = "add words to the user dictionary")]
    Learn(LearnArgs),

    #[options(help = "add an auto-replace shortcut")]
    Shortcut(ShortcutArgs),

    #[options(help = "list auto-replace shortcuts")]
    Entries(EntriesArgs),
}

#[derive(Debug, Options)]
struct CheckArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "maximum number of guesses")]
    nbest: Option<usize>,

    #[options(no_short, long = "context", help = "text typed before the words")]
    context: Option<String>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct CompleteArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, help = "prefixes to complete")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct LearnArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, long = "person", help = "learn the words as a contact name")]
    is_person: bool,

    #[options(free, help = "words to learn")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct ShortcutArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, help = "shortcut and its expansion")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct EntriesArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, long = "user", help = "only entries added by the user")]
    user_only: bool,

    #[options(no_short, long = "stock", help = "only shipped entries")]
    stock_only: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = match args.config.as_ref() {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };

    if let Some(dir) = args.data_dir.as_ref() {
        settings.read_only_data_dir = dir.clone();
    }
    if let Some(dir) = args.user_dir.as_ref() {
        settings.read_write_data_dir = dir.clone();
    }
    if let Some(locale) = args.locale.as_ref() {
        settings.locale = locale.clone();
    }
    Ok(settings)
}

fn open_engine(args: &Args) -> anyhow::Result<SpellCheckEngine> {
    let settings = load_settings(args)?;
    let speller: Arc<dyn Speller> = match args.words.as_ref() {
        Some(dir) => Arc::new(WordListSpeller::open(dir)),
        None => Arc::new(WordListSpeller::from_words(Vec::<String>::new())),
    };

    Ok(SpellCheckEngine::new(settings, speller))
}

fn read_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }

    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer
        .lines()
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect())
}

fn check(engine: &SpellCheckEngine, args: CheckArgs) -> anyhow::Result<()> {
    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    let max_guesses = args.nbest.unwrap_or(5);
    for word in read_inputs(args.inputs)? {
        let result = match args.context.as_ref() {
            Some(context) => engine.auto_correct(&word, context, max_guesses),
            None => engine.check_spelling(&word, max_guesses),
        };

        match result {
            Ok(result) => writer.write_result(&word, &result),
            Err(e) => eprintln!("{}: {} ({})", word, e, e.code()),
        }
    }

    writer.finish();
    Ok(())
}

fn complete(engine: &SpellCheckEngine, args: CompleteArgs) -> anyhow::Result<()> {
    for prefix in read_inputs(args.inputs)? {
        match engine.get_completion(&prefix)? {
            Some(completion) => println!("{}\t{}", prefix, completion),
            None => println!("{}\t-", prefix),
        }
    }
    Ok(())
}

fn learn(engine: &SpellCheckEngine, args: LearnArgs) -> anyhow::Result<()> {
    for word in read_inputs(args.inputs)? {
        if args.is_person {
            let parts = engine.add_person(&word)?;
            println!("{}: {}", word, parts.join(" "));
        } else {
            match engine.learn_word(&word) {
                Ok(()) => println!("{}: learned", word),
                Err(e) => eprintln!("{}: {}", word, e),
            }
        }
    }
    engine.save()?;
    Ok(())
}

fn shortcut(engine: &SpellCheckEngine, args: ShortcutArgs) -> anyhow::Result<()> {
    let (shortcut, substitution) = match args.inputs.split_first() {
        Some((shortcut, rest)) if !rest.is_empty() => (shortcut.clone(), rest.join(" ")),
        _ => anyhow::bail!("expected a shortcut followed by its expansion"),
    };

    engine.add_entry(&Entry::new(shortcut, substitution))?;
    engine.save()?;
    Ok(())
}

fn entries(engine: &SpellCheckEngine, args: EntriesArgs) -> anyhow::Result<()> {
    let which = match (args.user_only, args.stock_only) {
        (true, false) => WhichEntries::UserOnly,
        (false, true) => WhichEntries::StockOnly,
        _ => WhichEntries::All,
    };

    let count = engine.num_entries(which)?;
    let entries = engine.entries(0, count, which)?;

    if args.use_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in entries {
            println!("{}\t{}", entry.shortcut, entry.substitution);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut args = Args::parse_args_default_or_exit();
    let command = match args.command.take() {
        Some(command) => command,
        None => return Ok(()),
    };

    let engine = open_engine(&args)?;

    match command {
        Command::Check(args) => check(&engine, args),
        Command::Complete(args) => complete(&engine, args),
        Command::Learn(args) => learn(&engine, args),
        Command::Shortcut(args) => shortcut(&engine, args),
        Command::Entries(args) => entries(&engine, args),
    }
}
