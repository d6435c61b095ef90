/*! Spell-check resolution for an on-screen keyboard.

Typed words are resolved against a stack of dictionaries: a shipped
whitelist, auto-replace shortcuts (shipped and user-defined), the user's
learned words, contact names, and finally a pluggable [`Speller`]. Each
source is split into a locale-independent part shared by every locale and a
part loaded for the current language and country.

# Usage

```no_run
use std::sync::Arc;
use smartkey::{Settings, SpellCheckEngine, WordListSpeller};

let speller = Arc::new(WordListSpeller::open("/usr/share/smartkey/words"));
let engine = SpellCheckEngine::new(Settings::default(), speller);
let result = engine.check_spelling("teh", 5).unwrap();
for guess in result.guesses {
    println!("{} {}", guess.text, guess.is_auto_accept);
}
```

The `smartkey` command in `smartkey-bin` drives the same engine from a shell.

[`Speller`]: speller::Speller
*/

pub mod database;
pub mod engine;
pub mod error;
pub mod paths;
pub mod settings;
pub mod speller;
pub mod store;
pub mod tokenizer;

pub use crate::engine::{SpellCheckEngine, SpellCheckResult, WordGuess};
pub use crate::error::SmartKeyError;
pub use crate::settings::{LocaleSettings, Settings};
pub use crate::speller::WordListSpeller;
