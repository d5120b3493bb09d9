//! Localization Merger
//!
//! Pulls each upstream locale's addon translations, keeps a raw copy under
//! `l10n/<locale>/`, and projects the extension name and description into
//! `_locales/<locale>/messages.json`.

pub mod merge;
pub mod messages;

pub use merge::{discover_locales, localize, merge_translations, write_messages, LocaleReport};
pub use messages::{backfill_names, ExtensionMessages, Message};
