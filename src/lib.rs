pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod mapping;
pub mod phoneme;
pub mod pitch;
pub mod tables;
pub mod timeline;
pub mod timing;
pub mod token;

pub use api::{map_source, map_text, map_text_to_events, MappingOutput};
pub use config::{InputMode, MappingConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::*;
pub use mapping::{EventKind, MusicEvent};
pub use pitch::{Accidental, Key, NoteName, Pitch, ScaleMode, Tonic};
pub use timeline::Timeline;
pub use timing::normalize_events;
pub use token::{tokenize, Token, TokenKind, TokenStream};
