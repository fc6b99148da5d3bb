//! Ticker Core - Headless Age Decomposition for ageticker
//!
//! This crate holds everything about a running age ticker that does not
//! touch the terminal. The TUI crate drives it; tests drive it directly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   BirthRecord   ┌──────────────────────────────┐
//! │ Persistence  │ ──────────────▶ │            Ticker            │
//! │ Store        │                 │  Clock::now() ─▶ decompose() │
//! └──────────────┘                 │        ─▶ ElapsedDuration    │
//!                                  └──────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`BirthRecord`]: Validated date and time of birth
//! - [`ElapsedDuration`]: Calendar-aware breakdown of time since birth
//! - [`decompose`]: The two-phase (calendar units, then fixed units) split
//! - [`PersistenceStore`]: Load/save of the last-used birth record
//! - [`Clock`]: Source of the current naive local instant
//! - [`TickerConfig`]: Layered configuration (defaults, file, env, CLI)

pub mod birth;
pub mod clock;
pub mod config;
pub mod decompose;
pub mod persistence;

pub use birth::{BirthRecord, RecordError};
pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use config::{
    default_config_path, default_record_path, load_config, load_config_from_path,
    load_config_with_env, ConfigError, ConfigSource, Precision, TickerConfig, TickerToml,
};
pub use decompose::{add_calendar, decompose, ElapsedDuration, InvalidRangeError, Unit};
pub use persistence::{FileStore, MemoryStore, PersistenceStore, StoreError};
