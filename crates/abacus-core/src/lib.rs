//! Calculator engine.
//!
//! A display/pending-operation state machine with deferred left-to-right
//! evaluation, snapshot undo/redo, bounded history and a memory register,
//! plus the stateless helpers the other calculator modes need: unit,
//! currency and date conversion, a linear equation solver, an expression
//! parser with function sampling for plots, themes and history export.
//!
//! Zero I/O. Hosts drain [`Effect`]s and decide how to persist
//! [`PersistedState`].

pub mod constants;
pub mod currency;
pub mod dates;
pub mod engine;
pub mod equation;
pub mod error;
pub mod export;
pub mod expr;
pub mod format;
pub mod history;
pub mod keys;
pub mod memory;
pub mod operator;
pub mod persist;
pub mod plot;
pub mod scientific;
pub mod theme;
pub mod time;
pub mod undo;
pub mod units;

pub use constants::{DEFAULT_UNDO_DEPTH, ERROR_DISPLAY, HISTORY_LIMIT, PLOT_SAMPLES};
pub use currency::{CURRENCIES, Currency, RateFeed, RateTable, RateTicket, convert_currency, mock_fetch};
pub use dates::{CalendarDate, DateDifference, add_days, date_difference, subtract_days};
pub use engine::{Calculator, Effect, SoundCue};
pub use equation::solve_linear;
pub use error::{CalcError, Result};
pub use export::{history_to_csv, history_to_html};
pub use expr::{Expr, evaluate_expression};
pub use format::{format_number, parse_operand};
pub use history::{History, HistoryEntry};
pub use keys::{KeyAction, map_key, parse_chord, parse_key_sequence};
pub use memory::MemoryRegister;
pub use operator::{Operator, evaluate};
pub use persist::{Mode, PersistedState};
pub use plot::{PlotPoint, Viewport, plot, sample_function};
pub use scientific::{ScientificFn, factorial};
pub use theme::{CustomTheme, Theme, ThemeCatalog, ThemeColors};
pub use undo::{Snapshot, UndoHistory};
pub use units::{Category, Unit, convert_units, find_unit};
