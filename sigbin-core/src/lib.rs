//! Библиотека чтения бинарных файлов sigbin
//!
//! Эталонная реализация чтения блочных многоканальных записей
//! физиологических сигналов: разбор заголовков, индексирование блоков,
//! типизированное чтение и извлечение временных окон выборок.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use sigbin_core::SignalFile;
//!
//! let mut file = SignalFile::open("signal1.bin")?;
//! println!(
//!     "{} каналов, {:.1} Гц, {:.1} с",
//!     file.num_channels(),
//!     file.sampling_rate(),
//!     file.duration(),
//! );
//!
//! // Секунда записи начиная с t = 1.0 с
//! let window = file.read_raw_samples(1.0, 1.0)?;
//! assert_eq!(window.num_channels(), file.num_channels() as usize);
//! # Ok::<(), sigbin_types::SigbinError>(())
//! ```

pub mod format;
pub mod index;
pub mod reader;
pub mod signal_file;

pub use format::*;
pub use index::*;
pub use reader::*;
pub use signal_file::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
