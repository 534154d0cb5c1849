use thiserror::Error;

/// Результат для операций sigbin
pub type SigbinResult<T> = std::result::Result<T, SigbinError>;

/// Типы ошибок формата sigbin.
#[derive(Debug, Error)]
pub enum SigbinError {
    /// Несовместимая версия формата блока
    #[error("Unsupported version: found {found}, expected {expected}")]
    UnsupportedVersion { found: i32, expected: i32 },

    /// Повреждённый или противоречивый заголовок блока
    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    /// Файл обрывается раньше, чем заявляют заголовки
    #[error("Truncated file: {0}")]
    TruncatedFile(String),

    /// Число каналов различается между блоками
    #[error("Channel count mismatch in block {block}: found {found}, expected {expected}")]
    ChannelCountMismatch {
        block: usize,
        found: u32,
        expected: u32,
    },

    /// Запрошенное окно выходит за пределы записи
    #[error("Sample window [{start_sample}, {end_sample}) is outside [0, {total_samples})")]
    WindowOutOfBounds {
        start_sample: i64,
        end_sample: i64,
        total_samples: u64,
    },

    /// Неположительная длительность окна
    #[error("Window duration must be positive, got {0}")]
    NegativeDuration(f64),

    /// Операция над уже закрытым файлом
    #[error("File is closed")]
    Closed,

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SigbinError {
    /// Удобные конструкторы
    pub fn corrupt_header<S: Into<String>>(s: S) -> Self {
        Self::CorruptHeader(s.into())
    }

    pub fn truncated<S: Into<String>>(s: S) -> Self {
        Self::TruncatedFile(s.into())
    }
}
