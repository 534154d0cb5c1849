//! Спецификация бинарного формата блочных записей
//!
//! Файл — непрерывная последовательность блоков без выравнивания между ними.
//! Каждый блок начинается с фиксированного 16-байтового префикса из четырёх
//! 32-битных целых (little-endian):
//!
//! ```text
//! [0..4)    version       — версия формата (поддерживается 1)
//! [4..8)    header_size   — полный размер заголовка, включая префикс
//! [8..12)   data_size     — размер полезной нагрузки в байтах
//! [12..16)  num_channels  — количество каналов
//! ```
//!
//! При `header_size > 16` за префиксом идёт трейлер:
//! калибровочные коэффициенты (f32 на канал), упакованные поля частоты
//! дискретизации (u32 на канал), длина опционального сегмента (u32) и сам
//! опциональный сегмент. Блок с `header_size == 16` наследует частоту и
//! калибровку первого блока.
//!
//! Полезная нагрузка — канал-мажорная: все выборки канала 0 подряд, затем
//! канала 1 и так далее, по 4 байта (f32 LE) на выборку.

use byteorder::{ByteOrder, LittleEndian};

use sigbin_types::{BlockHeader, SigbinError, SigbinResult};

/// Поддерживаемая версия формата
pub const SIGBIN_VERSION: i32 = 1;

/// Размер фиксированного префикса заголовка блока (4 × i32)
pub const PREFIX_SIZE: usize = 16;

/// Байт на одну выборку (single-precision float)
pub const BYTES_PER_SAMPLE: usize = 4;

/// Масштабные множители упакованного поля частоты дискретизации.
///
/// Верхний байт поля — селектор множителя, нижние 24 бита — целая мантисса
/// частоты. Таблица восстановлена по арифметике эталонных записей и не
/// подтверждена документом производителя.
const RATE_SCALE: [f64; 4] = [1.0, 10.0, 100.0, 1_000.0];

/// Декодирование заголовков блоков из байтового среза.
pub trait BlockHeaderExt: Sized {
    /// Разбирает заголовок из первых `header_size` байт блока.
    ///
    /// Срез обязан содержать заголовок целиком и ничего кроме него.
    fn parse(buf: &[u8]) -> SigbinResult<Self>;
}

impl BlockHeaderExt for BlockHeader {
    fn parse(buf: &[u8]) -> SigbinResult<Self> {
        if buf.len() < PREFIX_SIZE {
            return Err(SigbinError::corrupt_header(format!(
                "header shorter than fixed prefix: {} < {PREFIX_SIZE}",
                buf.len(),
            )));
        }

        let version = LittleEndian::read_i32(&buf[0..4]);
        if version != SIGBIN_VERSION {
            return Err(SigbinError::UnsupportedVersion {
                found: version,
                expected: SIGBIN_VERSION,
            });
        }

        let header_size = LittleEndian::read_i32(&buf[4..8]);
        let data_size = LittleEndian::read_i32(&buf[8..12]);
        let num_channels = LittleEndian::read_i32(&buf[12..16]);

        if header_size < PREFIX_SIZE as i32 {
            return Err(SigbinError::corrupt_header(format!(
                "header_size {header_size} is below the {PREFIX_SIZE}-byte prefix",
            )));
        }

        if buf.len() != header_size as usize {
            return Err(SigbinError::corrupt_header(format!(
                "header slice is {} bytes, header_size declares {header_size}",
                buf.len(),
            )));
        }

        if num_channels <= 0 {
            return Err(SigbinError::corrupt_header(format!(
                "non-positive channel count: {num_channels}",
            )));
        }

        if data_size < 0 {
            return Err(SigbinError::corrupt_header(format!(
                "negative data size: {data_size}",
            )));
        }

        let row_bytes = num_channels as u64 * BYTES_PER_SAMPLE as u64;
        if data_size as u64 % row_bytes != 0 {
            return Err(SigbinError::corrupt_header(format!(
                "data_size {data_size} is not a multiple of \
                 num_channels × {BYTES_PER_SAMPLE} = {row_bytes}",
            )));
        }

        let nc = num_channels as usize;
        let trailer = &buf[PREFIX_SIZE..];

        let (sampling_rate, calibration) = if trailer.is_empty() {
            // Минимальный заголовок: частота и калибровка наследуются
            (None, None)
        } else {
            parse_trailer(trailer, nc)?
        };

        Ok(BlockHeader {
            version,
            header_size: header_size as u32,
            data_size: data_size as u32,
            num_channels: num_channels as u32,
            sampling_rate,
            calibration,
        })
    }
}

/// Разбирает трейлер заголовка: калибровка, частота, опциональный сегмент.
fn parse_trailer(
    trailer: &[u8],
    nc: usize,
) -> SigbinResult<(Option<f64>, Option<Vec<f32>>)> {
    // Две таблицы по каналу + поле длины опционального сегмента
    let tables_len = nc * 2 * 4 + 4;
    if trailer.len() < tables_len {
        return Err(SigbinError::corrupt_header(format!(
            "trailer is {} bytes, {tables_len} required for {nc} channels",
            trailer.len(),
        )));
    }

    let mut calibration = Vec::with_capacity(nc);
    for ch in 0..nc {
        calibration.push(LittleEndian::read_f32(&trailer[ch * 4..ch * 4 + 4]));
    }

    // Первая запись таблицы частот авторитетна для всего блока
    let rate_off = nc * 4;
    let packed = LittleEndian::read_u32(&trailer[rate_off..rate_off + 4]);
    let rate = decode_sampling_rate(packed)?;

    let opt_off = nc * 8;
    let opt_len = LittleEndian::read_u32(&trailer[opt_off..opt_off + 4]) as usize;
    if trailer.len() != nc * 8 + 4 + opt_len {
        return Err(SigbinError::corrupt_header(format!(
            "optional segment of {opt_len} bytes disagrees with trailer length {}",
            trailer.len(),
        )));
    }

    Ok((Some(rate), Some(calibration)))
}

/// Декодирует упакованное поле частоты: мантисса × множитель селектора.
fn decode_sampling_rate(packed: u32) -> SigbinResult<f64> {
    let selector = (packed >> 24) as usize;
    let magnitude = (packed & 0x00FF_FFFF) as f64;

    let scale = RATE_SCALE.get(selector).ok_or_else(|| {
        SigbinError::corrupt_header(format!("unknown rate scale selector: {selector}"))
    })?;

    Ok(magnitude * scale)
}
