use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian};

use sigbin_types::{
    BlockDescriptor, FieldSpec, SampleMatrix, Scalar, SigbinError, SigbinResult,
};

use crate::{
    format::BYTES_PER_SAMPLE,
    index::{scan_blocks, SignalBlocks},
    reader::{BinReader, Whence},
};

/// Открытая запись: курсор над файлом и таблица блоков, построенная
/// однократно при открытии.
///
/// Все операции синхронные и разделяют один курсор; для доступа из
/// нескольких потоков экземпляр нужно ограждать снаружи (mutex или
/// отдельный экземпляр на поток).
pub struct SignalFile<R: Read + Seek> {
    reader: BinReader<R>,
    blocks: SignalBlocks,
}

impl SignalFile<File> {
    /// Открывает запись по пути, сканируя таблицу блоков.
    ///
    /// Ошибка индексирования прерывает открытие целиком; файловый
    /// дескриптор освобождается при выходе из функции.
    pub fn open<P: AsRef<Path>>(path: P) -> SigbinResult<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl<R: Read + Seek> SignalFile<R> {
    /// Строит запись из произвольного ресурса `Read + Seek`.
    pub fn from_reader(inner: R) -> SigbinResult<Self> {
        let mut reader = BinReader::new(inner)?;
        let blocks = scan_blocks(&mut reader)?;

        Ok(Self { reader, blocks })
    }

    ////////////////////////////////////////////////////////////////////////
    // Свойства (вычислены при открытии, чтение ресурса не требуется)
    ////////////////////////////////////////////////////////////////////////

    /// Полная длина файла в байтах.
    pub fn bytes_in_file(&self) -> u64 {
        self.reader.len()
    }

    /// Число каналов (одинаково во всех блоках).
    pub fn num_channels(&self) -> u32 {
        self.blocks.num_channels
    }

    /// Частота дискретизации в Гц.
    pub fn sampling_rate(&self) -> f64 {
        self.blocks.sampling_rate
    }

    /// Длительность записи в секундах.
    pub fn duration(&self) -> f64 {
        self.blocks.duration()
    }

    /// Количество блоков.
    pub fn n_blocks(&self) -> usize {
        self.blocks.n_blocks()
    }

    /// Общее количество выборок на канал.
    pub fn total_samples(&self) -> u64 {
        self.blocks.total_samples
    }

    /// Размеры заголовков по блокам.
    pub fn header_sizes(&self) -> Vec<u32> {
        self.blocks.header_sizes()
    }

    /// Количество выборок по блокам.
    pub fn num_samples_by_block(&self) -> Vec<u64> {
        self.blocks.num_samples_by_block()
    }

    /// Дескрипторы блоков в порядке следования.
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks.blocks
    }

    /// Калибровочные коэффициенты первого блока.
    pub fn calibration(&self) -> Option<&[f32]> {
        self.blocks.calibration.as_deref()
    }

    /// Таблица блоков целиком.
    pub fn signal_blocks(&self) -> &SignalBlocks {
        &self.blocks
    }

    ////////////////////////////////////////////////////////////////////////
    // Курсор
    ////////////////////////////////////////////////////////////////////////

    /// Перемещает общий курсор файла.
    pub fn seek(
        &mut self,
        offset: i64,
        whence: Whence,
    ) -> SigbinResult<u64> {
        self.reader.seek(offset, whence)
    }

    /// Абсолютная позиция курсора.
    pub fn tell(&mut self) -> SigbinResult<u64> {
        self.reader.tell()
    }

    /// Читает последовательность типизированных полей с текущей позиции.
    pub fn read(
        &mut self,
        spec: &[FieldSpec],
    ) -> SigbinResult<Vec<Scalar>> {
        self.reader.read_fields(spec)
    }

    /// Освобождает файловый ресурс. Повторный вызов — no-op; остальные
    /// операции над закрытым файлом возвращают [`SigbinError::Closed`].
    pub fn close(&mut self) {
        self.reader.close();
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_closed()
    }

    ////////////////////////////////////////////////////////////////////////
    // Извлечение выборок
    ////////////////////////////////////////////////////////////////////////

    /// Извлекает окно `[start_secs, start_secs + duration_secs)`.
    ///
    /// Результат — матрица «строка = момент времени, столбец = канал»;
    /// значения f32 возвращаются как записаны, без пересчёта. Окно
    /// проверяется до любого ввода-вывода; после ошибки диапазона файл
    /// остаётся полностью пригодным. Позиция общего курсора после вызова
    /// не определена.
    pub fn read_raw_samples(
        &mut self,
        start_secs: f64,
        duration_secs: f64,
    ) -> SigbinResult<SampleMatrix> {
        let rate = self.blocks.sampling_rate;
        let total = self.blocks.total_samples;

        // NaN не проходит ни одно сравнение и отклоняется здесь же
        if !(duration_secs > 0.0) {
            return Err(SigbinError::NegativeDuration(duration_secs));
        }

        // Границы проверяются в f64 до целочисленных преобразований,
        // чтобы запредельные аргументы не переполняли счётчики выборок
        let start_sample = (start_secs * rate).round();
        let n_samples = (duration_secs * rate).round();
        let end_sample = start_sample + n_samples;

        if start_sample < 0.0 || end_sample > total as f64 {
            return Err(SigbinError::WindowOutOfBounds {
                start_sample: start_sample as i64,
                end_sample: end_sample as i64,
                total_samples: total,
            });
        }

        let nc = self.blocks.num_channels as usize;
        let mut matrix = SampleMatrix::zeros(n_samples as usize, nc);

        let start = start_sample as u64;
        let end = start + n_samples as u64;
        if start == end {
            // Окно короче полупериода дискретизации: ноль строк, без I/O
            return Ok(matrix);
        }

        // Двоичный поиск первого затронутого блока; диапазон проверен,
        // поэтому блок существует всегда
        let first = self
            .blocks
            .block_containing(start)
            .ok_or_else(|| SigbinError::corrupt_header("sample index escaped block table"))?;

        let mut row = 0usize;

        for block in &self.blocks.blocks[first..] {
            if block.first_sample >= end {
                break;
            }

            // Локальный поддиапазон выборок внутри блока
            let lo = start.max(block.first_sample) - block.first_sample;
            let hi = end.min(block.first_sample + block.num_samples) - block.first_sample;
            let ns = block.num_samples as usize;

            // Один seek и одно блочное чтение на затронутый блок
            let mut payload = vec![0u8; block.data_size as usize];
            self.reader.read_exact_at(block.data_offset(), &mut payload)?;

            for ch in 0..nc {
                let segment = ch * ns * BYTES_PER_SAMPLE;

                for (i, s) in (lo..hi).enumerate() {
                    let off = segment + s as usize * BYTES_PER_SAMPLE;
                    let value = LittleEndian::read_f32(&payload[off..off + 4]);

                    matrix.row_mut(row + i)[ch] = value;
                }
            }

            row += (hi - lo) as usize;
        }

        Ok(matrix)
    }

    /// Convenience: вся запись одной матрицей.
    pub fn read_all_samples(&mut self) -> SigbinResult<SampleMatrix> {
        self.read_raw_samples(0.0, self.duration())
    }
}
