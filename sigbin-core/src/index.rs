use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};

use sigbin_types::{BlockDescriptor, BlockHeader, SigbinError, SigbinResult};

use crate::{
    format::{BlockHeaderExt, BYTES_PER_SAMPLE, PREFIX_SIZE},
    reader::BinReader,
};

/// Таблица блоков файла и агрегаты, вычисленные однократно при открытии.
#[derive(Debug, Clone)]
pub struct SignalBlocks {
    /// Дескрипторы блоков в порядке следования
    pub blocks: Vec<BlockDescriptor>,
    /// Число каналов (одинаково во всех блоках)
    pub num_channels: u32,
    /// Частота дискретизации в Гц (из первого блока)
    pub sampling_rate: f64,
    /// Калибровочные коэффициенты первого блока
    pub calibration: Option<Vec<f32>>,
    /// Сумма выборок по всем блокам
    pub total_samples: u64,
}

impl SignalBlocks {
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Размеры заголовков по блокам.
    pub fn header_sizes(&self) -> Vec<u32> {
        self.blocks.iter().map(|b| b.header_size).collect()
    }

    /// Количество выборок по блокам.
    pub fn num_samples_by_block(&self) -> Vec<u64> {
        self.blocks.iter().map(|b| b.num_samples).collect()
    }

    /// Длительность записи в секундах.
    pub fn duration(&self) -> f64 {
        self.total_samples as f64 / self.sampling_rate
    }

    /// Индекс блока, содержащего глобальную выборку `sample`.
    ///
    /// Диапазоны блоков отсортированы и не перекрываются, поэтому
    /// достаточно двоичного поиска по кумулятивным границам.
    pub fn block_containing(
        &self,
        sample: u64,
    ) -> Option<usize> {
        if sample >= self.total_samples {
            return None;
        }

        let idx = self
            .blocks
            .partition_point(|b| b.first_sample + b.num_samples <= sample);

        Some(idx)
    }
}

/// Однократное сканирование файла: строит таблицу блоков и проверяет
/// инварианты формата.
///
/// Блоки обязаны покрывать файл целиком, без зазоров и перекрытий;
/// любое расхождение фатально — частично построенный индекс наружу
/// не возвращается.
pub fn scan_blocks<R: Read + Seek>(reader: &mut BinReader<R>) -> SigbinResult<SignalBlocks> {
    let file_len = reader.len();

    let mut blocks: Vec<BlockDescriptor> = Vec::new();
    let mut num_channels: Option<u32> = None;
    let mut sampling_rate: Option<f64> = None;
    let mut calibration: Option<Vec<f32>> = None;
    let mut cursor = 0u64;
    let mut next_sample = 0u64;

    while cursor < file_len {
        if file_len - cursor < PREFIX_SIZE as u64 {
            return Err(SigbinError::truncated(format!(
                "{} bytes left at offset {cursor}, a block prefix needs {PREFIX_SIZE}",
                file_len - cursor,
            )));
        }

        // Короткое пробное чтение: узнаём header_size из префикса
        let mut prefix = [0u8; PREFIX_SIZE];
        reader.read_exact_at(cursor, &mut prefix)?;

        let declared = LittleEndian::read_i32(&prefix[4..8]);
        if declared < PREFIX_SIZE as i32 {
            return Err(SigbinError::corrupt_header(format!(
                "block at offset {cursor} declares header_size {declared}",
            )));
        }

        let header_size = declared as u64;
        if cursor + header_size > file_len {
            return Err(SigbinError::truncated(format!(
                "block header at offset {cursor} needs {header_size} bytes, \
                 file ends at {file_len}",
            )));
        }

        // Дочитываем трейлер и разбираем заголовок целиком
        let mut hdr = vec![0u8; header_size as usize];
        hdr[..PREFIX_SIZE].copy_from_slice(&prefix);
        reader.read_exact(&mut hdr[PREFIX_SIZE..])?;

        let header = BlockHeader::parse(&hdr)?;

        match num_channels {
            None => num_channels = Some(header.num_channels),
            Some(expected) if expected != header.num_channels => {
                return Err(SigbinError::ChannelCountMismatch {
                    block: blocks.len(),
                    found: header.num_channels,
                    expected,
                });
            }
            Some(_) => {}
        }

        if blocks.is_empty() {
            // Только первый блок обязан нести трейлер с частотой
            if header.sampling_rate.is_none() {
                return Err(SigbinError::corrupt_header(
                    "first block carries no rate/calibration trailer",
                ));
            }
            sampling_rate = header.sampling_rate;
            calibration = header.calibration;
        }

        let data_size = header.data_size as u64;
        if cursor + header_size + data_size > file_len {
            return Err(SigbinError::truncated(format!(
                "block data at offset {} needs {data_size} bytes, file ends at {file_len}",
                cursor + header_size,
            )));
        }

        let num_samples = data_size / (header.num_channels as u64 * BYTES_PER_SAMPLE as u64);

        blocks.push(BlockDescriptor {
            header_offset: cursor,
            header_size: header.header_size,
            data_size: header.data_size,
            num_samples,
            first_sample: next_sample,
        });

        next_sample += num_samples;
        cursor += header_size + data_size;
    }

    // Курсор сошёлся с длиной файла точно; пустой файл блоков не содержит
    let num_channels = num_channels
        .ok_or_else(|| SigbinError::truncated("file contains no blocks"))?;
    let sampling_rate = sampling_rate
        .ok_or_else(|| SigbinError::truncated("file contains no blocks"))?;

    Ok(SignalBlocks {
        blocks,
        num_channels,
        sampling_rate,
        calibration,
        total_samples: next_sample,
    })
}
