use std::ops::Range;

/// Размещение и форма одного блока в файле.
///
/// Строится один раз при открытии файла и дальше не изменяется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Абсолютное смещение заголовка блока
    pub header_offset: u64,
    /// Размер заголовка в байтах
    pub header_size: u32,
    /// Размер полезной нагрузки в байтах
    pub data_size: u32,
    /// Выборок на канал в этом блоке (выведено из размеров)
    pub num_samples: u64,
    /// Сумма выборок всех предыдущих блоков
    pub first_sample: u64,
}

impl BlockDescriptor {
    /// Абсолютное смещение полезной нагрузки.
    pub fn data_offset(&self) -> u64 {
        self.header_offset + self.header_size as u64
    }

    /// Смещение первого байта за блоком.
    pub fn end_offset(&self) -> u64 {
        self.data_offset() + self.data_size as u64
    }

    /// Полуинтервал глобальных номеров выборок, покрытый блоком.
    pub fn sample_range(&self) -> Range<u64> {
        self.first_sample..self.first_sample + self.num_samples
    }

    pub fn contains_sample(
        &self,
        sample: u64,
    ) -> bool {
        self.sample_range().contains(&sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_offsets() {
        let d = BlockDescriptor {
            header_offset: 100,
            header_size: 32,
            data_size: 400,
            num_samples: 50,
            first_sample: 200,
        };

        assert_eq!(d.data_offset(), 132);
        assert_eq!(d.end_offset(), 532);
        assert_eq!(d.sample_range(), 200..250);
        assert!(d.contains_sample(200));
        assert!(d.contains_sample(249));
        assert!(!d.contains_sample(250));
    }
}
