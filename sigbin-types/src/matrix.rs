/// Матрица выборок: строка — момент времени, столбец — канал.
///
/// Хранение построчное (sample-major), значения f32 без пересчёта —
/// физические единицы записаны в файле как есть.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    num_samples: usize,
    num_channels: usize,
    data: Vec<f32>,
}

impl SampleMatrix {
    /// Нулевая матрица заданной формы.
    pub fn zeros(
        num_samples: usize,
        num_channels: usize,
    ) -> Self {
        Self {
            num_samples,
            num_channels,
            data: vec![0.0; num_samples * num_channels],
        }
    }

    /// Количество строк (выборок по времени).
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Количество столбцов (каналов).
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Значение канала `channel` в момент `sample`.
    ///
    /// Паникует при выходе индексов за форму матрицы.
    pub fn get(
        &self,
        sample: usize,
        channel: usize,
    ) -> f32 {
        assert!(channel < self.num_channels);
        self.data[sample * self.num_channels + channel]
    }

    /// Одна строка: все каналы одного момента времени.
    pub fn row(
        &self,
        sample: usize,
    ) -> &[f32] {
        let start = sample * self.num_channels;
        &self.data[start..start + self.num_channels]
    }

    pub fn row_mut(
        &mut self,
        sample: usize,
    ) -> &mut [f32] {
        let start = sample * self.num_channels;
        &mut self.data[start..start + self.num_channels]
    }

    /// Сырое построчное представление.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
