/// Разобранный заголовок одного блока (фиксированный префикс + трейлер)
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    /// Версия формата блока
    pub version: i32,
    /// Полный размер заголовка в байтах, включая префикс
    pub header_size: u32,
    /// Размер полезной нагрузки блока в байтах
    pub data_size: u32,
    /// Количество каналов в блоке
    pub num_channels: u32,
    /// Частота дискретизации в Гц (None — наследуется от первого блока)
    pub sampling_rate: Option<f64>,
    /// Калибровочные коэффициенты по каналам (None — наследуются)
    pub calibration: Option<Vec<f32>>,
}
