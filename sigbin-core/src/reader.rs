use std::io::{self, BufReader, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use sigbin_types::{FieldKind, FieldSpec, Scalar, SigbinError, SigbinResult};

/// Точка отсчёта для [`BinReader::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// От начала ресурса
    Begin,
    /// От текущей позиции
    Current,
    /// От конца ресурса
    End,
}

/// Курсорное чтение типизированных полей поверх байтового ресурса.
///
/// Один курсор на экземпляр: индексатор и извлечение окон разделяют его,
/// поэтому позиция после любой операции не гарантируется. После [`close`]
/// любая операция возвращает [`SigbinError::Closed`].
///
/// [`close`]: BinReader::close
pub struct BinReader<R: Read + Seek> {
    inner: Option<BufReader<R>>,
    len: u64,
}

impl<R: Read + Seek> BinReader<R> {
    /// Создаёт читатель, измеряя длину ресурса; курсор остаётся в начале.
    pub fn new(inner: R) -> SigbinResult<Self> {
        let mut reader = BufReader::new(inner);
        let len = reader.seek(SeekFrom::End(0))?;

        reader.rewind()?;

        Ok(Self {
            inner: Some(reader),
            len,
        })
    }

    /// Длина ресурса в байтах (измерена один раз при создании).
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// true, если ресурс уже освобождён.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Освобождает ресурс. Повторный вызов — no-op.
    pub fn close(&mut self) {
        self.inner = None;
    }

    /// Перемещает курсор; отрицательные смещения допустимы для
    /// `Current` и `End`. Возвращает новую абсолютную позицию.
    pub fn seek(
        &mut self,
        offset: i64,
        whence: Whence,
    ) -> SigbinResult<u64> {
        let pos = match whence {
            Whence::Begin => {
                let offset = u64::try_from(offset).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("negative offset {offset} from the beginning"),
                    )
                })?;
                SeekFrom::Start(offset)
            }
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };

        Ok(self.get()?.seek(pos)?)
    }

    /// Абсолютная позиция курсора от начала ресурса.
    pub fn tell(&mut self) -> SigbinResult<u64> {
        Ok(self.get()?.stream_position()?)
    }

    /// Читает упорядоченную последовательность типизированных полей,
    /// потребляя ровно `Σ spec[i].byte_len()` байт.
    pub fn read_fields(
        &mut self,
        spec: &[FieldSpec],
    ) -> SigbinResult<Vec<Scalar>> {
        let total: usize = spec.iter().map(|s| s.count).sum();
        let mut out = Vec::with_capacity(total);
        let reader = self.get()?;

        for field in spec {
            for _ in 0..field.count {
                let scalar = match field.kind {
                    FieldKind::I8 => Scalar::Int(reader.read_i8()? as i64),
                    FieldKind::U8 => Scalar::Uint(reader.read_u8()? as u64),
                    FieldKind::I16 => Scalar::Int(reader.read_i16::<LittleEndian>()? as i64),
                    FieldKind::U16 => Scalar::Uint(reader.read_u16::<LittleEndian>()? as u64),
                    FieldKind::I32 => Scalar::Int(reader.read_i32::<LittleEndian>()? as i64),
                    FieldKind::U32 => Scalar::Uint(reader.read_u32::<LittleEndian>()? as u64),
                    FieldKind::I64 => Scalar::Int(reader.read_i64::<LittleEndian>()?),
                    FieldKind::U64 => Scalar::Uint(reader.read_u64::<LittleEndian>()?),
                    FieldKind::F32 => Scalar::Float(reader.read_f32::<LittleEndian>()?),
                };
                out.push(scalar);
            }
        }

        Ok(out)
    }

    /// Читает ровно `buf.len()` байт с текущей позиции.
    pub fn read_exact(
        &mut self,
        buf: &mut [u8],
    ) -> SigbinResult<()> {
        self.get()?.read_exact(buf)?;

        Ok(())
    }

    /// Читает ровно `buf.len()` байт начиная с абсолютного смещения.
    pub fn read_exact_at(
        &mut self,
        offset: u64,
        buf: &mut [u8],
    ) -> SigbinResult<()> {
        let reader = self.get()?;

        reader.seek(SeekFrom::Start(offset))?;
        reader.read_exact(buf)?;

        Ok(())
    }

    fn get(&mut self) -> SigbinResult<&mut BufReader<R>> {
        self.inner.as_mut().ok_or(SigbinError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn make_reader(len: usize) -> BinReader<Cursor<Vec<u8>>> {
        let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
        BinReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_len_measured_on_open() {
        let r = make_reader(100);

        assert_eq!(r.len(), 100);
        assert!(!r.is_empty());
        assert!(BinReader::new(Cursor::new(Vec::<u8>::new()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_seek_law() {
        let mut r = make_reader(100);

        assert_eq!(r.seek(10, Whence::Begin).unwrap(), 10);
        assert_eq!(r.tell().unwrap(), 10);

        assert_eq!(r.seek(10, Whence::Current).unwrap(), 20);
        assert_eq!(r.tell().unwrap(), 20);

        assert_eq!(r.seek(-10, Whence::End).unwrap(), 90);
        assert_eq!(r.tell().unwrap(), 90);
    }

    #[test]
    fn test_negative_begin_seek_rejected() {
        let mut r = make_reader(100);

        assert!(matches!(
            r.seek(-1, Whence::Begin),
            Err(SigbinError::Io(_))
        ));
    }

    #[test]
    fn test_read_fields_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&2100i32.to_le_bytes());
        bytes.extend_from_slice(&0xABu8.to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());

        let mut r = BinReader::new(Cursor::new(bytes)).unwrap();
        let vals = r
            .read_fields(&[
                FieldSpec::new(FieldKind::I32, 2),
                FieldSpec::single(FieldKind::U8),
                FieldSpec::single(FieldKind::F32),
            ])
            .unwrap();

        assert_eq!(
            vals,
            vec![
                Scalar::Int(1),
                Scalar::Int(2100),
                Scalar::Uint(0xAB),
                Scalar::Float(1.5),
            ]
        );
        assert_eq!(r.tell().unwrap(), 13);
    }

    #[test]
    fn test_read_fields_past_end() {
        let mut r = make_reader(3);

        assert!(matches!(
            r.read_fields(&[FieldSpec::single(FieldKind::I32)]),
            Err(SigbinError::Io(_))
        ));
    }

    #[test]
    fn test_read_exact_at() {
        let mut r = make_reader(16);
        let mut buf = [0u8; 4];

        r.read_exact_at(8, &mut buf).unwrap();

        assert_eq!(buf, [8, 9, 10, 11]);
    }

    #[test]
    fn test_operations_after_close() {
        let mut r = make_reader(16);

        r.close();

        assert!(r.is_closed());
        assert!(matches!(r.tell(), Err(SigbinError::Closed)));
        assert!(matches!(r.seek(0, Whence::Begin), Err(SigbinError::Closed)));
        assert!(matches!(
            r.read_fields(&[FieldSpec::single(FieldKind::U8)]),
            Err(SigbinError::Closed)
        ));
        assert!(matches!(
            r.read_exact(&mut [0u8; 1]),
            Err(SigbinError::Closed)
        ));

        // Повторное закрытие — no-op
        r.close();
        assert!(r.is_closed());
    }

    #[test]
    fn test_seek_past_end_fails_on_read() {
        // Ленивая валидация: сам seek за конец допустим, падает чтение
        let mut r = make_reader(10);

        assert_eq!(r.seek(5, Whence::End).unwrap(), 15);
        assert!(matches!(
            r.read_exact(&mut [0u8; 1]),
            Err(SigbinError::Io(_))
        ));
    }
}
