//! A bounds-checked, big-endian cursor over TZif bytes.

use crate::TzifError;

/// The width of a single transition time or leap second occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeWidth {
    /// The version 1 data block: 32-bit times.
    Four,
    /// The version 2+ data block: 64-bit times.
    Eight,
}

impl TimeWidth {
    pub(crate) const fn bytes(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DataReader<'data> {
    data: &'data [u8],
}

impl<'data> DataReader<'data> {
    pub(crate) fn new(data: &'data [u8]) -> Self {
        Self { data }
    }

    /// Consumes `n` bytes, failing without consuming anything on a short read.
    pub(crate) fn read(&mut self, n: usize) -> Result<&'data [u8], TzifError> {
        if self.data.len() < n {
            return Err(TzifError::UnexpectedEof);
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), TzifError> {
        self.read(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], TzifError> {
        let mut array = [0; N];
        array.copy_from_slice(self.read(N)?);
        Ok(array)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, TzifError> {
        let [byte] = self.read_array()?;
        Ok(byte)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, TzifError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, TzifError> {
        self.read_array().map(i32::from_be_bytes)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, TzifError> {
        self.read_array().map(i64::from_be_bytes)
    }

    /// Reads a transition time, sign extending 32-bit values.
    pub(crate) fn read_time(&mut self, width: TimeWidth) -> Result<i64, TzifError> {
        match width {
            TimeWidth::Four => self.read_i32().map(i64::from),
            TimeWidth::Eight => self.read_i64(),
        }
    }
}
