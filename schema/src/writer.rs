use crate::error::{buffer_too_small, Result, WireError};

/// Number of bytes every top-level encoding reserves in front of the first
/// field. The bytes are zeroed; the transport stamps its encapsulation marker
/// into them.
pub const HEADER_LEN: usize = 4;

/// A value with a fixed-width native wire representation.
pub trait WirePrimitive: Copy {
    /// Bytes occupied on the wire. Equal to the required alignment for every
    /// implementor.
    const WIDTH: usize;

    /// Write the value into `out`, which is exactly `WIDTH` bytes long.
    fn put(self, out: &mut [u8]);
}

impl WirePrimitive for bool {
    const WIDTH: usize = 1;

    fn put(self, out: &mut [u8]) {
        out[0] = if self { 1 } else { 0 };
    }
}

macro_rules! impl_wire_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WirePrimitive for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn put(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_wire_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// A bounds-checked cursor over a caller-provided output buffer.
///
/// Alignment is measured from the start of the buffer the writer wraps, so an
/// encoder produces the same bytes wherever its output lands.
///
/// ```
/// let mut buf = [0xAAu8; 16];
/// let mut w = genmsg_schema::WireWriter::new(&mut buf);
/// w.write_header().unwrap();
/// w.write(true).unwrap();
/// w.align(4).unwrap();
/// w.write(7u32).unwrap();
/// assert_eq!(w.position(), 12);
/// assert_eq!(&buf[4..8], &[1, 0, 0, 0]);
/// ```
pub struct WireWriter<'a> {
    data:  &'a mut [u8],
    index: usize,
}

impl<'a> WireWriter<'a> {
    /// Wrap `data`. Nothing is written beyond its end.
    pub fn new(data: &'a mut [u8]) -> WireWriter<'a> {
        WireWriter { data, index: 0 }
    }

    /// Current offset of the wire cursor from the start of the buffer.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Total size of the wrapped buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes still available after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.index]
    }

    /// The unwritten tail of the buffer. Used to hand a nested encoder its own
    /// frame; follow up with [`advance`](Self::advance).
    pub fn remaining_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.index..]
    }

    /// Move the cursor past `len` bytes that were filled in through
    /// [`remaining_mut`](Self::remaining_mut).
    pub fn advance(&mut self, len: usize) -> Result<()> {
        self.reserve(len).map(|_| ())
    }

    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(buffer_too_small(len, available));
        }
        let start = self.index;
        self.index += len;
        Ok(&mut self.data[start..start + len])
    }

    /// Pad with zero bytes until the cursor is a multiple of `alignment`.
    /// Returns the number of padding bytes written.
    pub fn align(&mut self, alignment: usize) -> Result<usize> {
        if !alignment.is_power_of_two() {
            return Err(WireError::InvalidAlignment(alignment));
        }
        let misalignment = self.index & (alignment - 1);
        if misalignment == 0 {
            return Ok(0);
        }
        let pad = alignment - misalignment;
        self.reserve(pad)?.fill(0);
        Ok(pad)
    }

    /// Write the zeroed fixed-size header that precedes every encoding.
    pub fn write_header(&mut self) -> Result<()> {
        self.reserve(HEADER_LEN)?.fill(0);
        Ok(())
    }

    /// Write one primitive at the cursor. The caller is responsible for any
    /// alignment the value needs.
    pub fn write<T: WirePrimitive>(&mut self, value: T) -> Result<()> {
        value.put(self.reserve(T::WIDTH)?);
        Ok(())
    }

    /// Write `values` back to back with no padding between elements.
    pub fn write_array<T: WirePrimitive>(&mut self, values: &[T]) -> Result<()> {
        let len = values
            .len()
            .checked_mul(T::WIDTH)
            .ok_or(WireError::LengthOverflow(values.len()))?;
        let out = self.reserve(len)?;
        for (chunk, value) in out.chunks_exact_mut(T::WIDTH).zip(values) {
            value.put(chunk);
        }
        Ok(())
    }

    /// Write a 32-bit sequence count.
    pub fn write_count(&mut self, len: usize) -> Result<()> {
        let count = u32::try_from(len).map_err(|_| WireError::LengthOverflow(len))?;
        self.write(count)
    }

    /// Write raw bytes at the cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write a string as a 32-bit length (byte count including the
    /// terminating NUL) followed by the bytes and the NUL. The length is
    /// written unaligned.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = value.len() + 1;
        let count = u32::try_from(len).map_err(|_| WireError::LengthOverflow(len))?;
        let out = self.reserve(4 + len)?;
        out[..4].copy_from_slice(&count.to_ne_bytes());
        out[4..4 + value.len()].copy_from_slice(value.as_bytes());
        out[4 + value.len()] = 0;
        Ok(())
    }
}

#[cfg(test)]
fn write_once(capacity: usize, cb: fn(&mut WireWriter) -> Result<()>) -> Result<Vec<u8>> {
    let mut buf = vec![0xEE; capacity];
    let mut w = WireWriter::new(&mut buf);
    cb(&mut w)?;
    let written = w.position();
    buf.truncate(written);
    Ok(buf)
}

#[test]
fn write_bool() {
    assert_eq!(write_once(1, |w| w.write(false)), Ok(vec![0]));
    assert_eq!(write_once(1, |w| w.write(true)), Ok(vec![1]));
    assert_eq!(write_once(0, |w| w.write(true)), Err(buffer_too_small(1, 0)));
}

#[test]
fn write_numbers() {
    assert_eq!(write_once(1, |w| w.write(-2i8)), Ok(vec![0xFE]));
    assert_eq!(write_once(2, |w| w.write(0x1234u16)), Ok(0x1234u16.to_ne_bytes().to_vec()));
    assert_eq!(write_once(4, |w| w.write(-5i32)), Ok((-5i32).to_ne_bytes().to_vec()));
    assert_eq!(write_once(8, |w| w.write(1.5f64)), Ok(1.5f64.to_ne_bytes().to_vec()));
    assert_eq!(write_once(3, |w| w.write(1u32)), Err(buffer_too_small(4, 3)));
}

#[test]
fn write_header() {
    assert_eq!(write_once(4, |w| w.write_header()), Ok(vec![0, 0, 0, 0]));
    assert_eq!(write_once(3, |w| w.write_header()), Err(buffer_too_small(4, 3)));
}

#[test]
fn align() {
    assert_eq!(write_once(8, |w| w.align(4).map(|_| ())), Ok(vec![]));
    assert_eq!(
        write_once(8, |w| {
            w.write(1u8)?;
            assert_eq!(w.align(4)?, 3);
            Ok(())
        }),
        Ok(vec![1, 0, 0, 0])
    );
    assert_eq!(
        write_once(16, |w| {
            w.write_bytes(&[9; 5])?;
            assert_eq!(w.align(8)?, 3);
            assert_eq!(w.align(8)?, 0);
            Ok(())
        }),
        Ok(vec![9, 9, 9, 9, 9, 0, 0, 0])
    );
    assert_eq!(write_once(8, |w| w.align(3).map(|_| ())), Err(WireError::InvalidAlignment(3)));
    assert_eq!(
        write_once(2, |w| {
            w.write(1u8)?;
            w.align(4).map(|_| ())
        }),
        Err(buffer_too_small(3, 1))
    );
}

#[test]
fn write_array() {
    assert_eq!(write_once(3, |w| w.write_array(&[true, false, true])), Ok(vec![1, 0, 1]));
    let mut expected = Vec::new();
    for v in [1u16, 2, 3] {
        expected.extend_from_slice(&v.to_ne_bytes());
    }
    assert_eq!(write_once(6, |w| w.write_array(&[1u16, 2, 3])), Ok(expected));
    assert_eq!(write_once(0, |w| w.write_array::<u64>(&[])), Ok(vec![]));
    assert_eq!(write_once(5, |w| w.write_array(&[1u16, 2, 3])), Err(buffer_too_small(6, 5)));
}

#[test]
fn write_string() {
    let mut expected = 1u32.to_ne_bytes().to_vec();
    expected.push(0);
    assert_eq!(write_once(5, |w| w.write_string("")), Ok(expected));

    let mut expected = 4u32.to_ne_bytes().to_vec();
    expected.extend_from_slice(b"abc\0");
    assert_eq!(write_once(8, |w| w.write_string("abc")), Ok(expected));
    assert_eq!(write_once(7, |w| w.write_string("abc")), Err(buffer_too_small(8, 7)));
}

#[test]
fn write_count() {
    assert_eq!(write_once(4, |w| w.write_count(10)), Ok(10u32.to_ne_bytes().to_vec()));
}

#[test]
fn advance_after_nested_frame() {
    let mut buf = [0u8; 8];
    let mut w = WireWriter::new(&mut buf);
    w.write(1u8).unwrap();
    let frame = w.remaining_mut();
    assert_eq!(frame.len(), 7);
    frame[0] = 42;
    w.advance(1).unwrap();
    assert_eq!(w.written(), &[1, 42]);
    assert_eq!(w.advance(7), Err(buffer_too_small(7, 6)));
}
