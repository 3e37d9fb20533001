use crate::error::Result;
use crate::writer::WireWriter;

/// Implemented by every generated message type.
pub trait Encode {
    /// Wire-format type name, `<package>::msg::dds_::<Type>_`.
    const TYPE_NAME: &'static str;

    /// Encode the whole message into `buf`, header included, and return the
    /// number of bytes written.
    fn encode(&self, buf: &mut [u8]) -> Result<usize>;

    /// Encode this value as a nested field at the cursor of `w`.
    ///
    /// The nested encoding is a complete frame of its own: the remaining buffer
    /// is handed to [`encode`](Self::encode) and the cursor advanced by
    /// whatever it wrote.
    fn encode_nested(&self, w: &mut WireWriter<'_>) -> Result<usize> {
        let written = self.encode(w.remaining_mut())?;
        w.advance(written)?;
        Ok(written)
    }

    /// Encode into a freshly allocated buffer of `capacity` bytes and return
    /// only the bytes that were written.
    fn encode_to_vec(&self, capacity: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; capacity];
        let written = self.encode(&mut buf)?;
        buf.truncate(written);
        Ok(buf)
    }
}
