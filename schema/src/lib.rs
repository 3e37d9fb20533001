//! Runtime support for encoders produced by `genmsg-compiler`.
//!
//! Generated code writes through a [WireWriter], which tracks the wire cursor,
//! inserts alignment padding and refuses to write past the end of the
//! caller's buffer.
//!
//! ```
//! use genmsg_schema::*;
//!
//! struct Flag {
//!     flag: bool,
//! }
//!
//! impl Encode for Flag {
//!     const TYPE_NAME: &'static str = "demo_msgs::msg::dds_::Flag_";
//!
//!     fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
//!         let mut w = WireWriter::new(buf);
//!         w.write_header()?;
//!         w.write(self.flag)?;
//!         Ok(w.position())
//!     }
//! }
//!
//! assert_eq!(Flag { flag: true }.encode_to_vec(16).unwrap(), [0, 0, 0, 0, 1]);
//! ```

pub mod encode;
pub mod error;
pub mod value;
pub mod writer;

pub use encode::*;
pub use error::WireError;
pub use value::*;
pub use writer::*;
