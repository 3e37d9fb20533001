// Generated by genmsg from demo_msgs/Point.msg. Do not edit.

#![allow(dead_code)]

use genmsg::{Encode, WireError, WireWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Point {
            x: Default::default(),
            y: Default::default(),
        }
    }
}

impl Point {
    /// Encodes every field before `y`.
    pub fn encode_until_y(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.align(8)?;
        w.write(self.x)?;
        Ok(w.position())
    }
}

impl Encode for Point {
    const TYPE_NAME: &'static str = "demo_msgs::msg::dds_::Point_";

    fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.align(8)?;
        w.write(self.x)?;
        w.write(self.y)?;
        Ok(w.position())
    }
}
