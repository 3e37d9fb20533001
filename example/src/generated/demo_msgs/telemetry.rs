// Generated by genmsg from demo_msgs/Telemetry.msg. Do not edit.

#![allow(dead_code)]

use genmsg::{Encode, WireError, WireWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub active: bool,
    pub sequence: u32,
    pub mode: u8,
    pub samples: Vec<i8>,
    pub label: String,
    pub corners: [super::super::demo_msgs::Point; 2],
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry {
            active: Default::default(),
            sequence: Default::default(),
            mode: Default::default(),
            samples: Default::default(),
            label: Default::default(),
            corners: std::array::from_fn(|_| Default::default()),
        }
    }
}

impl Telemetry {
    pub const MODE_IDLE: u8 = 0;
    pub const MODE_ACTIVE: u8 = 1;

    /// Encodes every field before `sequence`.
    pub fn encode_until_sequence(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        Ok(w.position())
    }

    /// Encodes every field before `mode`.
    pub fn encode_until_mode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        w.align(4)?;
        w.write(self.sequence)?;
        Ok(w.position())
    }

    /// Encodes every field before `samples`.
    pub fn encode_until_samples(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        w.align(4)?;
        w.write(self.sequence)?;
        w.write(self.mode)?;
        Ok(w.position())
    }

    /// Encodes every field before `label`.
    pub fn encode_until_label(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        w.align(4)?;
        w.write(self.sequence)?;
        w.write(self.mode)?;
        w.align(4)?;
        w.write_count(self.samples.len())?;
        w.write_array(&self.samples[..])?;
        Ok(w.position())
    }

    /// Encodes every field before `corners`.
    pub fn encode_until_corners(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        w.align(4)?;
        w.write(self.sequence)?;
        w.write(self.mode)?;
        w.align(4)?;
        w.write_count(self.samples.len())?;
        w.write_array(&self.samples[..])?;
        w.write_string(&self.label)?;
        Ok(w.position())
    }
}

impl Encode for Telemetry {
    const TYPE_NAME: &'static str = "demo_msgs::msg::dds_::Telemetry_";

    fn encode(&self, buf: &mut [u8]) -> Result<usize, WireError> {
        let mut w = WireWriter::new(buf);
        w.write_header()?;
        w.write(self.active)?;
        w.align(4)?;
        w.write(self.sequence)?;
        w.write(self.mode)?;
        w.align(4)?;
        w.write_count(self.samples.len())?;
        w.write_array(&self.samples[..])?;
        w.write_string(&self.label)?;
        for item in self.corners.iter() {
            item.encode_nested(&mut w)?;
        }
        Ok(w.position())
    }
}
