use genmsg::{Encode, WireError};

use crate::generated::demo_msgs::{Point, Telemetry};
use crate::sample_telemetry;

type Encoder = fn(&Telemetry, &mut [u8]) -> Result<usize, WireError>;

const PARTIALS: [(&str, Encoder); 5] = [
    ("sequence", Telemetry::encode_until_sequence),
    ("mode", Telemetry::encode_until_mode),
    ("samples", Telemetry::encode_until_samples),
    ("label", Telemetry::encode_until_label),
    ("corners", Telemetry::encode_until_corners),
];

fn point_bytes(x: f64, y: f64) -> Vec<u8> {
    let mut b = vec![0; 8];                   // header, pad to 8
    b.extend(x.to_ne_bytes());
    b.extend(y.to_ne_bytes());
    b
}

fn telemetry_bytes() -> Vec<u8> {
    let mut b = vec![0, 0, 0, 0];             // header
    b.push(1);                                // active
    b.extend([0, 0, 0]);                      // pad to 8
    b.extend(7u32.to_ne_bytes());             // sequence
    b.push(1);                                // mode
    b.extend([0, 0, 0]);                      // pad to 16
    b.extend(3u32.to_ne_bytes());             // samples
    b.extend([1, 0xFE, 3]);                   // ends at 23
    b.extend(6u32.to_ne_bytes());             // label
    b.extend(b"rover\0");                     // ends at 33
    b.extend(point_bytes(0.0, 0.0));          // corners
    b.extend(point_bytes(1.5, -2.0));
    b
}

#[test]
fn encode_point() {
    let point = Point { x: 1.5, y: -2.0 };
    assert_eq!(point.encode_to_vec(64), Ok(point_bytes(1.5, -2.0)));

    let mut buf = [0xEEu8; 64];
    let len = point.encode_until_y(&mut buf).expect("encode_until_y failed");
    assert_eq!(buf[..len], point_bytes(1.5, -2.0)[..16]);
}

#[test]
fn encode_telemetry() {
    let expected = telemetry_bytes();
    assert_eq!(expected.len(), 81);

    let mut buf = [0xEEu8; 256];
    let len = sample_telemetry().encode(&mut buf).expect("encode failed");
    assert_eq!(buf[..len], expected[..]);
}

#[test]
fn partial_encoders_are_prefixes() {
    let telemetry = sample_telemetry();
    let full = telemetry_bytes();

    let mut last = 0;
    for (field, encoder) in PARTIALS {
        let mut buf = [0xEEu8; 256];
        let len = encoder(&telemetry, &mut buf).expect("partial encode failed");
        assert_eq!(buf[..len], full[..len], "until {}", field);
        assert!(len > last, "until {}", field);
        last = len;
    }

    let mut buf = [0u8; 256];
    assert_eq!(telemetry.encode_until_label(&mut buf), Ok(23));
}

#[test]
fn buffer_one_byte_short() {
    let telemetry = sample_telemetry();

    let mut exact = vec![0u8; 81];
    assert_eq!(telemetry.encode(&mut exact), Ok(81));

    let mut short = vec![0u8; 80];
    assert!(matches!(
        telemetry.encode(&mut short),
        Err(WireError::BufferTooSmall { .. })
    ));

    // A nested frame that no longer fits fails the same way
    let mut tight = vec![0u8; 40];
    assert!(matches!(
        telemetry.encode(&mut tight),
        Err(WireError::BufferTooSmall { .. })
    ));
}

#[test]
fn empty_sequence() {
    let telemetry = Telemetry { samples: Vec::new(), ..sample_telemetry() };

    let mut buf = [0u8; 256];
    let len = telemetry.encode(&mut buf).expect("encode failed");
    assert_eq!(buf[16..20], 0u32.to_ne_bytes());
    assert_eq!(len, 81 - 3);
}
