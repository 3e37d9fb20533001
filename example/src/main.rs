// example/src/main.rs

mod generated;
#[cfg(test)]
mod tests;

use genmsg::*;

// Bring the generated types into scope:
use generated::demo_msgs::{Point, Telemetry};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

fn sample_telemetry() -> Telemetry {
    Telemetry {
        active:   true,
        sequence: 7,
        mode:     Telemetry::MODE_ACTIVE,
        samples:  vec![1, -2, 3],
        label:    "rover".to_string(),
        corners:  [Point { x: 0.0, y: 0.0 }, Point { x: 1.5, y: -2.0 }],
    }
}

fn main() -> Result<(), WireError> {
    // Build a message by hand. The modules under `generated/` were produced with
    //   genmsg generate -r example/schemas -o example/src/generated
    let telemetry = sample_telemetry();

    // 1) Full encoding into a caller-owned buffer
    let mut buf = [0u8; 256];
    let len = telemetry.encode(&mut buf)?;
    println!("type  = {}", Telemetry::TYPE_NAME);
    println!("full  = {} bytes", len);
    println!("        {}", hex(&buf[..len]));

    // 2) A partial encoder writes exactly the prefix of the full encoding
    let mut prefix = [0u8; 256];
    let until = telemetry.encode_until_label(&mut prefix)?;
    println!("until label = {} bytes, prefix matches: {}", until, prefix[..until] == buf[..until]);

    // 3) Too small a buffer is reported, never overrun
    let mut small = [0u8; 8];
    match telemetry.encode(&mut small) {
        Err(e) => println!("8-byte buffer: {}", e),
        Ok(n)  => println!("8-byte buffer unexpectedly held {} bytes", n),
    }

    Ok(())
}
